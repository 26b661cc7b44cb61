//! Runs against a project directory on disk

mod common;

use cf_mta_sdk::{
    DeployRequest, Descriptor, DescriptorAssembler, FileSystemStorageBackend, Topology,
};
use common::{DECLARED_RESOURCES, MANAGED_DESCRIPTOR, StubCfClient, runtime};
use tempfile::TempDir;

#[test]
fn test_run_rewrites_descriptor_in_project_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mta.yaml"), MANAGED_DESCRIPTOR).unwrap();

    let storage = FileSystemStorageBackend::new(dir.path());
    let client = StubCfClient::new();
    let request = DeployRequest::new("mta.yaml", "adpProjectName", "my-biz-svc")
        .with_business_solution("test.solution")
        .with_timestamp("42");

    let outcome = runtime()
        .block_on(DescriptorAssembler::new(&storage, &client).run(&request))
        .unwrap();

    assert_eq!(outcome.topology, Topology::Managed);

    let written = std::fs::read_to_string(dir.path().join("mta.yaml")).unwrap();
    let descriptor: Descriptor = serde_yaml::from_str(&written).unwrap();
    assert_eq!(descriptor, outcome.descriptor);
    assert!(descriptor.find_module("my.app_ui_deployer").is_some());
    assert!(descriptor.find_resource("my.app-destination").is_some());

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_declared_resources_in_subdirectory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("config")).unwrap();
    std::fs::write(dir.path().join("config/resources.yaml"), DECLARED_RESOURCES).unwrap();

    let storage = FileSystemStorageBackend::new(dir.path());
    let client = StubCfClient::new().with_offering(
        cf_mta_sdk::ServiceOffering::new("svcC").with_odata_version("v4"),
    );

    let services = runtime()
        .block_on(
            DescriptorAssembler::new(&storage, &client)
                .resolve_business_services("config/resources.yaml"),
        )
        .unwrap();

    assert_eq!(services, vec!["svcC"]);
}
