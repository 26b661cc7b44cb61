//! Module synthesis
//!
//! Find-or-create passes for the router, UI deployer and application modules.
//! An existing module keeps its identity and settings; only requirements it
//! lacks are appended.

use super::SynthesisContext;
use super::naming::{Names, solution_instance_name, solution_label};
use crate::models::{
    BuildParameters, Content, ContentInstance, Descriptor, Destination, Module, ModuleParameters,
    ModuleType, Requirement, Topology,
};
use serde_yaml::Mapping;
use tracing::debug;

const APPROUTER_DISK_QUOTA: &str = "256M";
const APPROUTER_MEMORY: &str = "256M";
const UAA_AUTHENTICATION: &str = "OAuth2UserTokenExchange";
const EXISTING_DESTINATIONS_POLICY: &str = "update";
const UI_DEPLOYER_BUILD_RESULT: &str = "resources";
const UI_DEPLOYER_TARGET_PATH: &str = "resources/";
const CUSTOM_BUILDER: &str = "custom";
const BUILD_COMMANDS: [&str; 2] = ["npm install", "npm run build"];

/// Ensure the router module of the chosen topology exists and requires what it routes to
pub fn ensure_router_module(descriptor: &mut Descriptor, names: &Names, ctx: &SynthesisContext) {
    match ctx.topology {
        Topology::Standalone => ensure_standalone_router(descriptor, names, &ctx.business_service),
        Topology::Managed => ensure_destination_content(
            descriptor,
            names,
            &ctx.business_service,
            &ctx.business_solution,
        ),
    }
}

fn ensure_standalone_router(descriptor: &mut Descriptor, names: &Names, business_service: &str) {
    let name = names.approuter();
    let router = descriptor.module_or_insert_with(&name, || {
        debug!(module = %name, "adding standalone approuter module");
        Module::new(name.as_str(), ModuleType::ApprouterNodejs)
            .with_path(name.as_str())
            .with_parameters(ModuleParameters {
                disk_quota: Some(APPROUTER_DISK_QUOTA.to_string()),
                memory: Some(APPROUTER_MEMORY.to_string()),
                ..ModuleParameters::default()
            })
    });

    for requirement in [
        names.html_repo_runtime(),
        names.uaa(),
        names.portal_resources(),
        business_service.to_string(),
    ] {
        router.add_requirement_if_absent(Requirement::named(requirement));
    }
}

fn ensure_destination_content(
    descriptor: &mut Descriptor,
    names: &Names,
    business_service: &str,
    business_solution: &str,
) {
    let name = names.destination_content();
    let module = descriptor.module_or_insert_with(&name, || {
        debug!(module = %name, "adding managed approuter destination content module");
        Module::new(name.as_str(), ModuleType::ApplicationContent)
            .with_parameters(ModuleParameters {
                content: Some(Content {
                    instance: Some(ContentInstance {
                        destinations: managed_destinations(names, business_service, business_solution),
                        existing_destinations_policy: Some(EXISTING_DESTINATIONS_POLICY.to_string()),
                        extra: Mapping::new(),
                    }),
                    extra: Mapping::new(),
                }),
                ..ModuleParameters::default()
            })
            .with_build_parameters(BuildParameters {
                no_source: Some(true),
                ..BuildParameters::default()
            })
    });

    for requirement in [
        Requirement::named(names.uaa()).with_service_key(names.uaa_key()),
        Requirement::named(names.html_repo_host()).with_service_key(names.html_repo_host_key()),
        Requirement::named(names.destination()).with_content_target(),
        Requirement::named(business_service).with_service_key(format!("{}-key", business_service)),
    ] {
        module.add_requirement_if_absent(requirement);
    }
}

fn managed_destinations(
    names: &Names,
    business_service: &str,
    business_solution: &str,
) -> Vec<Destination> {
    let solution = solution_instance_name(business_solution);
    let label = Some(solution_label(business_solution));

    vec![
        Destination {
            name: format!("{}-{}-html_repo_host", solution, names.project()),
            service_instance_name: names.html_repo_host_instance(),
            service_key_name: names.html_repo_host_key(),
            authentication: None,
            cloud_service: label.clone(),
            extra: Mapping::new(),
        },
        Destination {
            name: format!("{}-uaa-{}", solution, names.project()),
            service_instance_name: names.xsuaa_instance(),
            service_key_name: names.uaa_key(),
            authentication: Some(UAA_AUTHENTICATION.to_string()),
            cloud_service: label.clone(),
            extra: Mapping::new(),
        },
        Destination {
            name: format!("{}-service", business_service),
            service_instance_name: business_service.to_string(),
            service_key_name: format!("{}-key", business_service),
            authentication: None,
            cloud_service: label,
            extra: Mapping::new(),
        },
    ]
}

/// Ensure the module that uploads the application zip to the HTML5 repository
pub fn ensure_ui_deployer_module(descriptor: &mut Descriptor, names: &Names, adp_project_name: &str) {
    let name = names.ui_deployer();
    let deployer = descriptor.module_or_insert_with(&name, || {
        debug!(module = %name, "adding UI deployer module");
        Module::new(name.as_str(), ModuleType::ApplicationContent)
            .with_path(".")
            .with_build_parameters(BuildParameters {
                build_result: Some(UI_DEPLOYER_BUILD_RESULT.to_string()),
                ..BuildParameters::default()
            })
    });

    deployer.add_requirement_if_absent(Requirement::named(names.html_repo_host()).with_content_target());
    deployer
        .build_parameters
        .get_or_insert_with(BuildParameters::default)
        .add_requirement_if_absent(
            Requirement::named(adp_project_name)
                .with_artifact(format!("{}.zip", adp_project_name), UI_DEPLOYER_TARGET_PATH),
        );
}

/// Ensure the adaptation project's own HTML5 module
pub fn ensure_own_module(descriptor: &mut Descriptor, adp_project_name: &str) {
    descriptor.module_or_insert_with(adp_project_name, || {
        debug!(module = %adp_project_name, "adding application module");
        Module::new(adp_project_name, ModuleType::Html5)
            .with_path(adp_project_name)
            .with_build_parameters(BuildParameters {
                builder: Some(CUSTOM_BUILDER.to_string()),
                commands: BUILD_COMMANDS.iter().map(|c| c.to_string()).collect(),
                supported_platforms: Some(Vec::new()),
                ..BuildParameters::default()
            })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Names {
        Names::new("test-project")
    }

    fn context(topology: Topology) -> SynthesisContext {
        SynthesisContext::new("adp.app", "my-biz-svc", topology, "1")
            .with_business_solution("test.solution")
    }

    #[test]
    fn test_standalone_router_merges_into_existing_module() {
        let mut descriptor = Descriptor::new("test-project");
        let mut existing = Module::new("test-project-approuter", ModuleType::ApprouterNodejs);
        existing.path = Some("custom-router".to_string());
        existing.add_requirement_if_absent(Requirement::named("test-project_uaa").with_service_key("kept"));
        existing.add_requirement_if_absent(Requirement::named("other"));
        descriptor.modules.push(existing);

        ensure_router_module(&mut descriptor, &names(), &context(Topology::Standalone));

        assert_eq!(descriptor.modules.len(), 1);
        let router = &descriptor.modules[0];
        assert_eq!(router.path.as_deref(), Some("custom-router"));
        assert_eq!(
            router.requirement_names(),
            vec![
                "test-project_uaa",
                "other",
                "test-project_html_repo_runtime",
                "portal_resources_test-project",
                "my-biz-svc"
            ]
        );
        let uaa = router.find_requirement("test-project_uaa").unwrap();
        assert_eq!(uaa.service_key_name(), Some("kept"));
    }

    #[test]
    fn test_managed_router_content() {
        let mut descriptor = Descriptor::new("test-project");
        ensure_router_module(&mut descriptor, &names(), &context(Topology::Managed));

        let module = descriptor.find_module("test-project-destination-content").unwrap();
        assert_eq!(module.module_type, ModuleType::ApplicationContent);
        assert_eq!(
            module.requirement_names(),
            vec![
                "test-project_uaa",
                "test-project_html_repo_host",
                "test-project-destination",
                "my-biz-svc"
            ]
        );
        assert_eq!(
            module.find_requirement("my-biz-svc").unwrap().service_key_name(),
            Some("my-biz-svc-key")
        );
        let destination_requirement = module.find_requirement("test-project-destination").unwrap();
        assert_eq!(
            destination_requirement.parameters.as_ref().unwrap().content_target,
            Some(true)
        );

        let destinations = &module
            .parameters
            .as_ref()
            .and_then(|p| p.content.as_ref())
            .and_then(|c| c.instance.as_ref())
            .unwrap()
            .destinations;
        assert_eq!(destinations.len(), 3);
        assert_eq!(destinations[0].name, "test_solution-test-project-html_repo_host");
        assert_eq!(destinations[1].name, "test_solution-uaa-test-project");
        assert_eq!(destinations[1].authentication.as_deref(), Some("OAuth2UserTokenExchange"));
        assert_eq!(destinations[2].service_instance_name, "my-biz-svc");
        assert!(
            destinations
                .iter()
                .all(|d| d.cloud_service.as_deref() == Some("test.solution"))
        );
    }

    #[test]
    fn test_managed_router_keeps_existing_destinations() {
        let mut descriptor = Descriptor::new("test-project");
        descriptor.modules.push(Module::new(
            "test-project-destination-content",
            ModuleType::ApplicationContent,
        ));

        ensure_router_module(&mut descriptor, &names(), &context(Topology::Managed));

        let module = &descriptor.modules[0];
        assert!(module.parameters.is_none());
        assert_eq!(module.requires.len(), 4);
    }

    #[test]
    fn test_ui_deployer() {
        let mut descriptor = Descriptor::new("test-project");
        ensure_ui_deployer_module(&mut descriptor, &names(), "adp.app");
        ensure_ui_deployer_module(&mut descriptor, &names(), "adp.app");

        let deployer = descriptor.find_module("test-project_ui_deployer").unwrap();
        assert_eq!(deployer.path.as_deref(), Some("."));
        assert_eq!(deployer.requirement_names(), vec!["test-project_html_repo_host"]);

        let build = deployer.build_parameters.as_ref().unwrap();
        assert_eq!(build.build_result.as_deref(), Some("resources"));
        assert_eq!(build.requires.len(), 1);
        assert_eq!(build.requires[0].artifacts, vec!["adp.app.zip"]);
        assert_eq!(build.requires[0].target_path.as_deref(), Some("resources/"));
    }

    #[test]
    fn test_ui_deployer_without_build_parameters_gets_artifact() {
        let mut descriptor = Descriptor::new("test-project");
        descriptor
            .modules
            .push(Module::new("test-project_ui_deployer", ModuleType::ApplicationContent));

        ensure_ui_deployer_module(&mut descriptor, &names(), "adp.app");

        let build = descriptor.modules[0].build_parameters.as_ref().unwrap();
        assert_eq!(build.requires[0].name, "adp.app");
        assert!(build.build_result.is_none());
    }

    #[test]
    fn test_own_module() {
        let mut descriptor = Descriptor::new("test-project");
        ensure_own_module(&mut descriptor, "adp.app");
        ensure_own_module(&mut descriptor, "adp.app");

        assert_eq!(descriptor.modules.len(), 1);
        let module = &descriptor.modules[0];
        assert_eq!(module.module_type, ModuleType::Html5);
        assert_eq!(module.path.as_deref(), Some("adp.app"));
        let build = module.build_parameters.as_ref().unwrap();
        assert_eq!(build.builder.as_deref(), Some("custom"));
        assert_eq!(build.commands, vec!["npm install", "npm run build"]);
    }
}
