//! Descriptor synthesis
//!
//! Idempotent passes that merge the modules and resources an adaptation
//! project needs into an existing descriptor. Every pass matches entries by
//! name, appends what is missing and never rewrites what is already there, so
//! running the pipeline twice yields the same document as running it once.
//!
//! Pipeline order:
//! 1. router module (standalone approuter or managed destination content)
//! 2. UI deployer module
//! 3. resources
//! 4. the application's own module
//! 5. FLP module relocation (must stay last, it reorders the module list)

pub mod flp;
pub mod modules;
pub mod naming;
pub mod resources;
pub mod topology;

use crate::models::{Descriptor, Topology};
use naming::Names;
use tracing::info;

pub use flp::relocate_flp_modules;
pub use modules::{ensure_own_module, ensure_router_module, ensure_ui_deployer_module};
pub use resources::ensure_resources;
pub use topology::{resolve_or_detect, resolve_topology};

/// Caller-supplied inputs of one synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisContext {
    /// Name of the adaptation project module and its build artifact
    pub adp_project_name: String,
    /// Instance name of the business service the application consumes
    pub business_service: String,
    /// Business solution name used for managed router destinations
    pub business_solution: String,
    pub topology: Topology,
    /// Run timestamp, suffix of the generated XSUAA names
    pub timestamp: String,
}

impl SynthesisContext {
    pub fn new(
        adp_project_name: impl Into<String>,
        business_service: impl Into<String>,
        topology: Topology,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            adp_project_name: adp_project_name.into(),
            business_service: business_service.into(),
            business_solution: String::new(),
            topology,
            timestamp: timestamp.into(),
        }
    }

    pub fn with_business_solution(mut self, business_solution: impl Into<String>) -> Self {
        self.business_solution = business_solution.into();
        self
    }
}

/// Run every synthesis pass over `descriptor` and return it
pub fn synthesize(mut descriptor: Descriptor, ctx: &SynthesisContext) -> Descriptor {
    let names = Names::new(descriptor.project_name());

    ensure_router_module(&mut descriptor, &names, ctx);
    ensure_ui_deployer_module(&mut descriptor, &names, &ctx.adp_project_name);
    ensure_resources(&mut descriptor, &names, ctx.topology, &ctx.timestamp);
    ensure_own_module(&mut descriptor, &ctx.adp_project_name);
    let relocated = relocate_flp_modules(&mut descriptor, &names, &ctx.business_service);

    info!(
        "Synthesized {} descriptor '{}': {} modules, {} resources, {} FLP module(s) relocated",
        ctx.topology,
        descriptor.id,
        descriptor.modules.len(),
        descriptor.resources.len(),
        relocated
    );
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, ModuleType, Requirement};

    fn context(topology: Topology) -> SynthesisContext {
        SynthesisContext::new("adpProjectName", "my-biz-svc", topology, "1700000000000")
            .with_business_solution("test.solution")
    }

    fn requirement_sets(descriptor: &Descriptor) -> Vec<(String, Vec<String>)> {
        descriptor
            .modules
            .iter()
            .map(|m| {
                let mut names: Vec<String> = m.requires.iter().map(|r| r.name.clone()).collect();
                names.sort();
                (m.name.clone(), names)
            })
            .collect()
    }

    #[test]
    fn test_standalone_from_empty() {
        let descriptor = synthesize(Descriptor::new("test-project"), &context(Topology::Standalone));

        assert_eq!(
            descriptor.module_names(),
            vec![
                "test-project-approuter",
                "test-project_ui_deployer",
                "adpProjectName"
            ]
        );
        assert_eq!(
            descriptor.resource_names(),
            vec![
                "test-project_html_repo_host",
                "test-project_uaa",
                "portal_resources_test-project",
                "test-project_html_repo_runtime"
            ]
        );
        let router = descriptor.find_module("test-project-approuter").unwrap();
        assert_eq!(
            router.requirement_names(),
            vec![
                "test-project_html_repo_runtime",
                "test-project_uaa",
                "portal_resources_test-project",
                "my-biz-svc"
            ]
        );
    }

    #[test]
    fn test_idempotent_for_both_topologies() {
        for topology in [Topology::Standalone, Topology::Managed] {
            let mut seed = Descriptor::new("My.App");
            let mut flp = Module::new("my.app-flp", ModuleType::ApplicationContent);
            flp.add_requirement_if_absent(
                Requirement::named("portal_resources_my.app").with_service_key("content-deploy-key"),
            );
            seed.modules.push(flp);

            let once = synthesize(seed, &context(topology));
            let twice = synthesize(once.clone(), &context(topology));

            assert_eq!(once.module_names(), twice.module_names());
            assert_eq!(once.resource_names(), twice.resource_names());
            assert_eq!(requirement_sets(&once), requirement_sets(&twice));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_topology_completeness() {
        let standalone = synthesize(Descriptor::new("p"), &context(Topology::Standalone));
        assert!(standalone.find_resource("portal_resources_p").is_some());
        assert!(standalone.find_resource("p_html_repo_runtime").is_some());
        assert!(standalone.find_resource("p-destination").is_none());

        let managed = synthesize(Descriptor::new("p"), &context(Topology::Managed));
        assert!(managed.find_resource("portal_resources_p").is_none());
        assert!(managed.find_resource("p_html_repo_runtime").is_none());
        assert!(managed.find_resource("p-destination").is_some());
    }

    #[test]
    fn test_project_prefix_is_lower_cased_id() {
        let descriptor = synthesize(Descriptor::new("Test-Project"), &context(Topology::Managed));
        assert!(descriptor.find_module("test-project-destination-content").is_some());
        assert!(descriptor.find_resource("test-project_uaa").is_some());
    }
}
