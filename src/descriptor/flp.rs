//! Fiori Launchpad content module relocation
//!
//! An FLP content module created by an external generator is recognised by a
//! `portal_resources_{project}` requirement bound through the
//! `content-deploy-key` service key. Such a module must deploy after the
//! HTML5 repository host, the UI deployer and the business service, so it gets
//! requirements on them and is moved to the end of the module list.

use super::naming::Names;
use crate::models::{Descriptor, Module, ModuleType, Requirement};
use tracing::debug;

/// Service key marking a generator-owned FLP content module
pub const FLP_CONTENT_DEPLOY_KEY: &str = "content-deploy-key";

fn is_flp_module(module: &Module, portal_resources: &str) -> bool {
    module.module_type == ModuleType::ApplicationContent
        && module
            .find_requirement(portal_resources)
            .and_then(Requirement::service_key_name)
            == Some(FLP_CONTENT_DEPLOY_KEY)
}

/// Wire and move every FLP content module to the tail, keeping their relative order
///
/// Returns the number of modules relocated.
pub fn relocate_flp_modules(
    descriptor: &mut Descriptor,
    names: &Names,
    business_service: &str,
) -> usize {
    let portal_resources = names.portal_resources();

    let (mut flp_modules, mut modules): (Vec<Module>, Vec<Module>) =
        std::mem::take(&mut descriptor.modules)
            .into_iter()
            .partition(|m| is_flp_module(m, &portal_resources));

    for module in &mut flp_modules {
        debug!(module = %module.name, "relocating FLP content module");
        module.add_requirement_if_absent(Requirement::named(names.html_repo_host()));
        module.add_requirement_if_absent(Requirement::named(names.ui_deployer()));
        module.add_requirement_if_absent(Requirement::named(business_service));
    }

    let relocated = flp_modules.len();
    modules.append(&mut flp_modules);
    descriptor.modules = modules;
    relocated
}
