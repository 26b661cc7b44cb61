//! Descriptor validation functionality
//!
//! Checks the uniqueness invariants of a descriptor: a non-empty `ID`, unique
//! module names, unique resource names and unique requirement names per module.

use crate::models::{Descriptor, Requirement};
use std::collections::HashSet;

/// A single invariant violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorIssue {
    EmptyId,
    DuplicateModule { name: String },
    DuplicateResource { name: String },
    DuplicateRequirement { module: String, name: String },
    DuplicateBuildRequirement { module: String, name: String },
}

impl std::fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorIssue::EmptyId => write!(f, "descriptor ID is empty"),
            DescriptorIssue::DuplicateModule { name } => write!(f, "duplicate module '{}'", name),
            DescriptorIssue::DuplicateResource { name } => {
                write!(f, "duplicate resource '{}'", name)
            }
            DescriptorIssue::DuplicateRequirement { module, name } => {
                write!(f, "module '{}' requires '{}' more than once", module, name)
            }
            DescriptorIssue::DuplicateBuildRequirement { module, name } => write!(
                f,
                "module '{}' has build requirement '{}' more than once",
                module, name
            ),
        }
    }
}

/// Result of descriptor validation
#[derive(Debug, Default)]
pub struct DescriptorValidationResult {
    pub issues: Vec<DescriptorIssue>,
}

impl DescriptorValidationResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Names that occur more than once, each reported once in first-repeat order
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            duplicates.push(name.to_string());
        }
    }
    duplicates
}

fn requirement_names(requires: &[Requirement]) -> impl Iterator<Item = &str> {
    requires.iter().map(|r| r.name.as_str())
}

/// Validate a descriptor against its uniqueness invariants
pub fn validate_descriptor(descriptor: &Descriptor) -> DescriptorValidationResult {
    let mut issues = Vec::new();

    if descriptor.id.trim().is_empty() {
        issues.push(DescriptorIssue::EmptyId);
    }

    issues.extend(
        duplicates(descriptor.modules.iter().map(|m| m.name.as_str()))
            .into_iter()
            .map(|name| DescriptorIssue::DuplicateModule { name }),
    );
    issues.extend(
        duplicates(descriptor.resources.iter().map(|r| r.name.as_str()))
            .into_iter()
            .map(|name| DescriptorIssue::DuplicateResource { name }),
    );

    for module in &descriptor.modules {
        issues.extend(duplicates(requirement_names(&module.requires)).into_iter().map(
            |name| DescriptorIssue::DuplicateRequirement {
                module: module.name.clone(),
                name,
            },
        ));
        if let Some(build) = &module.build_parameters {
            issues.extend(duplicates(requirement_names(&build.requires)).into_iter().map(
                |name| DescriptorIssue::DuplicateBuildRequirement {
                    module: module.name.clone(),
                    name,
                },
            ));
        }
    }

    DescriptorValidationResult { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, ModuleType, Resource};

    #[test]
    fn test_valid_descriptor() {
        let mut descriptor = Descriptor::new("p");
        descriptor.modules.push(Module::new("a", ModuleType::Html5));
        descriptor.resources.push(Resource::managed("r", "xsuaa", "application"));
        assert!(validate_descriptor(&descriptor).is_valid());
    }

    #[test]
    fn test_reports_each_invariant() {
        let mut descriptor = Descriptor::new(" ");
        let mut module = Module::new("a", ModuleType::Html5);
        module.requires.push(Requirement::named("x"));
        module.requires.push(Requirement::named("x"));
        module.requires.push(Requirement::named("x"));
        descriptor.modules.push(module);
        descriptor.modules.push(Module::new("a", ModuleType::Html5));
        descriptor.resources.push(Resource::managed("r", "s", "p"));
        descriptor.resources.push(Resource::managed("r", "s", "p"));

        let result = validate_descriptor(&descriptor);
        assert_eq!(
            result.issues,
            vec![
                DescriptorIssue::EmptyId,
                DescriptorIssue::DuplicateModule { name: "a".into() },
                DescriptorIssue::DuplicateResource { name: "r".into() },
                DescriptorIssue::DuplicateRequirement {
                    module: "a".into(),
                    name: "x".into()
                },
            ]
        );
    }
}
