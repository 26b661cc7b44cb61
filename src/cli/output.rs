//! Output formatting for CLI

use crate::cf::CreateServiceRequest;
use crate::models::{Descriptor, Topology};
use crate::validation::DescriptorValidationResult;
use crate::{DeployOutcome, ProvisionReport};

fn format_summary(output: &mut String, descriptor: &Descriptor, topology: Topology) {
    output.push_str(&format!("\n✅ Descriptor '{}' ({} approuter)\n", descriptor.id, topology));
    output.push_str(&format!("  Modules: {}\n", descriptor.module_names().join(", ")));
    output.push_str(&format!("  Resources: {}\n", descriptor.resource_names().join(", ")));
}

fn format_report(output: &mut String, report: &ProvisionReport) {
    if report.created.is_empty() {
        output.push_str("  No service instances created\n");
    } else {
        output.push_str(&format!("  Created: {}\n", report.created.join(", ")));
    }
    if !report.already_present.is_empty() {
        output.push_str(&format!(
            "  Already present: {}\n",
            report.already_present.join(", ")
        ));
    }
}

/// Format the result of a full provisioning run
pub fn format_outcome(outcome: &DeployOutcome) -> String {
    let mut output = String::new();
    format_summary(&mut output, &outcome.descriptor, outcome.topology);
    format_report(&mut output, &outcome.provisioning);
    output
}

/// Format a dry run: summary, planned creations and the YAML that would be written
pub fn format_dry_run(
    descriptor: &Descriptor,
    topology: Topology,
    planned: &[CreateServiceRequest],
    yaml: &str,
) -> String {
    let mut output = String::new();
    format_summary(&mut output, descriptor, topology);

    if planned.is_empty() {
        output.push_str("  No service instances would be created\n");
    } else {
        output.push_str("  Would create:\n");
        for request in planned {
            output.push_str(&format!(
                "    - {} ({} / {})\n",
                request.instance_name, request.offering, request.plan
            ));
        }
    }

    output.push_str("\n--- descriptor ---\n");
    output.push_str(yaml);
    output
}

/// Format descriptor validation results
pub fn format_validation(path: &str, result: &DescriptorValidationResult) -> String {
    if result.is_valid() {
        return format!("✅ {} is valid\n", path);
    }

    let mut output = format!("⚠️  {} has {} issue(s):\n", path, result.issues.len());
    for issue in &result.issues {
        output.push_str(&format!("  - {}\n", issue));
    }
    output
}
