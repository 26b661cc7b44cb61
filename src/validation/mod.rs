//! Validation module
//!
//! Validates deployment descriptors against their structural invariants.

pub mod descriptor;

pub use descriptor::{DescriptorIssue, DescriptorValidationResult, validate_descriptor};
