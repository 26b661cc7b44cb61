//! Validate command implementation

use crate::cli::error::CliError;
use crate::cli::output::format_validation;
use crate::models::Descriptor;
use crate::validation::validate_descriptor;
use std::io::Read;
use std::path::PathBuf;

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Check descriptor content, returning the formatted report
pub fn validate_content(label: &str, content: &str) -> Result<String, CliError> {
    let descriptor: Descriptor = serde_yaml::from_str(content)
        .map_err(|e| CliError::ValidationError(format!("{} is not a valid descriptor: {}", label, e)))?;

    let result = validate_descriptor(&descriptor);
    let report = format_validation(label, &result);

    if result.is_valid() {
        Ok(report)
    } else {
        Err(CliError::ValidationError(report))
    }
}

/// Handle the validate command
pub fn handle_validate(input: &str) -> Result<(), CliError> {
    let content = load_input(input)?;
    let report = validate_content(input, &content)?;
    print!("{}", report);
    Ok(())
}
