//! Validate command implementation

use casework_core::{Config, FieldError};
use itertools::Itertools;
use serde_json::json;

use super::CommandOutput;
use crate::case_file::CaseFile;

/// Outcome of validating one case file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn output(&self, file: &CaseFile) -> CommandOutput {
        let text = if self.is_valid() {
            "valid".to_string()
        } else {
            self.errors.iter().join("\n")
        };

        CommandOutput {
            text,
            json: json!({
                "case_id": file.pregnancy.id,
                "valid": self.is_valid(),
                "errors": self.errors,
            }),
        }
    }
}

/// Check the case against its own rules and the configured lines.
#[must_use]
pub fn run(file: &CaseFile, config: &Config) -> ValidationReport {
    let errors = file
        .pregnancy
        .validate_with(config)
        .err()
        .map(|errors| errors.iter().copied().collect())
        .unwrap_or_default();

    ValidationReport { errors }
}
