//! Commands module for casework CLI
//!
//! Each command is a pure function from a loaded case file to a
//! [`CommandOutput`]; the handlers do the printing.

pub mod identifier;
pub mod note;
pub mod status;
pub mod validate;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What a command has to say, in both renderings.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub text: String,
    pub json: Value,
}

impl CommandOutput {
    #[must_use]
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.text.clone(),
            OutputFormat::Json => self.json.to_string(),
        }
    }
}
