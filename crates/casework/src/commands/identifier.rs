//! Identifier command implementation

use serde_json::json;

use super::CommandOutput;
use crate::{case_file::CaseFile, error::Result};

/// Print the pledge identifier for the file's case.
///
/// # Errors
///
/// Returns `CliError::Core` if the case does not belong to the file's
/// patient.
pub fn run(file: &CaseFile) -> Result<CommandOutput> {
    let identifier = file.pregnancy.pledge_identifier(&file.patient)?;

    Ok(CommandOutput {
        json: json!({
            "case_id": file.pregnancy.id,
            "pledge_identifier": identifier,
        }),
        text: identifier,
    })
}

#[cfg(test)]
mod tests {
    use casework_core::PatientId;

    use super::*;
    use crate::{commands::fixtures, error::CliError};

    #[test]
    fn test_identifier() {
        let output = run(&fixtures::case_file()).expect("identifier");
        assert_eq!(output.text, "D3-5555");
        assert_eq!(output.json["pledge_identifier"], "D3-5555");
    }

    #[test]
    fn test_identifier_requires_owning_patient() {
        let mut file = fixtures::case_file();
        file.patient.id = PatientId::parse("pt-2").expect("valid id");

        assert!(matches!(
            run(&file),
            Err(CliError::Core(casework_core::Error::PatientMismatch { .. }))
        ));
    }
}
