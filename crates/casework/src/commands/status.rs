//! Status command implementation

use serde_json::json;

use super::CommandOutput;
use crate::case_file::CaseFile;

/// Report the derived status; `as_key` prints `needs_appt` instead of
/// `Needs Appointment`.
#[must_use]
pub fn run(file: &CaseFile, as_key: bool) -> CommandOutput {
    let case = &file.pregnancy;
    let status = case.status();

    let text = if as_key { status.key() } else { status.label() };

    CommandOutput {
        text: text.to_string(),
        json: json!({
            "case_id": case.id,
            "status": status.label(),
            "key": status.key(),
            "contact_made": case.contact_made(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use casework_core::{Call, CallStatus, UserId};

    use super::*;
    use crate::commands::{fixtures, OutputFormat};

    #[test]
    fn test_status_label_and_key() {
        let mut file = fixtures::case_file();
        assert_eq!(run(&file, false).text, "No Contact Made");

        file.pregnancy.record_call(Call::new(
            CallStatus::ReachedPatient,
            UserId::parse("user-1").expect("valid id"),
        ));
        assert_eq!(run(&file, false).text, "Needs Appointment");
        assert_eq!(run(&file, true).text, "needs_appt");
    }

    #[test]
    fn test_status_json() {
        let file = fixtures::case_file();
        let rendered = run(&file, false).render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(value["case_id"], "case-1");
        assert_eq!(value["key"], "no_contact");
        assert_eq!(value["contact_made"], false);
    }
}
