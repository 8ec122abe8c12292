//! Note command implementation

use serde_json::json;

use super::CommandOutput;
use crate::case_file::CaseFile;

/// Preview the most recent note, `width` characters wide.
#[must_use]
pub fn run(file: &CaseFile, width: usize) -> CommandOutput {
    let preview = file.pregnancy.note_preview(width);

    CommandOutput {
        text: preview.clone().unwrap_or_else(|| "(no notes)".to_string()),
        json: json!({
            "case_id": file.pregnancy.id,
            "note": preview,
        }),
    }
}
