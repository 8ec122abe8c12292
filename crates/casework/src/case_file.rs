//! Case file format
//!
//! ```json
//! {
//!   "patient": { "id": "pt-1", "name": "Susan Smith", "primary_phone": "111-333-5555" },
//!   "case": {
//!     "id": "case-1",
//!     "patient_id": "pt-1",
//!     "line": "DC",
//!     "initial_call_date": "2016-06-01",
//!     "created_by": "user-1",
//!     "calls": [{ "status": "Reached patient", "created_by": "user-1", "created_at": "2016-06-02T10:00:00Z" }]
//!   }
//! }
//! ```

use std::path::Path;

use casework_core::{Patient, Pregnancy};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub patient: Patient,
    #[serde(rename = "case")]
    pub pregnancy: Pregnancy,
}

impl CaseFile {
    /// # Errors
    ///
    /// Returns `CliError::Parse` if the content is not a valid case file.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| CliError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns `CliError::Read` if the file cannot be read, or
    /// `CliError::Parse` if it is not a valid case file.
    pub async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let file = Self::parse(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            case_id = %file.pregnancy.id,
            "loaded case file"
        );
        Ok(file)
    }
}
