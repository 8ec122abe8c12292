//! Calls logged against a case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::identifiers::UserId;

/// Outcome of a call attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum CallStatus {
    #[strum(serialize = "Reached patient")]
    #[serde(rename = "Reached patient")]
    ReachedPatient,

    #[strum(serialize = "Left voicemail")]
    #[serde(rename = "Left voicemail")]
    LeftVoicemail,

    #[strum(serialize = "Couldn't reach patient")]
    #[serde(rename = "Couldn't reach patient")]
    CouldNotReach,
}

impl CallStatus {
    /// Whether this outcome counts as contact with the patient.
    #[must_use]
    pub const fn is_contact(self) -> bool {
        matches!(self, Self::ReachedPatient)
    }
}

/// A single call attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// How the call went
    pub status: CallStatus,
    /// Who made the call
    pub created_by: UserId,
    /// When the call was logged
    pub created_at: DateTime<Utc>,
}

impl Call {
    /// Log a call made now.
    #[must_use]
    pub fn new(status: CallStatus, created_by: UserId) -> Self {
        Self::at(status, created_by, Utc::now())
    }

    /// Log a call at an explicit time.
    #[must_use]
    pub const fn at(status: CallStatus, created_by: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            status,
            created_by,
            created_at,
        }
    }
}
