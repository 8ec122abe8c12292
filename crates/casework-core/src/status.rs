//! Case status derivation
//!
//! A case's status is never stored. It is recomputed from three flags on the
//! case and the outcomes of its calls, checking each rule in precedence
//! order and taking the first that matches:
//!
//! | precedence | condition                          | status                  |
//! |------------|------------------------------------|-------------------------|
//! | 1          | resolved without DCAF              | `Resolved Without DCAF` |
//! | 2          | pledge sent                        | `Sent Pledge`           |
//! | 3          | appointment date set               | `Fundraising`           |
//! | 4          | any call reached the patient       | `Needs Appointment`     |
//! | 5          | otherwise                          | `No Contact Made`       |

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::call::CallStatus;

/// Derived classification of case progress.
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
pub enum CaseStatus {
    #[strum(serialize = "No Contact Made")]
    #[serde(rename = "No Contact Made")]
    NoContact,

    #[strum(serialize = "Needs Appointment")]
    #[serde(rename = "Needs Appointment")]
    NeedsAppointment,

    #[strum(serialize = "Fundraising")]
    #[serde(rename = "Fundraising")]
    Fundraising,

    #[strum(serialize = "Sent Pledge")]
    #[serde(rename = "Sent Pledge")]
    PledgeSent,

    #[strum(serialize = "Resolved Without DCAF")]
    #[serde(rename = "Resolved Without DCAF")]
    Resolved,
}

impl CaseStatus {
    /// Stable machine key, e.g. `needs_appt`
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NoContact => "no_contact",
            Self::NeedsAppointment => "needs_appt",
            Self::Fundraising => "fundraising",
            Self::PledgeSent => "pledge_sent",
            Self::Resolved => "resolved",
        }
    }

    /// Look a status up by its machine key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "no_contact" => Some(Self::NoContact),
            "needs_appt" => Some(Self::NeedsAppointment),
            "fundraising" => Some(Self::Fundraising),
            "pledge_sent" => Some(Self::PledgeSent),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Human-readable label, e.g. `Needs Appointment`
    #[must_use]
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// The flags a status is derived from, detached from the case record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub resolved_without_dcaf: bool,
    pub pledge_sent: bool,
    pub appointment_date: Option<NaiveDate>,
}

/// True iff any outcome is [`CallStatus::ReachedPatient`].
pub fn contact_made<I>(outcomes: I) -> bool
where
    I: IntoIterator<Item = CallStatus>,
{
    outcomes.into_iter().any(CallStatus::is_contact)
}

/// Resolve the status for a snapshot and its call outcomes.
///
/// Total: an empty outcome list with no flags set is `NoContact`.
pub fn resolve_status<I>(snapshot: &StatusSnapshot, outcomes: I) -> CaseStatus
where
    I: IntoIterator<Item = CallStatus>,
{
    if snapshot.resolved_without_dcaf {
        CaseStatus::Resolved
    } else if snapshot.pledge_sent {
        CaseStatus::PledgeSent
    } else if snapshot.appointment_date.is_some() {
        CaseStatus::Fundraising
    } else if contact_made(outcomes) {
        CaseStatus::NeedsAppointment
    } else {
        CaseStatus::NoContact
    }
}
