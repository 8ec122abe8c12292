//! The case record ("pregnancy") and its business rules
//!
//! A case belongs to one patient, is opened on a line by a user, and
//! accumulates calls and notes. Its status is derived on demand from its
//! flags and calls (see [`crate::status`]).
//!
//! # Invariants
//!
//! 1. `initial_call_date` is required
//! 2. `created_by` is required
//! 3. `appointment_date`, when set, is not before `initial_call_date`
//!
//! These are checked by [`Pregnancy::validate`] rather than enforced by the
//! type, because records arrive half-filled from forms and imports and must
//! report every problem at once.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    call::{Call, CallStatus},
    config::Config,
    error::{Error, Result},
    identifiers::{CaseId, Line, PatientId, UserId},
    note::{Note, DEFAULT_PREVIEW_CHARS},
    people::Patient,
    status::{self, CaseStatus, StatusSnapshot},
    validation::{FieldError, ValidationErrors},
};

/// A patient support case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pregnancy {
    pub id: CaseId,
    pub patient_id: PatientId,
    pub line: Line,
    pub initial_call_date: Option<NaiveDate>,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub pledge_sent: bool,
    #[serde(default)]
    pub resolved_without_dcaf: bool,
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Calls in the order they were logged
    #[serde(default)]
    pub calls: Vec<Call>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Pregnancy {
    /// A new, unsaved case. `created_by` and timestamps are stamped on save.
    #[must_use]
    pub fn new(patient_id: PatientId, line: Line, initial_call_date: NaiveDate) -> Self {
        Self {
            id: CaseId::generate(),
            patient_id,
            line,
            initial_call_date: Some(initial_call_date),
            appointment_date: None,
            pledge_sent: false,
            resolved_without_dcaf: false,
            created_by: None,
            created_at: None,
            updated_at: None,
            calls: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_created_by(mut self, user: UserId) -> Self {
        self.created_by = Some(user);
        self
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check the record's own invariants.
    ///
    /// # Errors
    ///
    /// Returns every violated rule as a [`FieldError`].
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.collect_errors().into_result()
    }

    /// [`Pregnancy::validate`] plus configuration rules (permitted lines).
    ///
    /// # Errors
    ///
    /// Returns every violated rule as a [`FieldError`].
    pub fn validate_with(&self, config: &Config) -> std::result::Result<(), ValidationErrors> {
        let mut errors = self.collect_errors();
        if !config.permits_line(&self.line) {
            errors.push(FieldError::not_permitted("line"));
        }
        errors.into_result()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn collect_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.initial_call_date.is_none() {
            errors.push(FieldError::missing("initial_call_date"));
        }

        if self.created_by.is_none() {
            errors.push(FieldError::missing("created_by"));
        }

        if let (Some(appointment), Some(initial)) = (self.appointment_date, self.initial_call_date)
        {
            if appointment < initial {
                errors.push(FieldError::date_before(
                    "appointment_date",
                    "initial_call_date",
                ));
            }
        }

        errors
    }

    // ========================================================================
    // STATUS
    // ========================================================================

    /// The flags status is derived from.
    #[must_use]
    pub const fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            resolved_without_dcaf: self.resolved_without_dcaf,
            pledge_sent: self.pledge_sent,
            appointment_date: self.appointment_date,
        }
    }

    pub fn call_outcomes(&self) -> impl Iterator<Item = CallStatus> + '_ {
        self.calls.iter().map(|call| call.status)
    }

    #[must_use]
    pub fn status(&self) -> CaseStatus {
        status::resolve_status(&self.snapshot(), self.call_outcomes())
    }

    /// Whether any call has reached the patient.
    #[must_use]
    pub fn contact_made(&self) -> bool {
        status::contact_made(self.call_outcomes())
    }

    // ========================================================================
    // CALLS AND NOTES
    // ========================================================================

    pub fn record_call(&mut self, call: Call) {
        self.calls.push(call);
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Latest note by `created_at`; on a tie the one added last.
    #[must_use]
    pub fn most_recent_note(&self) -> Option<&Note> {
        self.notes.iter().max_by_key(|note| note.created_at)
    }

    /// First 44 characters of the most recent note.
    #[must_use]
    pub fn most_recent_note_display_text(&self) -> Option<String> {
        self.note_preview(DEFAULT_PREVIEW_CHARS)
    }

    #[must_use]
    pub fn note_preview(&self, width: usize) -> Option<String> {
        self.most_recent_note().map(|note| note.preview(width))
    }

    // ========================================================================
    // IDENTIFIERS
    // ========================================================================

    /// Short code printed on pledges: line initial, the digit before the
    /// patient's last four, a dash, then the last four.
    ///
    /// Line `DC` and phone `111-333-5555` give `D3-5555`.
    ///
    /// # Errors
    ///
    /// Returns `Error::PatientMismatch` if `patient` does not own this case.
    pub fn pledge_identifier(&self, patient: &Patient) -> Result<String> {
        if patient.id != self.patient_id {
            return Err(Error::PatientMismatch {
                expected: self.patient_id.clone(),
                actual: patient.id.clone(),
            });
        }

        let phone = &patient.primary_phone;
        Ok(format!(
            "{}{}-{}",
            self.line.initial(),
            phone.digit_before_last_four(),
            phone.last_four()
        ))
    }
}
