//! Field-level validation results
//!
//! Validation never fails fast: every rule runs and each violation is
//! collected as a [`FieldError`], so callers can report all problems at once.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field has no value
    Missing,
    /// A date precedes the field it must follow
    DateBefore {
        /// The field it must not precede
        other: &'static str,
    },
    /// Value is well formed but not allowed by configuration
    NotPermitted,
}

/// A single failed rule on a named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    #[must_use]
    pub const fn missing(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Missing,
        }
    }

    #[must_use]
    pub const fn date_before(field: &'static str, other: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::DateBefore { other },
        }
    }

    #[must_use]
    pub const fn not_permitted(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::NotPermitted,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::Missing => write!(f, "{} is required", self.field),
            FieldErrorKind::DateBefore { other } => {
                write!(f, "{} must not be before {other}", self.field)
            }
            FieldErrorKind::NotPermitted => write!(f, "{} is not permitted", self.field),
        }
    }
}

/// All field errors found on one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Whether any error was recorded against `field`.
    #[must_use]
    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.iter().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
