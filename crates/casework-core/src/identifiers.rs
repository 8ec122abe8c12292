//! Semantic newtypes for record identifiers and short codes
//!
//! Each type validates on construction (trimming surrounding whitespace
//! first) and deserializes through the same validation, so a value that
//! exists is always well formed.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for identifier and short-code validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Value is empty or whitespace-only
    #[error("identifier cannot be empty")]
    Empty,

    /// Value exceeds the maximum length for its type
    #[error("identifier too long: {actual} characters (max {max})")]
    TooLong {
        /// The maximum allowed length
        max: usize,
        /// The actual length provided
        actual: usize,
    },

    /// Value contains characters not allowed for its type
    #[error("identifier contains invalid characters: {details}")]
    InvalidCharacters {
        /// Human-readable explanation of what's invalid
        details: String,
    },

    /// Phone number does not normalize to the expected digit count
    #[error("phone number must have {expected} digits (got {actual})")]
    InvalidPhoneNumber {
        /// Required digit count
        expected: usize,
        /// Digits found after stripping punctuation
        actual: usize,
    },
}

impl IdentifierError {
    /// Create a `TooLong` error variant
    #[must_use]
    pub const fn too_long(max: usize, actual: usize) -> Self {
        Self::TooLong { max, actual }
    }

    /// Create an `InvalidCharacters` error variant
    #[must_use]
    pub fn invalid_characters(details: impl Into<String>) -> Self {
        Self::InvalidCharacters {
            details: details.into(),
        }
    }
}

/// Record ids: 1-128 ASCII characters from `[A-Za-z0-9-_.:]`.
fn validate_record_id(s: &str) -> Result<(), IdentifierError> {
    if s.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if s.len() > 128 {
        return Err(IdentifierError::too_long(128, s.len()));
    }

    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
    {
        return Err(IdentifierError::invalid_characters(format!(
            "'{s}' must contain only letters, numbers, hyphens, underscores, dots, or colons"
        )));
    }

    Ok(())
}

/// Declares a validated string identifier newtype with the usual
/// conversions (`parse`, `FromStr`, `TryFrom`, `Display`, serde).
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate (trims whitespace first).
            ///
            /// # Errors
            ///
            /// Returns `IdentifierError` if the value is empty, too long, or
            /// contains characters outside `[A-Za-z0-9-_.:]`.
            pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
                let s = s.into();
                let trimmed = s.trim();
                validate_record_id(trimmed)?;
                Ok(Self(trimmed.to_string()))
            }

            /// Get the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdentifierError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            #[allow(clippy::use_self)]
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

record_id! {
    /// Identifier of a case (pregnancy) record
    CaseId
}

record_id! {
    /// Identifier of a patient record
    PatientId
}

record_id! {
    /// Identifier of a staff user
    UserId
}

impl CaseId {
    /// Generate a fresh random case id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// The hotline a case came in on, e.g. `DC`.
///
/// # Guarantees
///
/// - 1-8 ASCII alphanumeric characters
/// - Stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Line(String);

impl Line {
    /// Maximum allowed length for a line code
    pub const MAX_LENGTH: usize = 8;

    /// Parse a line code (trimmed, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` if the code is empty, longer than
    /// [`Line::MAX_LENGTH`], or not ASCII alphanumeric.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(IdentifierError::too_long(Self::MAX_LENGTH, trimmed.len()));
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::invalid_characters(format!(
                "line '{trimmed}' must be letters and numbers only"
            )));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the line code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character of the code.
    #[must_use]
    pub fn initial(&self) -> char {
        // Non-empty ASCII by construction.
        char::from(self.0.as_bytes()[0])
    }
}

impl TryFrom<String> for Line {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl std::str::FromStr for Line {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Line> for String {
    #[allow(clippy::use_self)]
    fn from(line: Line) -> String {
        line.0
    }
}

/// A ten-digit phone number, stored as digits only.
///
/// Punctuation and spaces are stripped on parse, so `123-456-7890`,
/// `(123) 456 7890` and `1234567890` are the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a normalized phone number
    pub const DIGITS: usize = 10;

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Empty` for blank input,
    /// `InvalidCharacters` for letters, and `InvalidPhoneNumber` when the
    /// digit count is not [`PhoneNumber::DIGITS`].
    pub fn parse(s: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let raw = s.as_ref().trim();

        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if raw.chars().any(char::is_alphabetic) {
            return Err(IdentifierError::invalid_characters(format!(
                "phone number '{raw}' contains letters"
            )));
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != Self::DIGITS {
            return Err(IdentifierError::InvalidPhoneNumber {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// The normalized digits
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// The last four digits
    #[must_use]
    pub fn last_four(&self) -> &str {
        &self.0[Self::DIGITS - 4..]
    }

    /// The digit immediately preceding the last four.
    #[must_use]
    pub fn digit_before_last_four(&self) -> char {
        char::from(self.0.as_bytes()[Self::DIGITS - 5])
    }

    /// Human-readable `xxx-xxx-xxxx` form
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}-{}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<PhoneNumber> for String {
    #[allow(clippy::use_self)]
    fn from(phone: PhoneNumber) -> String {
        phone.0
    }
}
