//! Patients and staff users referenced by cases

use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{PatientId, PhoneNumber, UserId},
    validation::{FieldError, ValidationErrors},
};

/// A patient seeking support. Owns zero or more cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub primary_phone: PhoneNumber,
    #[serde(default)]
    pub other_phone: Option<PhoneNumber>,
}

impl Patient {
    /// # Errors
    ///
    /// Returns `name: missing` when the name is blank.
    pub fn new(
        id: PatientId,
        name: impl Into<String>,
        primary_phone: PhoneNumber,
    ) -> Result<Self, ValidationErrors> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldError::missing("name").into());
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            primary_phone,
            other_phone: None,
        })
    }

    #[must_use]
    pub fn with_other_phone(mut self, phone: PhoneNumber) -> Self {
        self.other_phone = Some(phone);
        self
    }
}

/// A staff member or volunteer acting on cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
