//! Casework-core - case records for a patient-support hotline
//!
//! This crate provides:
//! - Case ("pregnancy") records with field-level validation
//! - Status derivation from case flags and call outcomes
//! - Note previews and pledge identifiers
//! - Repository and change-tracking traits with in-memory implementations
//! - A case service that stamps, validates and audits every save
//! - Layered configuration

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod call;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod note;
pub mod people;
pub mod pregnancy;
pub mod repository;
pub mod service;
pub mod status;
pub mod validation;

pub use audit::{
    ChangeAction, ChangeRecord, ChangeTracker, EntityRef, InMemoryChangeTracker, ModifiedFields,
};
pub use call::{Call, CallStatus};
pub use config::{Config, ConfigError, PartialConfig};
pub use error::{Error, Result};
pub use identifiers::{CaseId, IdentifierError, Line, PatientId, PhoneNumber, UserId};
pub use note::Note;
pub use people::{Patient, User};
pub use pregnancy::Pregnancy;
pub use repository::{CaseRepository, InMemoryCaseRepository, RepositoryError, RepositoryResult};
pub use service::CaseService;
pub use status::{CaseStatus, StatusSnapshot};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};
