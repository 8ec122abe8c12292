//! Casework - inspect case files from the command line
//!
//! Reads a JSON case file (a patient plus one of their cases) and reports
//! status, validity, pledge identifier and note preview.

pub mod case_file;
pub mod cli;
pub mod commands;
pub mod error;

pub use error::{CliError, Result};
