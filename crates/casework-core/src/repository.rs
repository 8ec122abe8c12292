//! Repository trait for case persistence
//!
//! Business logic depends on [`CaseRepository`], not on a storage engine.
//! Cases are never deleted, so the trait has no delete. The in-memory
//! implementation keeps every saved case in a persistent map.

use std::sync::RwLock;

use crate::{
    identifiers::{CaseId, PatientId},
    pregnancy::Pregnancy,
};

/// Common errors across repository and change-tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Entity not found in repository
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Conflict with existing data
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying storage failure
    #[error("storage error: {0}")]
    StorageError(String),
}

impl RepositoryError {
    /// Create a not found error
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} '{id}'"))
    }

    /// Create a conflict error
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    /// Create a storage error
    #[must_use]
    pub fn storage_error(reason: impl Into<String>) -> Self {
        Self::StorageError(reason.into())
    }
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for case records.
///
/// # Error Conditions
///
/// - `NotFound`: no case with the given id
/// - `Conflict`: a save would move a case to a different patient
/// - `StorageError`: the backing store failed
pub trait CaseRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `NotFound` if no case with `id` was saved.
    fn load(&self, id: &CaseId) -> RepositoryResult<Pregnancy>;

    /// Insert or replace a case.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a stored case with the same id belongs to a
    /// different patient.
    fn save(&self, case: &Pregnancy) -> RepositoryResult<()>;

    /// Cases for a patient, oldest first.
    fn list_for_patient(&self, patient: &PatientId) -> RepositoryResult<Vec<Pregnancy>>;
}

#[derive(Debug, Default)]
pub struct InMemoryCaseRepository {
    cases: RwLock<im::HashMap<CaseId, Pregnancy>>,
}

impl InMemoryCaseRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::storage_error("case store lock poisoned")
}

impl CaseRepository for InMemoryCaseRepository {
    fn load(&self, id: &CaseId) -> RepositoryResult<Pregnancy> {
        let cases = self.cases.read().map_err(|_| poisoned())?;
        cases
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("pregnancy", id))
    }

    fn save(&self, case: &Pregnancy) -> RepositoryResult<()> {
        let mut cases = self.cases.write().map_err(|_| poisoned())?;

        if let Some(existing) = cases.get(&case.id) {
            if existing.patient_id != case.patient_id {
                return Err(RepositoryError::conflict(format!(
                    "pregnancy '{}' belongs to patient '{}'",
                    case.id, existing.patient_id
                )));
            }
        }

        cases.insert(case.id.clone(), case.clone());
        Ok(())
    }

    fn list_for_patient(&self, patient: &PatientId) -> RepositoryResult<Vec<Pregnancy>> {
        let cases = self.cases.read().map_err(|_| poisoned())?;
        let mut found: Vec<Pregnancy> = cases
            .values()
            .filter(|case| &case.patient_id == patient)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::identifiers::Line;

    fn case_for(patient: &str) -> Pregnancy {
        Pregnancy::new(
            PatientId::parse(patient).expect("valid id"),
            Line::parse("DC").expect("valid line"),
            NaiveDate::from_ymd_opt(2016, 6, 1).expect("valid date"),
        )
    }

    #[test]
    fn test_save_then_load() {
        let repo = InMemoryCaseRepository::new();
        let case = case_for("pt-1");

        repo.save(&case).expect("saved");
        assert_eq!(repo.load(&case.id).expect("loaded"), case);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let repo = InMemoryCaseRepository::new();
        let result = repo.load(&CaseId::generate());
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_save_cannot_move_case_between_patients() {
        let repo = InMemoryCaseRepository::new();
        let case = case_for("pt-1");
        repo.save(&case).expect("saved");

        let moved = Pregnancy {
            patient_id: PatientId::parse("pt-2").expect("valid id"),
            ..case
        };
        assert!(matches!(repo.save(&moved), Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_list_for_patient_filters() {
        let repo = InMemoryCaseRepository::new();
        repo.save(&case_for("pt-1")).expect("saved");
        repo.save(&case_for("pt-1")).expect("saved");
        repo.save(&case_for("pt-2")).expect("saved");

        let found = repo
            .list_for_patient(&PatientId::parse("pt-1").expect("valid id"))
            .expect("listed");
        assert_eq!(found.len(), 2);
    }
}
