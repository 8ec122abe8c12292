//! Case service: the only path that persists cases
//!
//! Every write goes through the same steps:
//!
//! 1. apply the change to a copy of the stored case
//! 2. stamp `created_by` / timestamps
//! 3. validate (record invariants plus configured lines)
//! 4. append a [`ChangeRecord`] through the [`ChangeTracker`]
//! 5. save through the [`CaseRepository`]
//!
//! A case that fails step 3 or 4 is never saved. Writes through one service
//! are serialized, so the service must be the only writer to its repository.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};

use crate::{
    audit::{modified_fields, ChangeAction, ChangeRecord, ChangeTracker, EntityRef},
    call::{Call, CallStatus},
    config::Config,
    error::{Error, Result},
    identifiers::{CaseId, Line, PatientId},
    note::Note,
    people::User,
    pregnancy::Pregnancy,
    repository::{CaseRepository, RepositoryError},
    validation::FieldError,
};

pub struct CaseService<R, T> {
    repository: R,
    tracker: T,
    config: Config,
    write_lock: Mutex<()>,
}

impl<R, T> CaseService<R, T>
where
    R: CaseRepository,
    T: ChangeTracker,
{
    pub const fn new(repository: R, tracker: T, config: Config) -> Self {
        Self {
            repository,
            tracker,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Open a new case on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the line is not permitted, or any
    /// repository/tracker error.
    pub fn open_case(
        &self,
        actor: &User,
        patient_id: PatientId,
        line: Line,
        initial_call_date: NaiveDate,
    ) -> Result<Pregnancy> {
        let mut case = Pregnancy::new(patient_id, line, initial_call_date)
            .with_created_by(actor.id.clone());

        let now = Utc::now();
        case.created_at = Some(now);
        case.updated_at = Some(now);

        self.check(&case)?;

        let _guard = self.lock_writes()?;
        self.tracker.record_change(
            &EntityRef::case(&case.id),
            &actor.id,
            now,
            ChangeAction::Create,
            modified_fields(None, &case)?,
        )?;
        self.repository.save(&case)?;

        tracing::info!(
            case_id = %case.id,
            patient_id = %case.patient_id,
            line = %case.line,
            actor = %actor.id,
            "opened case"
        );
        Ok(case)
    }

    /// Apply `mutate` to a stored case and save the result.
    ///
    /// The case's id, owner, creator and creation stamp cannot be changed
    /// by `mutate`; any edits to them are discarded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` (and saves nothing) if the mutated case is
    /// invalid, or any repository/tracker error.
    pub fn update_case<F>(&self, actor: &User, id: &CaseId, mutate: F) -> Result<Pregnancy>
    where
        F: FnOnce(&mut Pregnancy),
    {
        let _guard = self.lock_writes()?;
        let before = self.repository.load(id)?;
        let mut case = before.clone();
        mutate(&mut case);

        case.id = before.id.clone();
        case.patient_id = before.patient_id.clone();
        case.created_by.clone_from(&before.created_by);
        case.created_at = before.created_at;

        let modified = modified_fields(Some(&before), &case)?;
        if modified.is_empty() {
            tracing::debug!(case_id = %id, "update changed nothing");
            return Ok(before);
        }

        let now = Utc::now();
        case.updated_at = Some(before.created_at.map_or(now, |created| created.max(now)));

        self.check(&case)?;
        self.tracker.record_change(
            &EntityRef::case(&case.id),
            &actor.id,
            now,
            ChangeAction::Update,
            modified,
        )?;
        self.repository.save(&case)?;

        tracing::debug!(case_id = %case.id, actor = %actor.id, status = %case.status(), "updated case");
        Ok(case)
    }

    /// # Errors
    ///
    /// As [`CaseService::update_case`].
    pub fn log_call(&self, actor: &User, id: &CaseId, status: CallStatus) -> Result<Pregnancy> {
        self.update_case(actor, id, |case| {
            case.record_call(Call::new(status, actor.id.clone()));
        })
    }

    /// # Errors
    ///
    /// Returns `Error::Validation` with `full_text: missing` for blank text,
    /// otherwise as [`CaseService::update_case`].
    pub fn add_note(&self, actor: &User, id: &CaseId, text: &str) -> Result<Pregnancy> {
        if text.trim().is_empty() {
            return Err(Error::Validation(FieldError::missing("full_text").into()));
        }

        self.update_case(actor, id, |case| {
            case.add_note(Note::new(text, actor.id.clone()));
        })
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no such case was saved.
    pub fn load(&self, id: &CaseId) -> Result<Pregnancy> {
        Ok(self.repository.load(id)?)
    }

    /// Cases for a patient, oldest first.
    ///
    /// # Errors
    ///
    /// Returns any repository error.
    pub fn cases_for_patient(&self, patient_id: &PatientId) -> Result<Vec<Pregnancy>> {
        Ok(self.repository.list_for_patient(patient_id)?)
    }

    /// Change history for a case, oldest first.
    ///
    /// # Errors
    ///
    /// Returns any tracker error.
    pub fn history(&self, id: &CaseId) -> Result<Vec<ChangeRecord>> {
        Ok(self.tracker.history(&EntityRef::case(id))?)
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::from(RepositoryError::storage_error("case service write lock poisoned")))
    }

    fn check(&self, case: &Pregnancy) -> Result<()> {
        case.validate_with(&self.config).map_err(|errors| {
            tracing::warn!(case_id = %case.id, %errors, "rejected invalid case");
            Error::Validation(errors)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::{
        audit::{InMemoryChangeTracker, ModifiedFields},
        identifiers::UserId,
        repository::{InMemoryCaseRepository, RepositoryResult},
        status::CaseStatus,
    };

    /// Tracker whose writes fail for one kind of change.
    struct RejectingTracker {
        inner: InMemoryChangeTracker,
        reject: ChangeAction,
    }

    impl ChangeTracker for RejectingTracker {
        fn record_change(
            &self,
            entity: &EntityRef,
            actor: &UserId,
            timestamp: DateTime<Utc>,
            action: ChangeAction,
            modified: ModifiedFields,
        ) -> RepositoryResult<ChangeRecord> {
            if action == self.reject {
                return Err(RepositoryError::storage_error("history unavailable"));
            }
            self.inner
                .record_change(entity, actor, timestamp, action, modified)
        }

        fn history(&self, entity: &EntityRef) -> RepositoryResult<Vec<ChangeRecord>> {
            self.inner.history(entity)
        }
    }

    fn rejecting(reject: ChangeAction) -> CaseService<InMemoryCaseRepository, RejectingTracker> {
        CaseService::new(
            InMemoryCaseRepository::new(),
            RejectingTracker {
                inner: InMemoryChangeTracker::new(),
                reject,
            },
            Config::default(),
        )
    }

    type TestService = CaseService<InMemoryCaseRepository, InMemoryChangeTracker>;

    fn service_with(config: Config) -> TestService {
        CaseService::new(
            InMemoryCaseRepository::new(),
            InMemoryChangeTracker::new(),
            config,
        )
    }

    fn actor() -> User {
        User::new(UserId::parse("u-1").expect("valid id"), "Volunteer")
    }

    fn open(service: &TestService) -> Pregnancy {
        service
            .open_case(
                &actor(),
                PatientId::parse("pt-1").expect("valid id"),
                Line::parse("DC").expect("valid line"),
                NaiveDate::from_ymd_opt(2016, 6, 1).expect("valid date"),
            )
            .expect("case opened")
    }

    #[test]
    fn test_open_case_stamps_and_records() {
        let service = service_with(Config::default());
        let case = open(&service);

        assert_eq!(case.created_by, Some(actor().id));
        assert!(case.created_at.is_some());
        assert_eq!(case.created_at, case.updated_at);

        let history = service.history(&case.id).expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, ChangeAction::Create);
        assert!(history[0].modified.contains_key("line"));
    }

    #[test]
    fn test_open_case_rejects_unlisted_line() {
        let service = service_with(Config {
            lines: vec![Line::parse("VA").expect("valid line")],
            ..Config::default()
        });

        let result = service.open_case(
            &actor(),
            PatientId::parse("pt-1").expect("valid id"),
            Line::parse("DC").expect("valid line"),
            NaiveDate::from_ymd_opt(2016, 6, 1).expect("valid date"),
        );

        assert!(matches!(result, Err(Error::Validation(ref e)) if e.has_error_on("line")));
    }

    #[test]
    fn test_invalid_update_is_not_saved() {
        let service = service_with(Config::default());
        let case = open(&service);

        let result = service.update_case(&actor(), &case.id, |c| {
            c.appointment_date = NaiveDate::from_ymd_opt(2016, 5, 1);
        });

        assert!(matches!(result, Err(Error::Validation(_))));
        let stored = service.load(&case.id).expect("still stored");
        assert_eq!(stored.appointment_date, None);
        assert_eq!(service.history(&case.id).expect("history").len(), 1);
    }

    #[test]
    fn test_update_records_changed_fields_only() {
        let service = service_with(Config::default());
        let case = open(&service);

        let updated = service
            .update_case(&actor(), &case.id, |c| c.pledge_sent = true)
            .expect("updated");
        assert_eq!(updated.status(), CaseStatus::PledgeSent);

        let history = service.history(&case.id).expect("history");
        let last = history.last().expect("has entries");
        assert_eq!(last.action, ChangeAction::Update);
        assert_eq!(last.version, 2);
        assert_eq!(
            last.modified.get("pledge_sent"),
            Some(&serde_json::Value::Bool(true))
        );
        assert!(!last.modified.contains_key("line"));
    }

    #[test]
    fn test_noop_update_records_nothing() {
        let service = service_with(Config::default());
        let case = open(&service);

        service
            .update_case(&actor(), &case.id, |_| {})
            .expect("noop ok");
        assert_eq!(service.history(&case.id).expect("history").len(), 1);
    }

    #[test]
    fn test_update_cannot_change_identity() {
        let service = service_with(Config::default());
        let case = open(&service);

        let updated = service
            .update_case(&actor(), &case.id, |c| {
                c.id = CaseId::generate();
                c.patient_id = PatientId::parse("pt-9").expect("valid id");
                c.created_by = Some(UserId::parse("u-2").expect("valid id"));
                c.pledge_sent = true;
            })
            .expect("updated");

        assert_eq!(updated.id, case.id);
        assert_eq!(updated.patient_id, case.patient_id);
        assert_eq!(updated.created_by, case.created_by);
        assert_eq!(
            service.load(&case.id).expect("stored").created_by,
            Some(actor().id)
        );
    }

    #[test]
    fn test_update_by_other_user_keeps_creator() {
        let service = service_with(Config::default());
        let case = open(&service);
        let other = User::new(UserId::parse("u-2").expect("valid id"), "Second Volunteer");

        let updated = service
            .log_call(&other, &case.id, CallStatus::ReachedPatient)
            .expect("call logged");

        assert_eq!(updated.created_by, Some(actor().id));
        let history = service.history(&case.id).expect("history");
        assert_eq!(history.last().expect("has entries").actor, other.id);
    }

    #[test]
    fn test_open_case_not_stored_when_history_fails() {
        let service = rejecting(ChangeAction::Create);

        let result = service.open_case(
            &actor(),
            PatientId::parse("pt-1").expect("valid id"),
            Line::parse("DC").expect("valid line"),
            NaiveDate::from_ymd_opt(2016, 6, 1).expect("valid date"),
        );

        assert!(matches!(
            result,
            Err(Error::Repository(RepositoryError::StorageError(_)))
        ));
        let stored = service
            .cases_for_patient(&PatientId::parse("pt-1").expect("valid id"))
            .expect("listed");
        assert!(stored.is_empty());
    }

    #[test]
    fn test_update_not_stored_when_history_fails() {
        let service = rejecting(ChangeAction::Update);
        let case = service
            .open_case(
                &actor(),
                PatientId::parse("pt-1").expect("valid id"),
                Line::parse("DC").expect("valid line"),
                NaiveDate::from_ymd_opt(2016, 6, 1).expect("valid date"),
            )
            .expect("case opened");

        let result = service.update_case(&actor(), &case.id, |c| c.pledge_sent = true);

        assert!(matches!(result, Err(Error::Repository(_))));
        let stored = service.load(&case.id).expect("still stored");
        assert_eq!(stored, case);
        assert_eq!(service.history(&case.id).expect("history").len(), 1);
    }

    #[test]
    fn test_concurrent_calls_are_all_kept() {
        let service = service_with(Config::default());
        let case = open(&service);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        service
                            .log_call(&actor(), &case.id, CallStatus::LeftVoicemail)
                            .expect("call logged");
                    }
                });
            }
        });

        let stored = service.load(&case.id).expect("stored");
        assert_eq!(stored.calls.len(), 20);
        assert_eq!(service.history(&case.id).expect("history").len(), 21);
    }

    #[test]
    fn test_log_call_moves_status() {
        let service = service_with(Config::default());
        let case = open(&service);

        let after_voicemail = service
            .log_call(&actor(), &case.id, CallStatus::LeftVoicemail)
            .expect("call logged");
        assert_eq!(after_voicemail.status(), CaseStatus::NoContact);

        let after_contact = service
            .log_call(&actor(), &case.id, CallStatus::ReachedPatient)
            .expect("call logged");
        assert_eq!(after_contact.status(), CaseStatus::NeedsAppointment);
        assert_eq!(after_contact.calls.len(), 2);
    }

    #[test]
    fn test_add_note_rejects_blank_text() {
        let service = service_with(Config::default());
        let case = open(&service);

        let result = service.add_note(&actor(), &case.id, "   ");
        assert!(matches!(result, Err(Error::Validation(ref e)) if e.has_error_on("full_text")));

        let updated = service
            .add_note(&actor(), &case.id, "Patient asked for a callback")
            .expect("note added");
        assert_eq!(
            updated.most_recent_note_display_text().as_deref(),
            Some("Patient asked for a callback")
        );
    }

    #[test]
    fn test_cases_for_patient() {
        let service = service_with(Config::default());
        let first = open(&service);
        let second = open(&service);

        let cases = service
            .cases_for_patient(&first.patient_id)
            .expect("listed");
        let ids: Vec<_> = cases.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
    }

    #[test]
    fn test_update_missing_case_is_not_found() {
        let service = service_with(Config::default());
        let result = service.update_case(&actor(), &CaseId::generate(), |c| c.pledge_sent = true);
        assert!(matches!(
            result,
            Err(Error::Repository(crate::repository::RepositoryError::NotFound(_)))
        ));
    }
}
