//! Change tracking
//!
//! Every save of a tracked record appends a [`ChangeRecord`] naming who
//! changed it, when, and which top-level fields changed. The tracker is a
//! collaborator behind the [`ChangeTracker`] trait; [`InMemoryChangeTracker`]
//! backs tests and the CLI.

use std::{collections::BTreeMap, sync::RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    identifiers::{CaseId, UserId},
    repository::{RepositoryError, RepositoryResult},
};

/// Which record a change belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Record type, e.g. `pregnancy`
    pub scope: String,
    pub id: String,
}

impl EntityRef {
    #[must_use]
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn case(id: &CaseId) -> Self {
        Self::new("pregnancy", id.as_str())
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.scope, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Create,
    Update,
}

/// Field name to new value, for the fields a change touched.
pub type ModifiedFields = BTreeMap<String, Value>;

/// One entry in a record's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub entity: EntityRef,
    /// 1 for the first change, incrementing per entity
    pub version: u32,
    pub actor: UserId,
    pub timestamp: DateTime<Utc>,
    pub action: ChangeAction,
    pub modified: ModifiedFields,
}

/// Records and replays per-entity change history.
pub trait ChangeTracker: Send + Sync {
    /// Append a change to `entity`'s history and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be written.
    fn record_change(
        &self,
        entity: &EntityRef,
        actor: &UserId,
        timestamp: DateTime<Utc>,
        action: ChangeAction,
        modified: ModifiedFields,
    ) -> RepositoryResult<ChangeRecord>;

    /// All changes to `entity`, oldest first. Unknown entities have none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    fn history(&self, entity: &EntityRef) -> RepositoryResult<Vec<ChangeRecord>>;
}

/// Top-level fields of `after` that differ from `before`.
///
/// With no `before` every field counts as modified.
///
/// # Errors
///
/// Returns a serde error if either value does not serialize.
pub fn modified_fields<T: Serialize>(
    before: Option<&T>,
    after: &T,
) -> Result<ModifiedFields, serde_json::Error> {
    let before = before.map(serde_json::to_value).transpose()?;
    let after = serde_json::to_value(after)?;

    let after = match after {
        Value::Object(fields) => fields,
        other => return Ok(BTreeMap::from([(String::new(), other)])),
    };

    Ok(after
        .into_iter()
        .filter(|(key, value)| {
            before
                .as_ref()
                .and_then(|b| b.get(key))
                .map_or(true, |old| old != value)
        })
        .collect())
}

#[derive(Debug, Default)]
pub struct InMemoryChangeTracker {
    histories: RwLock<im::HashMap<EntityRef, im::Vector<ChangeRecord>>>,
}

impl InMemoryChangeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::storage_error("change history lock poisoned")
}

impl ChangeTracker for InMemoryChangeTracker {
    fn record_change(
        &self,
        entity: &EntityRef,
        actor: &UserId,
        timestamp: DateTime<Utc>,
        action: ChangeAction,
        modified: ModifiedFields,
    ) -> RepositoryResult<ChangeRecord> {
        let mut histories = self.histories.write().map_err(|_| poisoned())?;
        let history = histories
            .entry(entity.clone())
            .or_insert_with(im::Vector::new);

        let version = u32::try_from(history.len() + 1)
            .map_err(|_| RepositoryError::storage_error(format!("history of {entity} is full")))?;

        let record = ChangeRecord {
            entity: entity.clone(),
            version,
            actor: actor.clone(),
            timestamp,
            action,
            modified,
        };
        history.push_back(record.clone());
        Ok(record)
    }

    fn history(&self, entity: &EntityRef) -> RepositoryResult<Vec<ChangeRecord>> {
        let histories = self.histories.read().map_err(|_| poisoned())?;
        Ok(histories
            .get(entity)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn actor() -> UserId {
        UserId::parse("u-1").expect("valid id")
    }

    #[test]
    fn test_versions_increment_per_entity() {
        let tracker = InMemoryChangeTracker::new();
        let a = EntityRef::new("pregnancy", "a");
        let b = EntityRef::new("pregnancy", "b");

        let first = tracker
            .record_change(&a, &actor(), Utc::now(), ChangeAction::Create, ModifiedFields::new())
            .expect("recorded");
        let second = tracker
            .record_change(&a, &actor(), Utc::now(), ChangeAction::Update, ModifiedFields::new())
            .expect("recorded");
        let other = tracker
            .record_change(&b, &actor(), Utc::now(), ChangeAction::Create, ModifiedFields::new())
            .expect("recorded");

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(other.version, 1);

        let history = tracker.history(&a).expect("history readable");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, ChangeAction::Create);
        assert_eq!(history[1].action, ChangeAction::Update);
    }

    #[test]
    fn test_unknown_entity_has_empty_history() {
        let tracker = InMemoryChangeTracker::new();
        let history = tracker
            .history(&EntityRef::new("pregnancy", "missing"))
            .expect("history readable");
        assert!(history.is_empty());
    }

    #[test]
    fn test_modified_fields_on_create_lists_everything() {
        let after = json!({"pledge_sent": false, "line": "DC"});
        let modified = modified_fields(None, &after).expect("serializable");

        assert_eq!(modified.len(), 2);
        assert_eq!(modified["line"], json!("DC"));
    }

    #[test]
    fn test_modified_fields_on_update_lists_changes_only() {
        let before = json!({"pledge_sent": false, "line": "DC"});
        let after = json!({"pledge_sent": true, "line": "DC"});
        let modified = modified_fields(Some(&before), &after).expect("serializable");

        assert_eq!(
            modified,
            BTreeMap::from([("pledge_sent".to_string(), json!(true))])
        );
    }
}
