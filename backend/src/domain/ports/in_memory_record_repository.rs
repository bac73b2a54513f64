//! Deterministic in-process [`RecordRepository`] used as a fake store.
//!
//! Rows live in a `BTreeMap` keyed by id, so listing is naturally ordered.
//! Ids are assigned from a counter that never reuses deleted values, which
//! mirrors a `SERIAL` column. A failure can be armed to exercise the
//! store-error paths of callers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Assignments, Record, RecordId, RecordSchema};

use super::{RecordPersistenceError, RecordRepository};

#[derive(Debug)]
struct State {
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
    failure: Option<RecordPersistenceError>,
}

/// In-memory record store shaped by a [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct InMemoryRecordRepository {
    schema: Arc<RecordSchema>,
    state: Arc<Mutex<State>>,
}

impl InMemoryRecordRepository {
    /// Create an empty store for `schema`.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self {
            schema,
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                rows: BTreeMap::new(),
                failure: None,
            })),
        }
    }

    /// Make every subsequent operation fail with `error` until cleared.
    pub fn fail_with(&self, error: RecordPersistenceError) {
        self.lock().failure = Some(error);
    }

    /// Clear a previously armed failure.
    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checked(&self) -> Result<MutexGuard<'_, State>, RecordPersistenceError> {
        let state = self.lock();
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        Ok(state)
    }
}

fn apply(row: &mut Map<String, Value>, assignments: &Assignments) {
    for assignment in assignments {
        let value = assignment.value().map_or(Value::Null, |value| value.to_json());
        row.insert(assignment.column().to_owned(), value);
    }
}

fn to_record(id: i64, row: &Map<String, Value>) -> Record {
    Record::new(RecordId::new(id), row.clone())
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn insert(&self, assignments: &Assignments) -> Result<Record, RecordPersistenceError> {
        let mut state = self.checked()?;
        let mut row: Map<String, Value> = self
            .schema
            .fields()
            .iter()
            .map(|field| (field.name().to_owned(), Value::Null))
            .collect();
        apply(&mut row, assignments);

        let id = state.next_id;
        state.next_id += 1;
        let record = to_record(id, &row);
        state.rows.insert(id, row);
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<Record>, RecordPersistenceError> {
        let state = self.checked()?;
        Ok(state
            .rows
            .iter()
            .map(|(id, row)| to_record(*id, row))
            .collect())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>, RecordPersistenceError> {
        let state = self.checked()?;
        Ok(state.rows.get(&id.get()).map(|row| to_record(id.get(), row)))
    }

    async fn update(
        &self,
        id: RecordId,
        assignments: &Assignments,
    ) -> Result<Option<Record>, RecordPersistenceError> {
        let mut state = self.checked()?;
        Ok(state.rows.get_mut(&id.get()).map(|row| {
            apply(row, assignments);
            to_record(id.get(), row)
        }))
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordPersistenceError> {
        let mut state = self.checked()?;
        Ok(state.rows.remove(&id.get()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchemaPreset;
    use crate::domain::validation::{WriteMode, validate};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn repository() -> InMemoryRecordRepository {
        InMemoryRecordRepository::new(Arc::new(RecordSchema::default()))
    }

    fn assignments(body: Value, mode: WriteMode) -> Assignments {
        validate(&RecordSchema::default(), &body, mode).expect("valid payload")
    }

    #[rstest]
    #[tokio::test]
    async fn insert_fills_unset_columns_with_null() {
        let schema = RecordSchema::preset(SchemaPreset::Address2);
        let repository = InMemoryRecordRepository::new(Arc::new(schema.clone()));
        let body = json!({"name": "Ann", "age": 30, "address": "1 Main St"});
        let record = repository
            .insert(&validate(&schema, &body, WriteMode::Create).expect("valid payload"))
            .await
            .expect("insert succeeds");

        assert_eq!(record.id(), RecordId::new(1));
        assert_eq!(record.get("address2"), Some(&Value::Null));
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_not_reused_after_delete(repository: InMemoryRecordRepository) {
        let body = assignments(
            json!({"name": "Ann", "age": 30, "occupation": "engineer"}),
            WriteMode::Create,
        );
        let first = repository.insert(&body).await.expect("insert");
        assert!(repository.delete(first.id()).await.expect("delete"));
        let second = repository.insert(&body).await.expect("insert");

        assert!(second.id() > first.id());
        assert_eq!(repository.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_row_returns_none(repository: InMemoryRecordRepository) {
        let result = repository
            .update(
                RecordId::new(5),
                &assignments(json!({"age": 1}), WriteMode::Patch),
            )
            .await
            .expect("update runs");
        assert!(result.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn armed_failure_is_returned_until_cleared(repository: InMemoryRecordRepository) {
        repository.fail_with(RecordPersistenceError::connection("store offline"));
        let err = repository.list().await.expect_err("failure armed");
        assert_eq!(err, RecordPersistenceError::connection("store offline"));

        repository.clear_failure();
        assert!(repository.list().await.expect("list succeeds").is_empty());
    }
}
