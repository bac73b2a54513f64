//! Behaviour of the record service against mocked and in-memory stores.

use super::*;
use crate::domain::{ErrorCode, SchemaPreset};
use crate::domain::ports::{InMemoryRecordRepository, MockRecordRepository};
use rstest::{fixture, rstest};
use serde_json::Map;

#[fixture]
fn schema() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::default())
}

#[fixture]
fn store(schema: Arc<RecordSchema>) -> InMemoryRecordRepository {
    InMemoryRecordRepository::new(schema)
}

fn service_over(store: &InMemoryRecordRepository) -> RecordService {
    RecordService::new(Arc::new(RecordSchema::default()), Arc::new(store.clone()))
}

/// A mock whose every method fails the test if it is reached.
fn untouched_store() -> MockRecordRepository {
    let mut repo = MockRecordRepository::new();
    repo.expect_insert().times(0);
    repo.expect_list().times(0);
    repo.expect_find_by_id().times(0);
    repo.expect_update().times(0);
    repo.expect_delete().times(0);
    repo
}

fn ann() -> Value {
    json!({"name": "Ann", "age": 30, "occupation": "engineer"})
}

fn details_field(error: &Error) -> Option<&str> {
    error
        .details()
        .and_then(|details| details.get("field"))
        .and_then(Value::as_str)
}

#[rstest]
#[tokio::test]
async fn create_returns_stored_record_with_generated_id(store: InMemoryRecordRepository) {
    let service = service_over(&store);

    let record = service.create_record(&ann()).await.expect("create succeeds");

    assert_eq!(record.get("name"), Some(&json!("Ann")));
    assert_eq!(record.get("age"), Some(&json!(30)));
    assert_eq!(record.get("occupation"), Some(&json!("engineer")));
    assert_eq!(service.fetch_record(&record.id().to_string()).await, Ok(record));
}

#[rstest]
#[tokio::test]
async fn generated_ids_are_unique(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(service.create_record(&ann()).await.expect("create").id());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[rstest]
#[case::create_empty_name(json!({"name": "", "age": 30}), "name")]
#[case::create_bad_age(json!({"name": "Ann", "age": "thirty"}), "age")]
#[tokio::test]
async fn invalid_payloads_never_reach_the_store(#[case] body: Value, #[case] field: &str) {
    let service = RecordService::new(schema(), Arc::new(untouched_store()));

    let err = service.create_record(&body).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(details_field(&err), Some(field));
    assert!(err.message().contains(field));
}

#[rstest]
#[tokio::test]
async fn non_integer_ids_are_validation_errors_on_every_operation() {
    let service = RecordService::new(schema(), Arc::new(untouched_store()));

    let outcomes = [
        service.fetch_record("abc").await.map(|_| ()),
        service.replace_record("abc", &ann()).await.map(|_| ()),
        service.patch_record("abc", &json!({"age": 31})).await.map(|_| ()),
        service.delete_record("abc").await,
    ];

    for outcome in outcomes {
        let err = outcome.expect_err("non-integer id rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(details_field(&err), Some("id"));
    }
}

#[rstest]
#[tokio::test]
async fn zero_field_patch_is_rejected_without_mutation(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    let created = service.create_record(&ann()).await.expect("create");
    let id = created.id().to_string();

    let err = service
        .patch_record(&id, &json!({}))
        .await
        .expect_err("empty patch rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "at least one field required");
    assert_eq!(service.fetch_record(&id).await, Ok(created));
}

#[rstest]
#[tokio::test]
async fn patch_changes_only_supplied_fields(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    let created = service.create_record(&ann()).await.expect("create");

    let patched = service
        .patch_record(&created.id().to_string(), &json!({"age": 31}))
        .await
        .expect("patch succeeds");

    let mut expected = created.fields().clone();
    expected.insert("age".into(), json!(31));
    assert_eq!(patched, Record::new(created.id(), expected));
}

#[rstest]
#[tokio::test]
async fn replace_requires_every_required_field(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    let created = service.create_record(&ann()).await.expect("create");

    let err = service
        .replace_record(&created.id().to_string(), &json!({"age": 31}))
        .await
        .expect_err("partial replace rejected");

    assert_eq!(details_field(&err), Some("name"));
}

#[rstest]
#[tokio::test]
async fn replace_clears_omitted_optional_fields() {
    let schema = Arc::new(RecordSchema::preset(SchemaPreset::Address2));
    let store = InMemoryRecordRepository::new(Arc::clone(&schema));
    let service = RecordService::new(schema, Arc::new(store));
    let created = service
        .create_record(&json!({"name": "Ann", "age": 30, "address": "1 Main St", "address2": "Flat 2"}))
        .await
        .expect("create");

    let replaced = service
        .replace_record(
            &created.id().to_string(),
            &json!({"name": "Bo", "age": 40, "address": "2 High St"}),
        )
        .await
        .expect("replace succeeds");

    let mut expected = Map::new();
    expected.insert("name".into(), json!("Bo"));
    expected.insert("age".into(), json!(40));
    expected.insert("address".into(), json!("2 High St"));
    expected.insert("address2".into(), Value::Null);
    assert_eq!(replaced, Record::new(created.id(), expected));
}

#[rstest]
#[tokio::test]
async fn create_without_occupation_never_reaches_the_store() {
    let service = RecordService::new(schema(), Arc::new(untouched_store()));

    let err = service
        .create_record(&json!({"name": "Ann", "age": 30}))
        .await
        .expect_err("occupation is required");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(details_field(&err), Some("occupation"));
}

#[rstest]
#[tokio::test]
async fn fractional_age_is_stored(store: InMemoryRecordRepository) {
    let service = service_over(&store);

    let record = service
        .create_record(&json!({"name": "Ann", "age": 30.5, "occupation": "engineer"}))
        .await
        .expect("finite age accepted");

    assert_eq!(record.get("age"), Some(&json!(30.5)));
}

#[rstest]
#[tokio::test]
async fn missing_records_are_not_found(store: InMemoryRecordRepository) {
    let service = service_over(&store);

    let outcomes = [
        service.fetch_record("999999").await.map(|_| ()),
        service.replace_record("999999", &ann()).await.map(|_| ()),
        service.patch_record("999999", &json!({"age": 1})).await.map(|_| ()),
        service.delete_record("999999").await,
    ];

    for outcome in outcomes {
        let err = outcome.expect_err("missing record");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), NOT_FOUND_MESSAGE);
    }
}

#[rstest]
#[tokio::test]
async fn delete_then_fetch_is_not_found(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    let id = service.create_record(&ann()).await.expect("create").id().to_string();

    service.delete_record(&id).await.expect("first delete");

    let fetch = service.fetch_record(&id).await.expect_err("deleted");
    assert_eq!(fetch.code(), ErrorCode::NotFound);
    let second_delete = service.delete_record(&id).await.expect_err("already deleted");
    assert_eq!(second_delete.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_is_ordered_and_empty_when_no_rows(store: InMemoryRecordRepository) {
    let service = service_over(&store);
    assert_eq!(service.list_records().await, Ok(Vec::new()));

    for name in ["Cy", "Ann", "Bo"] {
        service
            .create_record(&json!({"name": name, "age": 20, "occupation": "clerk"}))
            .await
            .expect("create");
    }

    let ids: Vec<RecordId> = service
        .list_records()
        .await
        .expect("list")
        .iter()
        .map(Record::id)
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(ids.len(), 3);
}

#[rstest]
#[tokio::test]
async fn store_failures_become_internal_errors_with_description() {
    let mut repo = MockRecordRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .returning(|_| Err(RecordPersistenceError::query("relation \"users\" does not exist")));
    let service = RecordService::new(schema(), Arc::new(repo));

    let err = service.fetch_record("1").await.expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(err.message().contains("relation \"users\" does not exist"));
}

#[rstest]
#[tokio::test]
async fn patch_forwards_only_supplied_columns_to_the_store() {
    let mut repo = MockRecordRepository::new();
    repo.expect_update()
        .withf(|id, assignments| {
            *id == RecordId::new(7)
                && assignments.iter().map(|a| a.column()).collect::<Vec<_>>() == ["age"]
        })
        .times(1)
        .returning(|id, _| {
            Ok(Some(Record::new(
                id,
                Map::from_iter([("age".to_owned(), json!(31))]),
            )))
        });
    let service = RecordService::new(schema(), Arc::new(repo));

    let record = service
        .patch_record("7", &json!({"age": 31}))
        .await
        .expect("patch succeeds");

    assert_eq!(record.get("age"), Some(&json!(31)));
}
