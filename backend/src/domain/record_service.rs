//! Record use-cases: validation first, then exactly one repository call.
//!
//! Outcomes map onto the domain error taxonomy:
//! - malformed ids and payloads become [`ErrorCode::InvalidRequest`] before
//!   the store is touched;
//! - a well-formed id with no row becomes [`ErrorCode::NotFound`];
//! - any repository failure becomes [`ErrorCode::InternalError`] carrying the
//!   store's description.
//!
//! [`ErrorCode::InvalidRequest`]: crate::domain::ErrorCode::InvalidRequest
//! [`ErrorCode::NotFound`]: crate::domain::ErrorCode::NotFound
//! [`ErrorCode::InternalError`]: crate::domain::ErrorCode::InternalError

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::domain::ports::{RecordPersistenceError, RecordRepository, RecordsCommand, RecordsQuery};
use crate::domain::validation::{FieldError, WriteMode, validate};
use crate::domain::{Assignments, Error, Record, RecordId, RecordIdError, RecordSchema};

/// Message returned when an id matches no record.
pub const NOT_FOUND_MESSAGE: &str = "User not found";

/// Record service bound to one schema and one repository.
#[derive(Clone)]
pub struct RecordService {
    schema: Arc<RecordSchema>,
    repository: Arc<dyn RecordRepository>,
}

impl RecordService {
    /// Create a service validating against `schema` and persisting through
    /// `repository`.
    pub fn new(schema: Arc<RecordSchema>, repository: Arc<dyn RecordRepository>) -> Self {
        Self { schema, repository }
    }

    /// Schema payloads are validated against.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    fn assignments(&self, body: &Value, mode: WriteMode) -> Result<Assignments, Error> {
        validate(&self.schema, body, mode).map_err(map_field_error)
    }

    async fn update(&self, raw_id: &str, body: &Value, mode: WriteMode) -> Result<Record, Error> {
        let id = parse_id(raw_id)?;
        let assignments = self.assignments(body, mode)?;
        self.repository
            .update(id, &assignments)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }
}

fn parse_id(raw_id: &str) -> Result<RecordId, Error> {
    RecordId::parse(raw_id).map_err(map_id_error)
}

fn map_id_error(err: RecordIdError) -> Error {
    debug!(raw_id = err.raw(), "rejected non-integer record id");
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "id",
        "value": err.raw(),
        "code": "invalid_id",
    }))
}

fn map_field_error(err: FieldError) -> Error {
    debug!(error = %err, "rejected record payload");
    let details = match err.field() {
        Some(field) => json!({ "field": field, "code": err.code() }),
        None => json!({ "code": err.code() }),
    };
    Error::invalid_request(err.to_string()).with_details(details)
}

fn map_persistence_error(err: RecordPersistenceError) -> Error {
    error!(error = %err, "record store operation failed");
    Error::internal(err.to_string())
}

fn not_found() -> Error {
    Error::not_found(NOT_FOUND_MESSAGE)
}

#[async_trait]
impl RecordsQuery for RecordService {
    async fn list_records(&self) -> Result<Vec<Record>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn fetch_record(&self, raw_id: &str) -> Result<Record, Error> {
        let id = parse_id(raw_id)?;
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl RecordsCommand for RecordService {
    async fn create_record(&self, body: &Value) -> Result<Record, Error> {
        let assignments = self.assignments(body, WriteMode::Create)?;
        let record = self
            .repository
            .insert(&assignments)
            .await
            .map_err(map_persistence_error)?;
        debug!(id = %record.id(), "record created");
        Ok(record)
    }

    async fn replace_record(&self, raw_id: &str, body: &Value) -> Result<Record, Error> {
        self.update(raw_id, body, WriteMode::Replace).await
    }

    async fn patch_record(&self, raw_id: &str, body: &Value) -> Result<Record, Error> {
        self.update(raw_id, body, WriteMode::Patch).await
    }

    async fn delete_record(&self, raw_id: &str) -> Result<(), Error> {
        let id = parse_id(raw_id)?;
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if deleted {
            debug!(%id, "record deleted");
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
