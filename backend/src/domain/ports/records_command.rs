//! Driving port for record mutations.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, Record};

/// Domain use-case port for creating, replacing, patching and deleting records.
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Validate `body` as a complete record and insert it.
    async fn create_record(&self, body: &Value) -> Result<Record, Error>;

    /// Overwrite every field of the record identified by `raw_id`.
    async fn replace_record(&self, raw_id: &str, body: &Value) -> Result<Record, Error>;

    /// Update only the fields present in `body`.
    async fn patch_record(&self, raw_id: &str, body: &Value) -> Result<Record, Error>;

    /// Remove the record identified by `raw_id`.
    async fn delete_record(&self, raw_id: &str) -> Result<(), Error>;
}
