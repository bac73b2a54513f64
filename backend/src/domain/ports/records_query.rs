//! Driving port for reading records.
//!
//! HTTP handlers pass raw path identifiers through; implementations own the
//! id validation so every adapter reports malformed ids the same way.

use async_trait::async_trait;

use crate::domain::{Error, Record};

/// Domain use-case port for record reads.
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// Return all records in ascending id order.
    async fn list_records(&self) -> Result<Vec<Record>, Error>;

    /// Return the record identified by `raw_id`.
    async fn fetch_record(&self, raw_id: &str) -> Result<Record, Error>;
}
