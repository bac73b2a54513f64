//! Driven port for record persistence adapters and their errors.
//!
//! Every method maps to one statement against the store. Adapters return
//! `Ok(None)`/`Ok(false)` for a missing id and reserve errors for store
//! failures, which the record service reports as internal errors.

use async_trait::async_trait;

use crate::domain::{Assignments, Record, RecordId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by record repository adapters.
    pub enum RecordPersistenceError {
        /// The store could not be reached or a connection could not be checked out.
        Connection { message: String } => "record store connection failed: {message}",
        /// A statement failed or returned a row that could not be decoded.
        Query { message: String } => "record store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert a row with the given column values and return it with its id.
    async fn insert(&self, assignments: &Assignments) -> Result<Record, RecordPersistenceError>;

    /// Return every record ordered by ascending id.
    async fn list(&self) -> Result<Vec<Record>, RecordPersistenceError>;

    /// Fetch a record by id.
    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>, RecordPersistenceError>;

    /// Write the given columns of an existing record and return the result.
    ///
    /// Columns absent from `assignments` keep their stored values.
    async fn update(
        &self,
        id: RecordId,
        assignments: &Assignments,
    ) -> Result<Option<Record>, RecordPersistenceError>;

    /// Delete a record, reporting whether a row matched.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordPersistenceError>;
}
