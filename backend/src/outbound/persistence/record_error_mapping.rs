//! Translation of pool and Diesel failures into record persistence errors.
//!
//! The driver's description is kept so callers can surface it.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RecordPersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> RecordPersistenceError {
    RecordPersistenceError::connection(error.message())
}

pub(super) fn map_diesel_error(error: DieselError) -> RecordPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            info,
        ) => RecordPersistenceError::connection(info.message()),
        DieselError::DatabaseError(_, info) => match info.details() {
            Some(details) => {
                RecordPersistenceError::query(format!("{}: {details}", info.message()))
            }
            None => RecordPersistenceError::query(info.message()),
        },
        other => RecordPersistenceError::query(other.to_string()),
    }
}
