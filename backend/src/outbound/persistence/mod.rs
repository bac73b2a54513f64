//! PostgreSQL persistence adapter using Diesel with async pooling.
//!
//! - [`DbPool`] wraps `diesel-async` and `bb8`, and can probe connectivity.
//! - [`StatementBuilder`] renders parameterised SQL for the configured schema.
//! - [`DieselRecordRepository`] runs those statements and decodes rows into
//!   domain records.
//!
//! Database errors are mapped to [`RecordPersistenceError`] with the server's
//! message preserved.
//!
//! [`RecordPersistenceError`]: crate::domain::ports::RecordPersistenceError
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use record_service::domain::RecordSchema;
//! use record_service::outbound::persistence::{DbPool, DieselRecordRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! pool.probe().await?;
//! let repository = DieselRecordRepository::new(pool, Arc::new(RecordSchema::default()));
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_record_repository;
mod pool;
mod record_error_mapping;
mod statements;

pub use diesel_record_repository::DieselRecordRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use statements::{BindValue, Statement, StatementBuilder, quote_ident};
