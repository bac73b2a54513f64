//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`RecordsQuery`], [`RecordsCommand`]) are what inbound
//! adapters call; the driven [`RecordRepository`] is what persistence adapters
//! implement.

mod macros;
pub(crate) use macros::define_port_error;

mod in_memory_record_repository;
mod record_repository;
mod records_command;
mod records_query;

pub use in_memory_record_repository::InMemoryRecordRepository;
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{RecordPersistenceError, RecordRepository};
pub use records_command::RecordsCommand;
pub use records_query::RecordsQuery;
