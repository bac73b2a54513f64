//! Domain types, validation and use-cases for the record service.
//!
//! Purpose: keep the record contract (schema, validation rules, error
//! taxonomy) free of HTTP and SQL concerns. Adapters depend on this module,
//! never the other way round.
//!
//! Public surface:
//! - [`RecordSchema`] / [`FieldDescriptor`]: declarative field set.
//! - [`Record`], [`RecordId`], [`Assignments`]: stored shape and writes.
//! - [`RecordService`]: implementation of the driving ports in [`ports`].
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod error;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod schema;
pub mod trace_id;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::record::{
    Assignment, Assignments, FieldValue, Record, RecordDecodeError, RecordId, RecordIdError,
};
pub use self::record_service::RecordService;
pub use self::schema::{FieldDescriptor, FieldKind, RecordSchema, SchemaError, SchemaPreset};
pub use self::trace_id::TraceId;
