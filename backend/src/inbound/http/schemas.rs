//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; these
//! wrappers mirror their wire shape from the inbound adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No record has the requested id.
    #[schema(rename = "not_found")]
    NotFound,
    /// The store failed; the message carries its description.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "name is required")]
    message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Offending field and reason code, for validation failures.
    #[schema(example = json!({"field": "name", "code": "missing_field"}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Record`].
///
/// Columns besides `id` come from the configured schema, so only the example
/// shows them.
#[derive(ToSchema)]
#[schema(
    as = crate::domain::Record,
    example = json!({"id": 1, "name": "Ann", "age": 30, "occupation": "engineer"})
)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecordSchemaDoc {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    id: i64,
}

/// OpenAPI schema for the delete confirmation body.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeletedSchema {
    #[schema(example = "User deleted successfully")]
    message: String,
}
