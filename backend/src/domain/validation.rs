//! Request payload validation driven by the record schema.
//!
//! A JSON body is checked field by field in schema declaration order and
//! turned into [`Assignments`]; the first offending field is reported. Keys
//! the schema does not declare, `id` included, are ignored.

use serde_json::{Map, Value};

use super::record::{Assignment, Assignments, FieldValue, whole_f64_to_i64};
use super::schema::{FieldDescriptor, FieldKind, RecordSchema};

/// Which write the payload is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Required fields must be present; absent optional fields are omitted.
    Create,
    /// Required fields must be present; absent optional fields are nulled.
    Replace,
    /// Any non-empty subset of fields; absent fields are left untouched.
    Patch,
}

/// Reasons a payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field} must be a non-empty string")]
    Empty { field: String },
    #[error("{field} must be {}", .expected.describe())]
    InvalidType { field: String, expected: FieldKind },
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
    #[error("at least one field required")]
    NoFields,
}

impl FieldError {
    /// Offending field, when the failure concerns a single one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Missing { field }
            | Self::Empty { field }
            | Self::InvalidType { field, .. }
            | Self::NotFinite { field } => Some(field),
            Self::NotAnObject | Self::NoFields => None,
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnObject => "invalid_body",
            Self::Missing { .. } => "missing_field",
            Self::Empty { .. } => "empty_field",
            Self::InvalidType { .. } => "invalid_type",
            Self::NotFinite { .. } => "not_finite",
            Self::NoFields => "no_fields",
        }
    }
}

/// Validate `body` against `schema` for the given write.
///
/// # Errors
/// Returns the first [`FieldError`] found, in schema field order.
///
/// # Examples
/// ```
/// use record_service::domain::validation::{FieldError, WriteMode, validate};
/// use record_service::domain::RecordSchema;
/// use serde_json::json;
///
/// let schema = RecordSchema::default();
/// let assignments = validate(&schema, &json!({"age": 31}), WriteMode::Patch).unwrap();
/// assert_eq!(assignments.len(), 1);
///
/// let err = validate(&schema, &json!({}), WriteMode::Patch).unwrap_err();
/// assert_eq!(err, FieldError::NoFields);
/// ```
pub fn validate(
    schema: &RecordSchema,
    body: &Value,
    mode: WriteMode,
) -> Result<Assignments, FieldError> {
    let object = body.as_object().ok_or(FieldError::NotAnObject)?;

    let mut assignments = Vec::with_capacity(schema.fields().len());
    for descriptor in schema.fields() {
        if let Some(assignment) = validate_field(descriptor, object, mode)? {
            assignments.push(assignment);
        }
    }

    if mode == WriteMode::Patch && assignments.is_empty() {
        return Err(FieldError::NoFields);
    }
    Ok(Assignments::new(assignments))
}

fn validate_field(
    descriptor: &FieldDescriptor,
    object: &Map<String, Value>,
    mode: WriteMode,
) -> Result<Option<Assignment>, FieldError> {
    let name = descriptor.name();
    let assign = |value| Assignment::new(name, descriptor.kind(), value);

    match (object.get(name), descriptor.is_required()) {
        (None, _) if mode == WriteMode::Patch => Ok(None),
        // A null required field is treated as missing, including on patch.
        (None | Some(Value::Null), true) => Err(FieldError::Missing {
            field: name.to_owned(),
        }),
        (None, false) if mode == WriteMode::Replace => Ok(Some(assign(None))),
        (None, false) => Ok(None),
        (Some(Value::Null), false) => Ok(Some(assign(None))),
        (Some(value), _) => {
            let value = coerce(descriptor, value)?;
            Ok(Some(assign(Some(value))))
        }
    }
}

fn coerce(descriptor: &FieldDescriptor, value: &Value) -> Result<FieldValue, FieldError> {
    let field = || descriptor.name().to_owned();
    let invalid_type = || FieldError::InvalidType {
        field: field(),
        expected: descriptor.kind(),
    };

    match descriptor.kind() {
        FieldKind::Text => {
            let text = value.as_str().ok_or_else(invalid_type)?;
            if descriptor.is_required() && text.trim().is_empty() {
                return Err(FieldError::Empty { field: field() });
            }
            Ok(FieldValue::Text(text.to_owned()))
        }
        FieldKind::Integer => {
            if let Some(integer) = value.as_i64() {
                return Ok(FieldValue::Integer(integer));
            }
            let number = value.as_f64().ok_or_else(invalid_type)?;
            if !number.is_finite() {
                return Err(FieldError::NotFinite { field: field() });
            }
            // Whole floats such as `30.0` are accepted.
            whole_f64_to_i64(number)
                .map(FieldValue::Integer)
                .ok_or_else(invalid_type)
        }
        FieldKind::Number => {
            let number = value.as_f64().ok_or_else(invalid_type)?;
            if number.is_finite() {
                Ok(FieldValue::Number(number))
            } else {
                Err(FieldError::NotFinite { field: field() })
            }
        }
    }
}
