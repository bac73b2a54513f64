//! Record identity, field values and the stored record shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{FieldKind, ID_COLUMN};

/// Server-assigned primary key of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

/// Raised when a path identifier is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("id must be an integer")]
pub struct RecordIdError {
    raw: String,
}

impl RecordIdError {
    /// The rejected input.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl RecordId {
    /// Wrap a known identifier.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse an identifier taken from a request path.
    ///
    /// Only an optionally signed run of ASCII digits is accepted; whitespace,
    /// fractions and exponents are rejected.
    ///
    /// # Errors
    /// Returns [`RecordIdError`] when `raw` is not an `i64`.
    ///
    /// # Examples
    /// ```
    /// use record_service::domain::RecordId;
    ///
    /// assert_eq!(RecordId::parse("42").map(RecordId::get), Ok(42));
    /// assert!(RecordId::parse("abc").is_err());
    /// assert!(RecordId::parse("1.5").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RecordIdError> {
        raw.parse::<i64>().map(Self).map_err(|_| RecordIdError {
            raw: raw.to_owned(),
        })
    }

    /// Underlying integer.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated scalar destined for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl FieldValue {
    /// JSON rendering of the value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Integer(number) => Value::from(*number),
            // Whole numbers render as JSON integers, as PostgreSQL's `to_jsonb`
            // does for `double precision`. Validation only admits finite
            // numbers, which always convert.
            Self::Number(number) => whole_f64_to_i64(*number).map_or_else(
                || serde_json::Number::from_f64(*number).map_or(Value::Null, Value::Number),
                Value::from,
            ),
        }
    }
}

/// Largest magnitude below which every whole `f64` is exactly representable.
const MAX_EXACT_F64_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a whole `f64` to `i64` without loss.
///
/// Returns `None` for fractions, non-finite values and magnitudes beyond
/// 2^53, where `f64` can no longer represent every integer.
pub(crate) fn whole_f64_to_i64(number: f64) -> Option<i64> {
    if number.fract() != 0.0 || number.abs() > MAX_EXACT_F64_INTEGER {
        return None;
    }
    // Whole and within ±2^53, so the cast is exact.
    Some(number as i64)
}

/// One `(column, value)` pair of a write; `None` writes NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    column: String,
    kind: FieldKind,
    value: Option<FieldValue>,
}

impl Assignment {
    /// Pair a column with its new value.
    pub fn new(column: impl Into<String>, kind: FieldKind, value: Option<FieldValue>) -> Self {
        Self {
            column: column.into(),
            kind,
            value,
        }
    }

    /// Target column.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Declared kind of the column, needed to type NULL writes.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// New value; `None` clears the column.
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }
}

/// Ordered assignments produced by payload validation.
///
/// Order follows the schema's field declaration order, which is also the
/// order statement placeholders are numbered in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments(Vec<Assignment>);

impl Assignments {
    /// Wrap an ordered list of assignments.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self(assignments)
    }

    /// Number of columns written.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no column is written.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in placeholder order.
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Assignments {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Stored record: the generated id plus the schema's columns.
///
/// Serialises as a flat JSON object, e.g.
/// `{"id":1,"name":"Ann","age":30,"occupation":"engineer"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Raised when a stored row cannot be read back as a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed record row: {message}")]
pub struct RecordDecodeError {
    message: String,
}

impl Record {
    /// Assemble a record from its id and column values.
    pub fn new(id: RecordId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Decode a row rendered as a JSON object with an integer `id` member.
    ///
    /// # Errors
    /// Returns [`RecordDecodeError`] if `row` is not an object or lacks an
    /// integer `id`.
    pub fn from_row(row: Value) -> Result<Self, RecordDecodeError> {
        let Value::Object(mut fields) = row else {
            return Err(RecordDecodeError {
                message: "row is not a JSON object".into(),
            });
        };
        let id = fields
            .remove(ID_COLUMN)
            .and_then(|id| id.as_i64())
            .ok_or_else(|| RecordDecodeError {
                message: "row has no integer id".into(),
            })?;
        Ok(Self::new(RecordId::new(id), fields))
    }

    /// Primary key.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Column values keyed by field name.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Value of one column, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
