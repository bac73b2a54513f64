//! Declarative description of the record table.
//!
//! A [`RecordSchema`] names the table and lists one [`FieldDescriptor`] per
//! column besides `id`. Validation, SQL column mapping and the OpenAPI record
//! description are all derived from it, so switching between the historic
//! field sets is a configuration change rather than a code change.
//!
//! ```
//! use record_service::domain::{FieldKind, RecordSchema, SchemaPreset};
//!
//! let schema = RecordSchema::preset(SchemaPreset::Occupation);
//! let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
//! assert_eq!(names, ["name", "age", "occupation"]);
//! assert_eq!(schema.field("age").map(|f| f.kind()), Some(FieldKind::Number));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of the primary key column every record table carries.
pub const ID_COLUMN: &str = "id";

/// PostgreSQL truncates identifiers beyond this length.
const MAX_IDENTIFIER_LEN: usize = 63;

const DEFAULT_TABLE: &str = "users";

/// Value type accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// JSON string.
    Text,
    /// JSON number without a fractional part that fits in an `i64`.
    Integer,
    /// Any finite JSON number.
    Number,
}

impl FieldKind {
    /// Phrase used in validation messages, e.g. "an integer".
    pub fn describe(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Integer => "an integer",
            Self::Number => "a number",
        }
    }
}

/// One record attribute: column name, value kind and whether it is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    #[serde(default)]
    required: bool,
}

impl FieldDescriptor {
    /// Describe a required field.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// Describe a field that may be absent or null.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    /// Column and JSON key name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted value kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether create and full-replace requests must supply the field.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Reasons a schema definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("`{name}` is not a valid SQL identifier")]
    InvalidIdentifier { name: String },
    #[error("schema must declare at least one field")]
    NoFields,
    #[error("field `{name}` is declared more than once")]
    DuplicateField { name: String },
    #[error("field `{name}` is reserved for the primary key")]
    ReservedField { name: String },
    #[error("unknown schema preset `{name}`")]
    UnknownPreset { name: String },
    #[error("failed to read schema file {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse schema definition: {message}")]
    Parse { message: String },
}

/// Field sets the users table has gone through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaPreset {
    /// `name`, `age1`.
    Legacy,
    /// `name`, `age`.
    Basic,
    /// `name`, `age`, `occupation`.
    #[default]
    Occupation,
    /// `name`, `age`, `address`.
    Address,
    /// `name`, `age`, `address`, optional `address2`.
    Address2,
    /// `nameF`, `nameL`, `age`.
    SplitName,
    /// `fname`, `lname`, `age`, `occupation`.
    SplitOccupation,
}

impl SchemaPreset {
    /// Every preset, in historical order.
    pub const ALL: [Self; 7] = [
        Self::Legacy,
        Self::Basic,
        Self::Occupation,
        Self::Address,
        Self::Address2,
        Self::SplitName,
        Self::SplitOccupation,
    ];

    /// Configuration name of the preset.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Basic => "basic",
            Self::Occupation => "occupation",
            Self::Address => "address",
            Self::Address2 => "address2",
            Self::SplitName => "split-name",
            Self::SplitOccupation => "split-occupation",
        }
    }

    fn fields(self) -> Vec<FieldDescriptor> {
        use FieldKind::{Number, Text};

        match self {
            Self::Legacy => vec![
                FieldDescriptor::required("name", Text),
                FieldDescriptor::required("age1", Number),
            ],
            Self::Basic => vec![
                FieldDescriptor::required("name", Text),
                FieldDescriptor::required("age", Number),
            ],
            Self::Occupation => vec![
                FieldDescriptor::required("name", Text),
                FieldDescriptor::required("age", Number),
                FieldDescriptor::required("occupation", Text),
            ],
            Self::Address => vec![
                FieldDescriptor::required("name", Text),
                FieldDescriptor::required("age", Number),
                FieldDescriptor::required("address", Text),
            ],
            Self::Address2 => vec![
                FieldDescriptor::required("name", Text),
                FieldDescriptor::required("age", Number),
                FieldDescriptor::required("address", Text),
                FieldDescriptor::optional("address2", Text),
            ],
            Self::SplitName => vec![
                FieldDescriptor::required("nameF", Text),
                FieldDescriptor::required("nameL", Text),
                FieldDescriptor::required("age", Number),
            ],
            Self::SplitOccupation => vec![
                FieldDescriptor::required("fname", Text),
                FieldDescriptor::required("lname", Text),
                FieldDescriptor::required("age", Number),
                FieldDescriptor::required("occupation", Text),
            ],
        }
    }
}

impl fmt::Display for SchemaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaPreset {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchemaError::UnknownPreset { name: s.to_owned() })
    }
}

/// Validated table name and ordered field descriptors.
///
/// ## Invariants
/// - Table and field names are SQL identifiers of at most 63 bytes.
/// - At least one field; names are unique and never `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordSchemaDto", into = "RecordSchemaDto")]
pub struct RecordSchema {
    table: String,
    fields: Vec<FieldDescriptor>,
}

#[derive(Serialize, Deserialize)]
struct RecordSchemaDto {
    #[serde(default = "default_table")]
    table: String,
    fields: Vec<FieldDescriptor>,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_owned()
}

impl TryFrom<RecordSchemaDto> for RecordSchema {
    type Error = SchemaError;

    fn try_from(value: RecordSchemaDto) -> Result<Self, Self::Error> {
        Self::new(value.table, value.fields)
    }
}

impl From<RecordSchema> for RecordSchemaDto {
    fn from(value: RecordSchema) -> Self {
        Self {
            table: value.table,
            fields: value.fields,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_IDENTIFIER_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl RecordSchema {
    /// Validate and build a schema.
    ///
    /// # Errors
    /// Returns [`SchemaError`] when a name is not an identifier, the field list
    /// is empty, a field repeats, or a field is called `id`.
    pub fn new(
        table: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(SchemaError::InvalidIdentifier { name: table });
        }
        if fields.is_empty() {
            return Err(SchemaError::NoFields);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !is_identifier(field.name()) {
                return Err(SchemaError::InvalidIdentifier {
                    name: field.name().to_owned(),
                });
            }
            if field.name().eq_ignore_ascii_case(ID_COLUMN) {
                return Err(SchemaError::ReservedField {
                    name: field.name().to_owned(),
                });
            }
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name().to_owned(),
                });
            }
        }

        Ok(Self { table, fields })
    }

    /// Schema of one of the historic field sets, stored in `users`.
    pub fn preset(preset: SchemaPreset) -> Self {
        // Preset field lists are fixed identifiers, so they bypass validation.
        Self {
            table: default_table(),
            fields: preset.fields(),
        }
    }

    /// Parse a JSON schema definition.
    ///
    /// # Errors
    /// Returns [`SchemaError::Parse`] for malformed JSON or any validation
    /// failure described on [`RecordSchema::new`].
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(raw).map_err(|err| SchemaError::Parse {
            message: err.to_string(),
        })
    }

    /// Load a JSON schema definition from disk.
    ///
    /// # Errors
    /// Returns [`SchemaError::Read`] when the file cannot be read, otherwise
    /// the errors of [`RecordSchema::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path).map_err(|err| SchemaError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Table holding the records.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::preset(SchemaPreset::default())
    }
}
