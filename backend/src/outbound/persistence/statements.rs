//! Parameterised SQL for the record table, built from the active schema.
//!
//! Column set and table name come from [`RecordSchema`], so statements are
//! assembled at runtime rather than through Diesel's typed DSL. Identifiers
//! are always double-quoted and every value travels as a bind parameter;
//! placeholders are numbered `$1..$n` in the order of [`Statement::binds`].
//!
//! Every statement that yields rows projects them through `to_jsonb`, so the
//! adapter decodes a single `jsonb` column regardless of the schema.

use crate::domain::schema::ID_COLUMN;
use crate::domain::{Assignments, FieldKind, FieldValue, RecordId, RecordSchema};

/// Bind parameter paired with the SQL type it is sent as.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// `text`, possibly NULL.
    Text(Option<String>),
    /// `int8`, possibly NULL.
    BigInt(Option<i64>),
    /// `float8`, possibly NULL.
    Double(Option<f64>),
}

impl BindValue {
    fn from_value(kind: FieldKind, value: Option<&FieldValue>) -> Self {
        match (kind, value) {
            (_, Some(FieldValue::Text(text))) => Self::Text(Some(text.clone())),
            (_, Some(FieldValue::Integer(integer))) => Self::BigInt(Some(*integer)),
            (_, Some(FieldValue::Number(number))) => Self::Double(Some(*number)),
            (FieldKind::Text, None) => Self::Text(None),
            (FieldKind::Integer, None) => Self::BigInt(None),
            (FieldKind::Number, None) => Self::Double(None),
        }
    }
}

/// SQL text together with its ordered bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    binds: Vec<BindValue>,
}

impl Statement {
    /// SQL text with `$n` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Split into SQL text and parameters.
    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.sql, self.binds)
    }
}

/// Quote `identifier` for PostgreSQL, doubling embedded quotes.
pub fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Builds statements for one schema.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    schema: &'a RecordSchema,
}

impl<'a> StatementBuilder<'a> {
    /// Builder for statements over `schema`'s table and columns.
    pub fn new(schema: &'a RecordSchema) -> Self {
        Self { schema }
    }

    fn table(&self) -> String {
        quote_ident(self.schema.table())
    }

    /// `"id", "col1", ...` in schema order.
    fn projection(&self) -> String {
        std::iter::once(ID_COLUMN)
            .chain(self.schema.fields().iter().map(|field| field.name()))
            .map(quote_ident)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn returning_json(&self, mutation: &str) -> String {
        format!("WITH r AS ({mutation}) SELECT to_jsonb(r) AS record FROM r")
    }

    /// Every row, ascending by id.
    pub fn select_all(&self) -> Statement {
        Statement {
            sql: format!(
                "SELECT to_jsonb(r) AS record FROM (SELECT {} FROM {}) AS r ORDER BY r.{}",
                self.projection(),
                self.table(),
                quote_ident(ID_COLUMN),
            ),
            binds: Vec::new(),
        }
    }

    /// The row with `id`, if any.
    pub fn select_one(&self, id: RecordId) -> Statement {
        Statement {
            sql: format!(
                "SELECT to_jsonb(r) AS record FROM (SELECT {} FROM {} WHERE {} = $1) AS r",
                self.projection(),
                self.table(),
                quote_ident(ID_COLUMN),
            ),
            binds: vec![BindValue::BigInt(Some(id.get()))],
        }
    }

    /// Insert one row and return it.
    ///
    /// Without assignments the row takes column defaults.
    pub fn insert(&self, assignments: &Assignments) -> Statement {
        let binds = bind_values(assignments);
        let insert = if assignments.is_empty() {
            format!(
                "INSERT INTO {} DEFAULT VALUES RETURNING {}",
                self.table(),
                self.projection()
            )
        } else {
            let columns = assignments
                .iter()
                .map(|assignment| quote_ident(assignment.column()))
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = (1..=binds.len())
                .map(|position| format!("${position}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING {}",
                self.table(),
                self.projection()
            )
        };
        Statement {
            sql: self.returning_json(&insert),
            binds,
        }
    }

    /// Update only the assigned columns of row `id` and return it.
    ///
    /// Without assignments this degrades to [`Self::select_one`].
    pub fn update(&self, id: RecordId, assignments: &Assignments) -> Statement {
        if assignments.is_empty() {
            return self.select_one(id);
        }

        let mut binds = bind_values(assignments);
        let set = assignments
            .iter()
            .zip(1..)
            .map(|(assignment, position)| {
                format!("{} = ${position}", quote_ident(assignment.column()))
            })
            .collect::<Vec<_>>()
            .join(", ");
        binds.push(BindValue::BigInt(Some(id.get())));

        let update = format!(
            "UPDATE {} SET {set} WHERE {} = ${} RETURNING {}",
            self.table(),
            quote_ident(ID_COLUMN),
            binds.len(),
            self.projection()
        );
        Statement {
            sql: self.returning_json(&update),
            binds,
        }
    }

    /// Delete row `id`, yielding its id when it existed.
    pub fn delete(&self, id: RecordId) -> Statement {
        let delete = format!(
            "DELETE FROM {} WHERE {id_column} = $1 RETURNING {id_column}",
            self.table(),
            id_column = quote_ident(ID_COLUMN),
        );
        Statement {
            sql: self.returning_json(&delete),
            binds: vec![BindValue::BigInt(Some(id.get()))],
        }
    }
}

fn bind_values(assignments: &Assignments) -> Vec<BindValue> {
    assignments
        .iter()
        .map(|assignment| BindValue::from_value(assignment.kind(), assignment.value()))
        .collect()
}

#[cfg(test)]
mod tests {
    //! SQL text and placeholder ordering for each statement.

    use super::*;
    use crate::domain::validation::{WriteMode, validate};
    use crate::domain::{Assignment, SchemaPreset};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn schema() -> RecordSchema {
        RecordSchema::preset(SchemaPreset::Occupation)
    }

    fn assignments(schema: &RecordSchema, body: Value, mode: WriteMode) -> Assignments {
        validate(schema, &body, mode).expect("valid payload")
    }

    #[rstest]
    #[case("users", "\"users\"")]
    #[case("first name", "\"first name\"")]
    #[case("we\"ird", "\"we\"\"ird\"")]
    fn identifiers_are_double_quoted(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(quote_ident(raw), expected);
    }

    #[rstest]
    fn select_all_orders_by_id(schema: RecordSchema) {
        let statement = StatementBuilder::new(&schema).select_all();

        assert_eq!(
            statement.sql(),
            "SELECT to_jsonb(r) AS record FROM (SELECT \"id\", \"name\", \"age\", \"occupation\" \
             FROM \"users\") AS r ORDER BY r.\"id\""
        );
        assert!(statement.binds().is_empty());
    }

    #[rstest]
    fn select_one_binds_the_id(schema: RecordSchema) {
        let statement = StatementBuilder::new(&schema).select_one(RecordId::new(7));

        assert!(statement.sql().contains("WHERE \"id\" = $1"));
        assert_eq!(statement.binds(), [BindValue::BigInt(Some(7))]);
    }

    #[rstest]
    fn insert_lists_only_assigned_columns() {
        let schema = RecordSchema::preset(SchemaPreset::Address2);
        let values = assignments(
            &schema,
            json!({"name": "Ann", "age": 30, "address": "1 Main St"}),
            WriteMode::Create,
        );

        let statement = StatementBuilder::new(&schema).insert(&values);

        assert_eq!(
            statement.sql(),
            "WITH r AS (INSERT INTO \"users\" (\"name\", \"age\", \"address\") VALUES ($1, $2, $3) \
             RETURNING \"id\", \"name\", \"age\", \"address\", \"address2\") \
             SELECT to_jsonb(r) AS record FROM r"
        );
        assert_eq!(
            statement.binds(),
            [
                BindValue::Text(Some("Ann".into())),
                BindValue::Double(Some(30.0)),
                BindValue::Text(Some("1 Main St".into())),
            ]
        );
    }

    #[rstest]
    fn insert_without_assignments_uses_defaults(schema: RecordSchema) {
        let statement = StatementBuilder::new(&schema).insert(&Assignments::default());

        assert!(statement.sql().contains("INSERT INTO \"users\" DEFAULT VALUES"));
        assert!(statement.binds().is_empty());
    }

    #[rstest]
    fn update_places_id_after_assignments(schema: RecordSchema) {
        let values = assignments(
            &schema,
            json!({"age": 31.5, "occupation": "pilot"}),
            WriteMode::Patch,
        );

        let statement = StatementBuilder::new(&schema).update(RecordId::new(4), &values);

        assert_eq!(
            statement.sql(),
            "WITH r AS (UPDATE \"users\" SET \"age\" = $1, \"occupation\" = $2 \
             WHERE \"id\" = $3 RETURNING \"id\", \"name\", \"age\", \"occupation\") \
             SELECT to_jsonb(r) AS record FROM r"
        );
        assert_eq!(
            statement.binds(),
            [
                BindValue::Double(Some(31.5)),
                BindValue::Text(Some("pilot".into())),
                BindValue::BigInt(Some(4)),
            ]
        );
    }

    #[rstest]
    fn update_without_assignments_selects_the_row(schema: RecordSchema) {
        let builder = StatementBuilder::new(&schema);

        assert_eq!(
            builder.update(RecordId::new(2), &Assignments::default()),
            builder.select_one(RecordId::new(2))
        );
    }

    #[rstest]
    fn null_binds_carry_the_column_type() {
        let values = Assignments::new(vec![
            Assignment::new("label", FieldKind::Text, None),
            Assignment::new("count", FieldKind::Integer, None),
            Assignment::new("ratio", FieldKind::Number, Some(FieldValue::Number(0.5))),
            Assignment::new("weight", FieldKind::Number, None),
        ]);

        assert_eq!(
            bind_values(&values),
            [
                BindValue::Text(None),
                BindValue::BigInt(None),
                BindValue::Double(Some(0.5)),
                BindValue::Double(None),
            ]
        );
    }

    #[rstest]
    fn delete_returns_only_the_id(schema: RecordSchema) {
        let statement = StatementBuilder::new(&schema).delete(RecordId::new(9));

        assert_eq!(
            statement.sql(),
            "WITH r AS (DELETE FROM \"users\" WHERE \"id\" = $1 RETURNING \"id\") \
             SELECT to_jsonb(r) AS record FROM r"
        );
        assert_eq!(statement.binds(), [BindValue::BigInt(Some(9))]);
    }
}
