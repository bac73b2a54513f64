//! PostgreSQL-backed `RecordRepository` implementation using Diesel.
//!
//! The column set is only known at runtime, so statements come from
//! [`StatementBuilder`] and run through `sql_query` with boxed binds. Rows are
//! read back as a single `jsonb` column and decoded into domain records.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Double, Jsonb, Nullable, Text};
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{RecordPersistenceError, RecordRepository};
use crate::domain::{Assignments, Record, RecordId, RecordSchema};

use super::pool::DbPool;
use super::record_error_mapping::{map_diesel_error, map_pool_error};
use super::statements::{BindValue, Statement, StatementBuilder};

/// One row projected through `to_jsonb`.
#[derive(Debug, QueryableByName)]
struct RecordRow {
    #[diesel(sql_type = Jsonb)]
    record: Value,
}

/// Diesel-backed implementation of the `RecordRepository` port.
#[derive(Clone)]
pub struct DieselRecordRepository {
    pool: DbPool,
    schema: Arc<RecordSchema>,
}

impl DieselRecordRepository {
    /// Create a repository over `schema`'s table using the given pool.
    pub fn new(pool: DbPool, schema: Arc<RecordSchema>) -> Self {
        Self { pool, schema }
    }

    fn statements(&self) -> StatementBuilder<'_> {
        StatementBuilder::new(&self.schema)
    }

    async fn fetch(&self, statement: Statement) -> Result<Vec<Value>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecordRow> = into_query(statement)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(|row| row.record).collect())
    }

    async fn fetch_records(
        &self,
        statement: Statement,
    ) -> Result<Vec<Record>, RecordPersistenceError> {
        self.fetch(statement)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn fetch_optional(
        &self,
        statement: Statement,
    ) -> Result<Option<Record>, RecordPersistenceError> {
        Ok(self.fetch_records(statement).await?.into_iter().next())
    }
}

fn into_query(statement: Statement) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    let (sql, binds) = statement.into_parts();
    binds
        .into_iter()
        .fold(diesel::sql_query(sql).into_boxed(), |query, bind| match bind {
            BindValue::Text(value) => query.bind::<Nullable<Text>, _>(value),
            BindValue::BigInt(value) => query.bind::<Nullable<BigInt>, _>(value),
            BindValue::Double(value) => query.bind::<Nullable<Double>, _>(value),
        })
}

fn decode(row: Value) -> Result<Record, RecordPersistenceError> {
    Record::from_row(row).map_err(|err| RecordPersistenceError::query(err.to_string()))
}

#[async_trait]
impl RecordRepository for DieselRecordRepository {
    async fn insert(&self, assignments: &Assignments) -> Result<Record, RecordPersistenceError> {
        self.fetch_optional(self.statements().insert(assignments))
            .await?
            .ok_or_else(|| RecordPersistenceError::query("insert returned no row"))
    }

    async fn list(&self) -> Result<Vec<Record>, RecordPersistenceError> {
        self.fetch_records(self.statements().select_all()).await
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>, RecordPersistenceError> {
        self.fetch_optional(self.statements().select_one(id)).await
    }

    async fn update(
        &self,
        id: RecordId,
        assignments: &Assignments,
    ) -> Result<Option<Record>, RecordPersistenceError> {
        self.fetch_optional(self.statements().update(id, assignments))
            .await
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordPersistenceError> {
        let rows = self.fetch(self.statements().delete(id)).await?;
        Ok(!rows.is_empty())
    }
}
