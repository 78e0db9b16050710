use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::common::database::TargetDatabase;
use crate::common::row::Row;
use crate::insert::query::{bind_row, build_delete_query, build_insert_query, TARGET_TABLES_QUERY};

#[derive(Clone)]
pub struct DatabaseInserter {
    pool: MySqlPool,
}

impl DatabaseInserter {
    pub fn new(pool: MySqlPool) -> Self {
        DatabaseInserter { pool }
    }
}

#[async_trait]
impl TargetDatabase for DatabaseInserter {
    async fn fetch_tables(&mut self, schema: &str) -> Result<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(TARGET_TABLES_QUERY)
            .bind(schema)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list tables of schema {}", schema))?;

        Ok(tables)
    }

    async fn clear_table(&mut self, table: &str) -> Result<u64> {
        let delete_query = build_delete_query(table);

        let result = sqlx::query(&delete_query).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn insert_row(&mut self, table: &str, row: &Row) -> Result<u64> {
        let insert_query = build_insert_query(table, row);

        let result = bind_row(sqlx::query(&insert_query), row)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
