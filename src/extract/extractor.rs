use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use futures::{future, TryStreamExt};

use crate::common::database::SourceDatabase;
use crate::common::helpers::quote_mssql_identifier;
use crate::common::row::Row;
use crate::extract::format::convert_row;

#[derive(Clone)]
pub struct DatabaseExtractor {
    pub pool: Pool<ConnectionManager>,
}

impl DatabaseExtractor {
    pub fn new(pool: Pool<ConnectionManager>) -> Self {
        DatabaseExtractor { pool }
    }
}

#[async_trait]
impl SourceDatabase for DatabaseExtractor {
    async fn fetch_tables(&mut self) -> Result<Vec<String>> {
        let mut conn = self.pool.get().await?;

        let rows = conn
            .simple_query("SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES")
            .await?
            .into_results()
            .await?;

        let tables = rows
            .iter()
            .flatten()
            .map(|row| {
                let table_name: Option<&str> = row.get(0);
                match table_name {
                    Some(name) => Ok(name.to_owned()),
                    None => Err(anyhow!("Failed to retrieve table name")),
                }
            })
            .collect::<Result<Vec<String>, _>>()?;

        Ok(tables)
    }

    async fn fetch_rows(&mut self, table: &str) -> Result<Vec<Row>> {
        let mut conn = self.pool.get().await?;

        let query = format!("SELECT * FROM {}", quote_mssql_identifier(table));

        let rows = conn
            .simple_query(query)
            .await?
            .into_row_stream()
            .map_err(anyhow::Error::from)
            .and_then(|row| future::ready(convert_row(row)))
            .try_collect::<Vec<Row>>()
            .await
            .with_context(|| format!("Failed to read rows of table {}", table))?;

        debug!("Read {} rows from source table {}", rows.len(), table);

        Ok(rows)
    }
}
