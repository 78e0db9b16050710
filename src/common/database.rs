use anyhow::Result;
use async_trait::async_trait;

use crate::common::row::Row;

/// Database the rows are read from.
#[async_trait]
pub trait SourceDatabase: Send {
    /// Every table name listed by the catalog, in catalog order.
    async fn fetch_tables(&mut self) -> Result<Vec<String>>;

    /// The whole content of `table`, materialized in memory.
    async fn fetch_rows(&mut self, table: &str) -> Result<Vec<Row>>;
}

/// Database the rows are written to.
#[async_trait]
pub trait TargetDatabase: Send {
    /// Table names of `schema`, in catalog order.
    async fn fetch_tables(&mut self, schema: &str) -> Result<Vec<String>>;

    /// Deletes every row of `table`, returning the affected row count.
    async fn clear_table(&mut self, table: &str) -> Result<u64>;

    /// Inserts `row` into `table` using the row's own columns.
    async fn insert_row(&mut self, table: &str, row: &Row) -> Result<u64>;
}
