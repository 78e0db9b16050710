use anyhow::{Context, Result};
use log::{info, warn};
use tokio::time::Instant;

use crate::common::database::{SourceDatabase, TargetDatabase};
use crate::common::row::Row;
use crate::migrate::migration_options::MigrationOptions;
use crate::migrate::migration_result::{MigrationOutcome, TableResult};

const ROW_PREVIEW_CHARS: usize = 200;

pub struct DatabaseMigrator<S, T> {
    source: S,
    target: T,
    options: MigrationOptions,
}

impl<S: SourceDatabase, T: TargetDatabase> DatabaseMigrator<S, T> {
    pub fn new(source: S, target: T, options: MigrationOptions) -> Self {
        DatabaseMigrator {
            source,
            target,
            options,
        }
    }

    pub async fn run(&mut self) -> Result<MigrationOutcome> {
        info!("Retrieving Source Table Names");
        let source_tables = self
            .source
            .fetch_tables()
            .await
            .context("Failed to retrieve source table names")?;

        info!("Retrieving Target Table Names");
        let target_tables = self
            .target
            .fetch_tables(&self.options.target_schema)
            .await
            .context("Failed to retrieve target table names")?;

        if source_tables.len() != target_tables.len() {
            warn!(
                "Source Database has {} tables while Target Database have {}, aborting...",
                source_tables.len(),
                target_tables.len()
            );

            return Ok(MigrationOutcome::Aborted {
                source_tables: source_tables.len(),
                target_tables: target_tables.len(),
            });
        }

        let cleared = self.clear_tables(&target_tables).await?;
        let migrated = self.migrate_tables(&source_tables).await?;

        info!("Migration Successful");

        Ok(MigrationOutcome::Completed { cleared, migrated })
    }

    async fn clear_tables(&mut self, tables: &[String]) -> Result<Vec<TableResult>> {
        info!("Clearing Target Table Data");

        let mut results = Vec::with_capacity(tables.len());

        for table_name in self.options.priorities.clearing_order(tables) {
            let affected_rows = self
                .target
                .clear_table(table_name)
                .await
                .with_context(|| format!("Failed to clear table {}", table_name))?;

            info!("Deleted {} rows from {}", affected_rows, table_name);
            results.push(TableResult::new(table_name, affected_rows));
        }

        Ok(results)
    }

    async fn migrate_tables(&mut self, tables: &[String]) -> Result<Vec<TableResult>> {
        info!("Migrating Source Table Data");

        let mut results = Vec::with_capacity(tables.len());

        for table_name in self.options.priorities.migration_order(tables) {
            let migrated_count = self
                .migrate_table(table_name)
                .await
                .with_context(|| format!("Error while migrating table: {}", table_name))?;

            results.push(TableResult::new(table_name, migrated_count));
        }

        Ok(results)
    }

    async fn migrate_table(&mut self, table_name: &str) -> Result<u64> {
        let start_time = Instant::now();

        let rows = self
            .source
            .fetch_rows(table_name)
            .await
            .context("Failed to read source rows")?;

        for (index, row) in rows.iter().enumerate() {
            self.target
                .insert_row(table_name, row)
                .await
                .with_context(|| {
                    format!("Failed to insert row {}: {}", index + 1, preview(row))
                })?;
        }

        info!("Migrated {} rows for {}", rows.len(), table_name);

        let end_time = Instant::now();
        debug!(
            "Table {} took: {}s",
            table_name,
            end_time.saturating_duration_since(start_time).as_secs_f32()
        );

        Ok(rows.len() as u64)
    }
}

fn preview(row: &Row) -> String {
    let text = row.to_string();

    if text.chars().count() > ROW_PREVIEW_CHARS {
        let truncated: String = text.chars().take(ROW_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text
    }
}
