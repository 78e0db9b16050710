use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResult {
    pub table_name: String,
    pub rows: u64,
}

impl TableResult {
    pub fn new(table_name: &str, rows: u64) -> Self {
        TableResult {
            table_name: table_name.to_string(),
            rows,
        }
    }
}

impl fmt::Display for TableResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} rows)", self.table_name, self.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Source and target disagree on the number of tables, nothing was touched.
    Aborted {
        source_tables: usize,
        target_tables: usize,
    },
    Completed {
        cleared: Vec<TableResult>,
        migrated: Vec<TableResult>,
    },
}

impl MigrationOutcome {
    pub fn cleared_rows(&self) -> u64 {
        match self {
            MigrationOutcome::Aborted { .. } => 0,
            MigrationOutcome::Completed { cleared, .. } => total_rows(cleared),
        }
    }

    pub fn migrated_rows(&self) -> u64 {
        match self {
            MigrationOutcome::Aborted { .. } => 0,
            MigrationOutcome::Completed { migrated, .. } => total_rows(migrated),
        }
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MigrationOutcome::Aborted {
                source_tables,
                target_tables,
            } => write!(
                f,
                "aborted, {} source tables against {} target tables",
                source_tables, target_tables
            ),
            MigrationOutcome::Completed { migrated, .. } => {
                let tables = migrated
                    .iter()
                    .map(|result| result.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "completed, migrated: {}", tables)
            }
        }
    }
}

fn total_rows(results: &[TableResult]) -> u64 {
    results.iter().map(|result| result.rows).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_each_pass() {
        let outcome = MigrationOutcome::Completed {
            cleared: vec![TableResult::new("pages", 4), TableResult::new("users", 1)],
            migrated: vec![TableResult::new("users", 3), TableResult::new("pages", 5)],
        };

        assert_eq!(outcome.cleared_rows(), 5);
        assert_eq!(outcome.migrated_rows(), 8);
        assert_eq!(
            outcome.to_string(),
            "completed, migrated: users (3 rows), pages (5 rows)"
        );
    }

    #[test]
    fn aborted_run_moves_nothing() {
        let outcome = MigrationOutcome::Aborted {
            source_tables: 9,
            target_tables: 8,
        };

        assert_eq!(outcome.cleared_rows(), 0);
        assert_eq!(outcome.migrated_rows(), 0);
        assert_eq!(
            outcome.to_string(),
            "aborted, 9 source tables against 8 target tables"
        );
    }
}
