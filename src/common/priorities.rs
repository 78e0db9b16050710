/// Wiki.js tables, least dependent first.
pub const DEFAULT_TABLE_PRIORITIES: [&str; 8] = [
    "users",
    "pageHistory",
    "pages",
    "pageTree",
    "comments",
    "assets",
    "userGroups",
    "pageTags",
];

/// Hand-maintained dependency order of tables.
///
/// A table's priority is its index in the list. Clearing walks tables from the
/// highest priority down; migrating walks the exact reverse. Tables missing from
/// the list sort above every listed table, so they are cleared first and
/// migrated last.
#[derive(Debug, Clone)]
pub struct TablePriorities {
    tables: Vec<String>,
}

impl TablePriorities {
    pub fn new(tables: Vec<String>) -> Self {
        TablePriorities { tables }
    }

    pub fn index_of(&self, table_name: &str) -> Option<usize> {
        self.tables.iter().position(|table| table == table_name)
    }

    /// Order in which target tables are emptied.
    pub fn clearing_order<'a>(&self, tables: &'a [String]) -> Vec<&'a str> {
        let mut ordered: Vec<&str> = tables.iter().map(String::as_str).collect();

        // Stable sort, unknown tables keep their catalog order
        ordered.sort_by_key(|table| std::cmp::Reverse(self.sort_key(table)));

        ordered
    }

    /// Order in which source tables are copied.
    pub fn migration_order<'a>(&self, tables: &'a [String]) -> Vec<&'a str> {
        let mut ordered = self.clearing_order(tables);
        ordered.reverse();
        ordered
    }

    fn sort_key(&self, table_name: &str) -> usize {
        self.index_of(table_name).unwrap_or(usize::MAX)
    }
}

impl Default for TablePriorities {
    fn default() -> Self {
        TablePriorities::new(
            DEFAULT_TABLE_PRIORITIES
                .iter()
                .map(|table| table.to_string())
                .collect(),
        )
    }
}
