use crate::common::priorities::TablePriorities;

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub(crate) target_schema: String,
    pub(crate) priorities: TablePriorities,
}
