pub mod console_log;
pub mod database;
pub mod helpers;
pub mod priorities;
pub mod row;
pub mod value;
