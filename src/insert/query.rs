use chrono::Utc;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

use crate::common::helpers::quote_mysql_identifier;
use crate::common::row::Row;
use crate::common::value::SqlValue;

// MySQL 8 reports catalog columns with a binary collation, the cast keeps them decodable as text
pub const TARGET_TABLES_QUERY: &str = "SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ?";

/// Builds a parameterized insert whose column list is taken from `row` itself.
pub fn build_insert_query(table_name: &str, row: &Row) -> String {
    let column_names_string = row
        .column_names()
        .map(quote_mysql_identifier)
        .collect::<Vec<_>>()
        .join(",");

    let placeholders = vec!["?"; row.len()].join(",");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_mysql_identifier(table_name),
        column_names_string,
        placeholders
    )
}

pub fn build_delete_query(table_name: &str) -> String {
    format!("DELETE FROM {}", quote_mysql_identifier(table_name))
}

pub fn bind_row<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    row: &'q Row,
) -> Query<'q, MySql, MySqlArguments> {
    row.values().fold(query, bind_value)
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(val) => query.bind(*val),
        SqlValue::Int(val) => query.bind(*val),
        SqlValue::Float(val) => query.bind(*val),
        SqlValue::Text(val) => query.bind(val.as_str()),
        SqlValue::Bytes(val) => query.bind(val.as_slice()),
        SqlValue::Date(val) => query.bind(*val),
        SqlValue::Time(val) => query.bind(*val),
        SqlValue::DateTime(val) => query.bind(*val),
        SqlValue::DateTimeOffset(val) => query.bind(val.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_lists_row_columns_in_order() {
        let row = Row::new()
            .with("id", 1i64)
            .with("email", "admin@example.com")
            .with("name", None::<String>);

        assert_eq!(
            build_insert_query("users", &row),
            "INSERT INTO `users` (`id`,`email`,`name`) VALUES (?,?,?)"
        );
    }

    #[test]
    fn insert_shape_follows_each_row() {
        let narrow = Row::new().with("id", 1i64);
        let wide = Row::new().with("id", 2i64).with("tag", "docs");

        assert_eq!(
            build_insert_query("pageTags", &narrow),
            "INSERT INTO `pageTags` (`id`) VALUES (?)"
        );
        assert_eq!(
            build_insert_query("pageTags", &wide),
            "INSERT INTO `pageTags` (`id`,`tag`) VALUES (?,?)"
        );
    }

    #[test]
    fn delete_quotes_table_name() {
        assert_eq!(build_delete_query("pageTree"), "DELETE FROM `pageTree`");
    }
}
