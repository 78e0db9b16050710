use std::fmt;

use crate::common::value::SqlValue;

/// One source row: column names paired with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn push(&mut self, column_name: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.push((column_name.into(), value.into()));
    }

    #[cfg(test)]
    pub fn with(mut self, column_name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column_name, value);
        self
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.columns.iter().map(|(_, value)| value)
    }

    #[cfg(test)]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column_name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (name, value)) in self.columns.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_select_order() {
        let row = Row::new()
            .with("id", 1i64)
            .with("name", "admin")
            .with("avatar", None::<Vec<u8>>);

        assert_eq!(row.len(), 3);
        assert_eq!(
            row.column_names().collect::<Vec<_>>(),
            vec!["id", "name", "avatar"]
        );
        assert_eq!(row.get("name"), Some(&SqlValue::from("admin")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn display_lists_columns() {
        let row = Row::new().with("id", 1i64).with("name", "admin");

        assert_eq!(row.to_string(), "{id: 1, name: 'admin'}");
    }
}
