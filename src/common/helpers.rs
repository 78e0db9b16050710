use anyhow::Error;

pub fn print_error_chain(err: &Error) {
    // Main context message first, causes indented below it
    let error_message = err
        .chain()
        .enumerate()
        .map(|(index, cause)| {
            if index == 0 {
                cause.to_string()
            } else {
                format!("       └> {} - {}", index, cause)
            }
        })
        .collect::<Vec<String>>()
        .join("\n");

    error!("{}", error_message);
}

/// Quotes a MySQL identifier with backticks, doubling embedded backticks.
pub fn quote_mysql_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quotes a SQL Server identifier with brackets, doubling embedded closing brackets.
pub fn quote_mssql_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}
