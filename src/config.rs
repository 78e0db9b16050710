use std::fmt;

use anyhow::{anyhow, Result};
use toml::Value;

use crate::common::priorities::DEFAULT_TABLE_PRIORITIES;

#[derive(Debug)]
pub(crate) struct Config {
    source_database: DatabaseConfig,
    target_database: DatabaseConfig,
    settings: SettingsConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub trust_server_certificate: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SettingsConfig {
    pub target_schema: String,
    pub table_priorities: Vec<String>,
}

impl Config {
    pub(crate) fn from_toml(config: Value) -> Result<Self> {
        let source_database = parse_database_config(
            config
                .get("source_database")
                .ok_or(anyhow!("Missing or invalid source database settings"))?,
        )?;
        let target_database = parse_database_config(
            config
                .get("target_database")
                .ok_or(anyhow!("Missing or invalid target database settings"))?,
        )?;
        let settings = parse_settings_config(config.get("settings"), &target_database)?;

        Ok(Config {
            source_database,
            target_database,
            settings,
        })
    }

    pub fn source_database(&self) -> &DatabaseConfig {
        &self.source_database
    }

    pub fn target_database(&self) -> &DatabaseConfig {
        &self.target_database
    }

    pub fn settings(&self) -> &SettingsConfig {
        &self.settings
    }
}

fn parse_database_config(config: &Value) -> Result<DatabaseConfig> {
    let host = config
        .get("host")
        .and_then(|value| value.as_str())
        .ok_or_else(|| anyhow!("Missing or invalid host"))?
        .to_string();

    let port: u16 = config
        .get("port")
        .and_then(|value| value.as_integer())
        .ok_or_else(|| anyhow!("Missing or invalid port"))?
        .try_into()
        .map_err(|_| anyhow!("Port is out of range"))?;

    let username = config
        .get("username")
        .and_then(|value| value.as_str())
        .ok_or_else(|| anyhow!("Missing or invalid username"))?
        .to_string();

    let password = config
        .get("password")
        .and_then(|value| value.as_str())
        .ok_or_else(|| anyhow!("Missing or invalid password"))?
        .to_string();

    let database = config
        .get("database")
        .and_then(|value| value.as_str())
        .ok_or_else(|| anyhow!("Missing or invalid database"))?
        .to_string();

    let trust_server_certificate = match config.get("trust_server_certificate") {
        Some(value) => value
            .as_bool()
            .ok_or_else(|| anyhow!("Invalid trust_server_certificate"))?,
        None => false,
    };

    Ok(DatabaseConfig {
        host,
        port,
        username,
        password,
        database,
        trust_server_certificate,
    })
}

fn parse_settings_config(
    config: Option<&Value>,
    target_database: &DatabaseConfig,
) -> Result<SettingsConfig> {
    let target_schema = match config.and_then(|settings| settings.get("target_schema")) {
        Some(value) => value
            .as_str()
            .ok_or_else(|| anyhow!("Missing or invalid target schema"))?
            .to_string(),
        None => target_database.database.clone(),
    };

    let table_priorities = match config.and_then(|settings| settings.get("table_priorities")) {
        Some(value) => value
            .as_array()
            .ok_or_else(|| anyhow!("Missing or invalid table priorities"))?
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| anyhow!("Invalid table priority entry: {}", value))
            })
            .collect::<Result<Vec<String>>>()?,
        None => DEFAULT_TABLE_PRIORITIES
            .iter()
            .map(|table| table.to_string())
            .collect(),
    };

    Ok(SettingsConfig {
        target_schema,
        table_priorities,
    })
}
