#[macro_use]
extern crate log;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::{env, fs};

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Env, Target};
use structopt::StructOpt;
use tokio::time::Instant;
use toml::Value;

use crate::args::Args;
use crate::common::console_log::{format_line, ConsoleLog};
use crate::common::helpers::print_error_chain;
use crate::common::priorities::TablePriorities;
use crate::config::{Config, SettingsConfig};
use crate::connection::{
    DatabaseConnectionFactory, SqlxMySqlConnection, TiberiusConnection, MAX_CONNECTIONS,
};
use crate::extract::extractor::DatabaseExtractor;
use crate::insert::inserter::DatabaseInserter;
use crate::migrate::migration_options::MigrationOptions;
use crate::migrate::migrator::DatabaseMigrator;

mod args;
mod common;
mod config;
mod connection;
mod extract;
mod insert;
mod migrate;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let options = Args::from_args();

    let console_log = match ConsoleLog::create(&options.log_file) {
        Ok(console_log) => console_log,
        Err(err) => {
            eprintln!(
                "Failed to create log file {}: {}",
                options.log_file.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    initialize_logger(&console_log, options.verbose, options.quiet);

    let result = init(&options).await.with_context(|| "Migration failed");

    if let Err(errors) = &result {
        print_error_chain(errors);
    }

    if let Err(err) = console_log.close() {
        eprintln!("Failed to flush log file: {}", err);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn init(options: &Args) -> Result<()> {
    let config = load_config(&options.config).with_context(|| {
        format!(
            "Failed to load config file {}",
            options.config.display()
        )
    })?;

    debug!("Source database: {:?}", config.source_database());
    debug!("Target database: {:?}", config.target_database());

    info!("Opening Source Database");
    let tiberius_connection = create_tiberius_connection(&config).await?;

    info!("Opening Target Database");
    let sqlx_connection = create_sqlx_connection(&config).await?;

    run_migration(
        tiberius_connection,
        sqlx_connection,
        config.settings().clone(),
    )
    .await
}

async fn create_tiberius_connection(config: &Config) -> Result<TiberiusConnection> {
    let tiberius_factory =
        DatabaseConnectionFactory::<TiberiusConnection>::new(config.source_database().clone());
    let tiberius_connection = tiberius_factory.create_connection(MAX_CONNECTIONS).await?;
    Ok(tiberius_connection)
}

async fn create_sqlx_connection(config: &Config) -> Result<SqlxMySqlConnection> {
    let sqlx_factory =
        DatabaseConnectionFactory::<SqlxMySqlConnection>::new(config.target_database().clone());
    let sqlx_connection = sqlx_factory.create_connection(MAX_CONNECTIONS).await?;
    Ok(sqlx_connection)
}

async fn run_migration(
    tiberius_connection: TiberiusConnection,
    sqlx_connection: SqlxMySqlConnection,
    settings: SettingsConfig,
) -> Result<()> {
    let extractor = DatabaseExtractor::new(tiberius_connection.pool);
    let inserter = DatabaseInserter::new(sqlx_connection.pool);

    let migration_options = MigrationOptions {
        target_schema: settings.target_schema,
        priorities: TablePriorities::new(settings.table_priorities),
    };

    let mut migrator = DatabaseMigrator::new(extractor, inserter, migration_options);

    let start_time = Instant::now();
    let outcome = migrator.run().await?;
    let end_time = Instant::now();

    debug!(
        "Migration {}, rows cleared: {}, rows migrated: {}, total time took: {}s",
        outcome,
        outcome.cleared_rows(),
        outcome.migrated_rows(),
        end_time.saturating_duration_since(start_time).as_secs_f32()
    );

    Ok(())
}

fn initialize_logger(console_log: &ConsoleLog, verbose: bool, quiet: bool) {
    // Set the `RUST_LOG` environment variable to control the logging level

    if quiet {
        env::set_var("RUST_LOG", "warn");
    } else {
        env::set_var("RUST_LOG", if verbose { "debug" } else { "info" });
    }

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("tiberius", log::LevelFilter::Error)
        .filter_module("sqlx", log::LevelFilter::Error)
        .format(|buf, record| writeln!(buf, "{}", format_line(Local::now().time(), record.args())))
        .target(Target::Pipe(Box::new(console_log.writer())))
        .init();
}

fn load_config(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)?;
    let value = content.parse::<Value>()?;
    let config = Config::from_toml(value)?;
    Ok(config)
}
