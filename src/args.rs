use std::path::PathBuf;

use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
name = "WikiDBMigrator",
version = env ! ("CARGO_PKG_VERSION"),
about = "Copies every table row of a MSSQL database into the same-named tables of a MySQL database, clearing the target tables first and following a fixed table priority order.",
setting = AppSettings::ColoredHelp,
)]
pub struct Args {
    /// Activate verbose mode
    #[structopt(short = "v", long = "verbose")]
    pub verbose: bool,

    /// Activate quiet mode
    #[structopt(short = "q", long = "quiet")]
    pub quiet: bool,

    /// Path of the configuration file
    #[structopt(
        short = "c",
        long = "config",
        default_value = "config.toml",
        parse(from_os_str)
    )]
    pub config: PathBuf,

    /// Path of the log file, truncated on start
    #[structopt(
        short = "l",
        long = "log-file",
        default_value = "console.log",
        parse(from_os_str)
    )]
    pub log_file: PathBuf,
}
