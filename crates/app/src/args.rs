pub use clap::Parser;

use std::path::PathBuf;

use crate::state::Backend;

#[derive(Parser, Debug)]
#[command(name = "ls3")]
#[command(about = "List, read and write files on a local disk or in an S3 bucket")]
pub struct Args {
    /// Path to the ls3 config directory (defaults to ~/.ls3)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Backend to operate on (defaults to the config file's choice)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
