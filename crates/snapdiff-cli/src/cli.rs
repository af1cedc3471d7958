use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "snapdiff",
    about = "Compare two database snapshots row by row",
    version,
)]
pub struct Cli {
    /// Left snapshot (SQLite database file)
    pub left: PathBuf,

    /// Right snapshot (SQLite database file)
    pub right: PathBuf,

    /// TOML file listing the tables to compare; defaults to the built-in profile
    #[arg(short, long, value_name = "FILE")]
    pub descriptors: Option<PathBuf>,

    /// Exit with status 1 at the first table that diverges
    #[arg(long)]
    pub fail_fast: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}
