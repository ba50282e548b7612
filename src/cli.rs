//! Command-line arguments for the `nws-lsr` binary.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nws-lsr")]
#[command(about = "Extract structured events from NWS product JSON files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Product JSON files to parse
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Path to the TOML config
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}
