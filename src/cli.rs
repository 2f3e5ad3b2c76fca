//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::fs::DEFAULT_CONFIG_DIR;

/// `textclf` - terminal client for a text-classification service
///
/// Classify a single record, classify a whole file, or retrain the model
/// with a labeled file. Flags override the saved settings for this run.
#[derive(Parser, Debug)]
#[command(name = "textclf", version, about, long_about = None)]
pub struct Args {
    /// Base URL of the classification service (e.g. `http://127.0.0.1:8000`)
    #[arg(long, value_name = "URL")]
    pub server_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory holding settings and the log file
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Log filter (e.g. `debug`, `textclf=trace`); falls back to `RUST_LOG`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}
