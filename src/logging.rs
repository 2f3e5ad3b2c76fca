//! Logging setup.
//!
//! The terminal belongs to the UI, so tracing output goes to a log file in
//! the configuration directory instead of stdout.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::fs::AppPaths;

const DEFAULT_FILTER: &str = "info";

/// Builds the log filter.
///
/// Precedence: the explicit `--log-level` value, then `RUST_LOG`, then
/// `info`.
///
/// # Errors
///
/// Returns an error if the explicit filter does not parse.
pub fn build_env_filter(explicit: Option<&str>) -> Result<EnvFilter> {
    if let Some(directives) = explicit {
        return EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter: {directives}"));
    }
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
}

/// Installs the global subscriber writing to `<config>/textclf.log`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened, the filter is invalid,
/// or a global subscriber is already installed.
pub fn init(paths: &AppPaths, explicit_filter: Option<&str>) -> Result<()> {
    paths.ensure_config_dir()?;
    let log_path = paths.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    let subscriber = Registry::default()
        .with(build_env_filter(explicit_filter)?)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install global tracing subscriber")?;

    tracing::info!(log_file = %log_path.display(), "logging initialized");
    Ok(())
}
