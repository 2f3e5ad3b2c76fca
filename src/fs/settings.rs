//! Settings persistence module.
//!
//! This module provides functions to load and save application settings
//! as JSON in `<config>/settings.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::app::state::{RequestTimeout, SettingsState};
use crate::core::SwitchPolicy;

/// Persisted settings that are saved between sessions.
///
/// Enum values are stored by display name so that unknown or hand-edited
/// values fall back to defaults instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PersistedSettings {
    /// Base address of the classification service. Empty means the default.
    pub server_url: String,
    /// Request timeout ("10s", "30s", "60s", "120s").
    pub request_timeout: String,
    /// What happens to results when leaving a mode ("Keep" or "Clear").
    pub results_on_switch: String,
}

/// Parses a request timeout from its display name.
///
/// Returns `RequestTimeout::Thirty` for unrecognized values.
fn parse_request_timeout(s: &str) -> RequestTimeout {
    RequestTimeout::all()
        .iter()
        .copied()
        .find(|timeout| timeout.name() == s)
        .unwrap_or_default()
}

/// Parses the switch policy from its display name.
///
/// Returns `SwitchPolicy::Retain` for unrecognized values.
fn parse_switch_policy(s: &str) -> SwitchPolicy {
    match s {
        "Clear" => SwitchPolicy::ClearOnLeave,
        _ => SwitchPolicy::Retain,
    }
}

impl From<&SettingsState> for PersistedSettings {
    fn from(state: &SettingsState) -> Self {
        Self {
            server_url: state.server_url.clone(),
            request_timeout: state.request_timeout.name().to_string(),
            results_on_switch: state.results_on_switch.name().to_string(),
        }
    }
}

impl PersistedSettings {
    /// Applies these persisted settings to a mutable `SettingsState`.
    ///
    /// An empty server URL leaves the current one in place; other invalid
    /// values are replaced with defaults.
    pub fn apply_to(&self, state: &mut SettingsState) {
        let url = self.server_url.trim();
        if !url.is_empty() {
            state.server_url = url.to_string();
        }
        state.request_timeout = parse_request_timeout(&self.request_timeout);
        state.results_on_switch = parse_switch_policy(&self.results_on_switch);
    }
}

/// Loads settings from the specified settings file path.
///
/// If the file doesn't exist, returns default settings.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings(path: &Path) -> Result<PersistedSettings> {
    if !path.exists() {
        return Ok(PersistedSettings::default());
    }

    let content = std::fs::read_to_string(path).context("Failed to read settings file")?;

    serde_json::from_str(&content).context("Failed to parse settings file")
}

/// Saves settings to the specified settings file path as pretty-printed JSON.
///
/// The parent directory must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_settings(path: &Path, settings: &PersistedSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    std::fs::write(path, json).context("Failed to write settings file")
}
