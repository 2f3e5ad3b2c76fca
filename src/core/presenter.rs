//! Projection of session state into what the screen shows.

use crate::core::Mode;
use crate::core::error::{ErrorChannel, ErrorMessage};
use crate::core::results::{Label, Metrics, ResultStore};

/// One rendered prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Zero-based position in the service response.
    pub index: usize,
    pub code: i64,
    pub label: Label,
    pub probability: f64,
}

impl ResultRow {
    #[must_use]
    pub fn probability_text(&self) -> String {
        format_value(self.probability)
    }
}

/// Everything the result area needs for the active mode.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub mode: Mode,
    pub error: Option<ErrorMessage>,
    pub rows: Vec<ResultRow>,
    pub metrics: Option<Metrics>,
    pub pending: bool,
}

impl View {
    /// Returns true when there is a result table to draw.
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.rows.is_empty() || self.metrics.is_some()
    }
}

/// Formats a probability or metric exactly as received.
///
/// Uses the shortest representation that round-trips, so `0.92` stays
/// `0.92` and `1.0` becomes `1`.
#[must_use]
pub fn format_value(value: f64) -> String {
    value.to_string()
}

/// Builds the view of `mode`.
///
/// The error is shown whatever mode produced it. A mode without a stored
/// result yields an empty table, which is not an error.
#[must_use]
pub fn present(mode: Mode, results: &ResultStore, errors: &ErrorChannel, pending: bool) -> View {
    let rows = results
        .prediction(mode)
        .map(|prediction| {
            prediction
                .pairs()
                .enumerate()
                .map(|(index, (code, probability))| ResultRow {
                    index,
                    code,
                    label: Label::from_code(code),
                    probability,
                })
                .collect()
        })
        .unwrap_or_default();

    let metrics = match mode {
        Mode::Retrain => results.metrics().copied(),
        Mode::Single | Mode::Batch => None,
    };

    View {
        mode,
        error: errors.current().cloned(),
        rows,
        metrics,
        pending,
    }
}
