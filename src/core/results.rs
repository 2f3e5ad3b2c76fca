//! Classification results and the per-mode result store.

use crate::core::Mode;
use crate::core::error::DispatchError;

/// Class a prediction code maps to.
///
/// The service encodes the positive ("true") class as `0`; every other
/// value is the negative ("false") class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Returns the display name for the label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Positive => "True",
            Self::Negative => "False",
        }
    }
}

/// Aligned label and confidence sequences returned by the service.
///
/// Index *i* of `predictions` belongs with index *i* of `probabilities`;
/// [`PredictionResult::new`] refuses sequences of different lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    predictions: Vec<i64>,
    probabilities: Vec<f64>,
}

impl PredictionResult {
    /// Pairs the two sequences.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Parse`] when the lengths differ.
    pub fn new(predictions: Vec<i64>, probabilities: Vec<f64>) -> Result<Self, DispatchError> {
        if predictions.len() != probabilities.len() {
            return Err(DispatchError::Parse(format!(
                "{} predictions but {} probabilities",
                predictions.len(),
                probabilities.len()
            )));
        }
        Ok(Self {
            predictions,
            probabilities,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    #[must_use]
    pub fn predictions(&self) -> &[i64] {
        &self.predictions
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Iterates over `(code, probability)` pairs in service order.
    pub fn pairs(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.predictions
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }
}

/// Evaluation metrics reported after retraining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Result of a retraining request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrainResult {
    pub prediction: PredictionResult,
    pub metrics: Metrics,
}

/// A successful outcome of any mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeResult {
    Prediction(PredictionResult),
    Retrain(RetrainResult),
}

impl ModeResult {
    /// Returns the prediction part, present for every mode.
    #[must_use]
    pub fn prediction(&self) -> &PredictionResult {
        match self {
            Self::Prediction(prediction) => prediction,
            Self::Retrain(retrain) => &retrain.prediction,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            Self::Prediction(_) => None,
            Self::Retrain(retrain) => Some(&retrain.metrics),
        }
    }
}

/// Most recent successful result of each mode.
///
/// Entries are replaced wholesale by the next success of the same mode and
/// never touched by failures.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    single: Option<PredictionResult>,
    batch: Option<PredictionResult>,
    retrain: Option<RetrainResult>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `result` as the latest result of `mode`.
    ///
    /// A plain prediction stored for [`Mode::Retrain`] keeps the previous
    /// metrics out: retrain entries always come from a [`RetrainResult`].
    pub fn store(&mut self, mode: Mode, result: ModeResult) {
        match (mode, result) {
            (Mode::Single, result) => self.single = Some(result.prediction().clone()),
            (Mode::Batch, result) => self.batch = Some(result.prediction().clone()),
            (Mode::Retrain, ModeResult::Retrain(retrain)) => self.retrain = Some(retrain),
            (Mode::Retrain, ModeResult::Prediction(_)) => {
                tracing::warn!("ignoring retrain result without metrics");
            }
        }
    }

    /// Returns the stored prediction of `mode`, if any.
    #[must_use]
    pub fn prediction(&self, mode: Mode) -> Option<&PredictionResult> {
        match mode {
            Mode::Single => self.single.as_ref(),
            Mode::Batch => self.batch.as_ref(),
            Mode::Retrain => self.retrain.as_ref().map(|r| &r.prediction),
        }
    }

    /// Returns the metrics of the last successful retrain.
    #[must_use]
    pub fn metrics(&self) -> Option<&Metrics> {
        self.retrain.as_ref().map(|r| &r.metrics)
    }

    /// Drops the stored result of `mode`.
    pub fn clear(&mut self, mode: Mode) {
        match mode {
            Mode::Single => self.single = None,
            Mode::Batch => self.batch = None,
            Mode::Retrain => self.retrain = None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn prediction(codes: &[i64], probs: &[f64]) -> PredictionResult {
        PredictionResult::new(codes.to_vec(), probs.to_vec()).expect("aligned")
    }

    #[test]
    fn label_zero_is_positive() {
        assert_eq!(Label::from_code(0), Label::Positive);
        assert_eq!(Label::from_code(0).name(), "True");
    }

    #[test]
    fn any_nonzero_label_is_negative() {
        for code in [1, 2, -1, i64::MAX] {
            assert_eq!(Label::from_code(code), Label::Negative);
        }
    }

    #[test]
    fn mismatched_lengths_are_a_parse_error() {
        let result = PredictionResult::new(vec![0, 1], vec![0.5]);
        assert!(matches!(result, Err(DispatchError::Parse(_))));
    }

    #[test]
    fn pairs_follow_service_order() {
        let result = prediction(&[0, 1, 0], &[0.8, 0.6, 0.99]);
        let pairs: Vec<_> = result.pairs().collect();
        assert_eq!(pairs, vec![(0, 0.8), (1, 0.6), (0, 0.99)]);
    }

    #[test]
    fn store_replaces_entry_of_same_mode_only() {
        let mut store = ResultStore::new();
        store.store(Mode::Single, ModeResult::Prediction(prediction(&[0], &[0.9])));
        store.store(Mode::Batch, ModeResult::Prediction(prediction(&[1, 1], &[0.5, 0.4])));
        store.store(Mode::Single, ModeResult::Prediction(prediction(&[1], &[0.7])));

        assert_eq!(store.prediction(Mode::Single).map(PredictionResult::len), Some(1));
        assert_eq!(store.prediction(Mode::Single).map(|p| p.predictions()[0]), Some(1));
        assert_eq!(store.prediction(Mode::Batch).map(PredictionResult::len), Some(2));
        assert!(store.prediction(Mode::Retrain).is_none());
    }

    #[test]
    fn retrain_entry_carries_metrics() {
        let mut store = ResultStore::new();
        let metrics = Metrics {
            precision: 0.91,
            recall: 0.88,
            f1: 0.895,
        };
        store.store(
            Mode::Retrain,
            ModeResult::Retrain(RetrainResult {
                prediction: prediction(&[0], &[0.7]),
                metrics,
            }),
        );

        assert_eq!(store.metrics(), Some(&metrics));
        store.clear(Mode::Retrain);
        assert!(store.metrics().is_none());
    }
}
