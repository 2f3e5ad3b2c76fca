//! In-memory classification service for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::DispatchError;
use crate::core::input::{FileRef, SingleInput};
use crate::core::results::{Metrics, PredictionResult, RetrainResult};
use crate::core::service::ClassificationService;

/// Answers every call with the same canned outcome.
pub(crate) struct StubService {
    outcome: Result<PredictionResult, DispatchError>,
    metrics: Metrics,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_single: Mutex<Option<SingleInput>>,
    last_file: Mutex<Option<FileRef>>,
}

impl StubService {
    fn with_outcome(outcome: Result<PredictionResult, DispatchError>) -> Self {
        Self {
            outcome,
            metrics: Metrics {
                precision: 0.91,
                recall: 0.88,
                f1: 0.895,
            },
            delay: None,
            calls: AtomicUsize::new(0),
            last_single: Mutex::new(None),
            last_file: Mutex::new(None),
        }
    }

    pub(crate) fn ok(codes: &[i64], probabilities: &[f64]) -> Self {
        Self::with_outcome(PredictionResult::new(codes.to_vec(), probabilities.to_vec()))
    }

    pub(crate) fn failing(error: DispatchError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Never answers within any reasonable test timeout.
    pub(crate) fn hanging() -> Self {
        Self::ok(&[0], &[1.0]).with_delay(Duration::from_secs(3600))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_single(&self) -> Option<SingleInput> {
        self.last_single.lock().ok().and_then(|guard| guard.clone())
    }

    pub(crate) fn last_file(&self) -> Option<FileRef> {
        self.last_file.lock().ok().and_then(|guard| guard.clone())
    }

    async fn respond(&self) -> Result<PredictionResult, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

#[async_trait]
impl ClassificationService for StubService {
    async fn predict(&self, input: SingleInput) -> Result<PredictionResult, DispatchError> {
        if let Ok(mut last) = self.last_single.lock() {
            *last = Some(input);
        }
        self.respond().await
    }

    async fn predict_file(&self, file: FileRef) -> Result<PredictionResult, DispatchError> {
        if let Ok(mut last) = self.last_file.lock() {
            *last = Some(file);
        }
        self.respond().await
    }

    async fn retrain(&self, file: FileRef) -> Result<RetrainResult, DispatchError> {
        if let Ok(mut last) = self.last_file.lock() {
            *last = Some(file);
        }
        let prediction = self.respond().await?;
        Ok(RetrainResult {
            prediction,
            metrics: self.metrics,
        })
    }
}
