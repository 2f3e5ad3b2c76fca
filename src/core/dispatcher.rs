//! Request dispatch with per-mode sequencing and cancellation.
//!
//! Every submission becomes a spawned task tagged with a [`Ticket`]. The task
//! reports back through the app event channel as [`AppEvent::Settled`]; the
//! session then calls [`RequestDispatcher::accept`] to decide whether the
//! settlement is still current.
//!
//! A settlement is current when:
//! - its sequence number is the latest one issued for its mode, and
//! - it was issued in the current cancellation epoch.
//!
//! Cancelled tasks never send anything. Settlements already queued when the
//! scope is cancelled are rejected by the epoch check.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::AppEvent;
use crate::core::Mode;
use crate::core::error::DispatchError;
use crate::core::input::{FileRef, SingleInput};
use crate::core::results::ModeResult;
use crate::core::service::ClassificationService;

/// Default time a request may take before it is reported as a network error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mode: Mode,
    pub seq: u64,
    epoch: u64,
}

/// The outcome of a request, delivered back to the UI loop.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub ticket: Ticket,
    pub outcome: Result<ModeResult, DispatchError>,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The request was spawned.
    Dispatched(Ticket),
    /// The mode already has a request in flight; nothing was sent.
    AlreadyPending,
    /// A precondition failed; nothing was sent.
    Rejected(DispatchError),
}

#[derive(Debug, Clone, Copy, Default)]
struct ModeSequence {
    latest: u64,
    pending: Option<u64>,
}

/// Per-mode sequence numbers and pending flags.
#[derive(Debug, Clone, Default)]
pub struct SequenceBook {
    epoch: u64,
    single: ModeSequence,
    batch: ModeSequence,
    retrain: ModeSequence,
}

impl SequenceBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, mode: Mode) -> &mut ModeSequence {
        match mode {
            Mode::Single => &mut self.single,
            Mode::Batch => &mut self.batch,
            Mode::Retrain => &mut self.retrain,
        }
    }

    fn get(&self, mode: Mode) -> ModeSequence {
        match mode {
            Mode::Single => self.single,
            Mode::Batch => self.batch,
            Mode::Retrain => self.retrain,
        }
    }

    /// Issues the next ticket for `mode` and marks it pending.
    ///
    /// Does not check for a request already in flight; that guard lives in
    /// [`RequestDispatcher`].
    pub fn issue(&mut self, mode: Mode) -> Ticket {
        let epoch = self.epoch;
        let entry = self.entry(mode);
        entry.latest += 1;
        entry.pending = Some(entry.latest);
        Ticket {
            mode,
            seq: entry.latest,
            epoch,
        }
    }

    #[must_use]
    pub fn is_pending(&self, mode: Mode) -> bool {
        self.get(mode).pending.is_some()
    }

    /// Returns the latest sequence number issued for `mode` (0 before any).
    #[must_use]
    pub fn latest(&self, mode: Mode) -> u64 {
        self.get(mode).latest
    }

    /// Records that `ticket` settled and returns whether it is current.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        let entry = self.entry(ticket.mode);
        if entry.pending == Some(ticket.seq) {
            entry.pending = None;
        }
        ticket.seq == entry.latest
    }

    /// Invalidates every outstanding ticket and clears the pending flags.
    fn invalidate(&mut self) {
        self.epoch += 1;
        for mode in Mode::all() {
            self.entry(*mode).pending = None;
        }
    }
}

/// Turns collected input into outbound requests.
///
/// Owns the cancellation scope of every request it spawns. Dropping the
/// dispatcher cancels them all.
pub struct RequestDispatcher {
    service: Arc<dyn ClassificationService>,
    events: mpsc::Sender<AppEvent>,
    scope: CancellationToken,
    book: SequenceBook,
    timeout: Duration,
}

impl RequestDispatcher {
    /// Creates a dispatcher reporting settlements on `events`.
    #[must_use]
    pub fn new(service: Arc<dyn ClassificationService>, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            service,
            events,
            scope: CancellationToken::new(),
            book: SequenceBook::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout applied to requests dispatched from now on.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replaces the service used by requests dispatched from now on.
    pub fn set_service(&mut self, service: Arc<dyn ClassificationService>) {
        self.service = service;
    }

    #[must_use]
    pub fn is_pending(&self, mode: Mode) -> bool {
        self.book.is_pending(mode)
    }

    #[cfg(test)]
    pub(crate) fn book_mut(&mut self) -> &mut SequenceBook {
        &mut self.book
    }

    /// Classifies one record through `/predict`.
    pub fn submit_single(&mut self, input: SingleInput) -> SubmitOutcome {
        if self.is_pending(Mode::Single) {
            return SubmitOutcome::AlreadyPending;
        }
        let service = Arc::clone(&self.service);
        let ticket = self.book.issue(Mode::Single);
        self.spawn(ticket, async move {
            service.predict(input).await.map(ModeResult::Prediction)
        });
        SubmitOutcome::Dispatched(ticket)
    }

    /// Classifies every record of the selected batch file.
    ///
    /// Rejected without contacting the service when no file is selected.
    pub fn submit_batch(&mut self, file: Option<FileRef>) -> SubmitOutcome {
        if self.is_pending(Mode::Batch) {
            return SubmitOutcome::AlreadyPending;
        }
        let Some(file) = file else {
            return SubmitOutcome::Rejected(DispatchError::missing_file(Mode::Batch));
        };
        let service = Arc::clone(&self.service);
        let ticket = self.book.issue(Mode::Batch);
        self.spawn(ticket, async move {
            service.predict_file(file).await.map(ModeResult::Prediction)
        });
        SubmitOutcome::Dispatched(ticket)
    }

    /// Retrains the model from the selected labeled file.
    ///
    /// Rejected without contacting the service when no file is selected.
    pub fn submit_retrain(&mut self, file: Option<FileRef>) -> SubmitOutcome {
        if self.is_pending(Mode::Retrain) {
            return SubmitOutcome::AlreadyPending;
        }
        let Some(file) = file else {
            return SubmitOutcome::Rejected(DispatchError::missing_file(Mode::Retrain));
        };
        let service = Arc::clone(&self.service);
        let ticket = self.book.issue(Mode::Retrain);
        self.spawn(ticket, async move {
            service.retrain(file).await.map(ModeResult::Retrain)
        });
        SubmitOutcome::Dispatched(ticket)
    }

    /// Returns whether `ticket` is still current, clearing its pending flag.
    ///
    /// Stale or cancelled settlements return `false` and must be dropped.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        let current = self.book.settle(ticket);
        if !current {
            tracing::debug!(
                mode = ticket.mode.name(),
                seq = ticket.seq,
                latest = self.book.latest(ticket.mode),
                "discarding stale settlement"
            );
        }
        current
    }

    /// Cancels every in-flight request.
    ///
    /// The dispatcher stays usable; later submissions run in a fresh scope.
    pub fn cancel_all(&mut self) {
        self.scope.cancel();
        self.scope = CancellationToken::new();
        self.book.invalidate();
        tracing::info!("cancelled all in-flight requests");
    }

    fn spawn<F>(&self, ticket: Ticket, request: F)
    where
        F: Future<Output = Result<ModeResult, DispatchError>> + Send + 'static,
    {
        let token = self.scope.child_token();
        let events = self.events.clone();
        let timeout = self.timeout;
        tracing::info!(mode = ticket.mode.name(), seq = ticket.seq, "dispatching request");

        tokio::spawn(async move {
            let outcome = tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(mode = ticket.mode.name(), seq = ticket.seq, "request cancelled");
                    return;
                }
                result = tokio::time::timeout(timeout, request) => match result {
                    Ok(outcome) => outcome,
                    Err(_) => Err(DispatchError::Network(format!(
                        "request timed out after {timeout:?}"
                    ))),
                },
            };
            if token.is_cancelled() {
                return;
            }
            if let Err(e) = &outcome {
                tracing::warn!(mode = ticket.mode.name(), seq = ticket.seq, error = %e, "request failed");
            }
            let _ = events
                .send(AppEvent::Settled(Settlement { ticket, outcome }))
                .await;
        });
    }
}

impl Drop for RequestDispatcher {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
