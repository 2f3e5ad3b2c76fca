//! The interaction session: modes, inputs, results and errors in one place.
//!
//! [`Session`] is the only writer of [`ResultStore`] and [`ErrorChannel`].
//! The UI forwards user actions to it and feeds settlements back through
//! [`Session::apply`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::AppEvent;
use crate::core::Mode;
use crate::core::dispatcher::{RequestDispatcher, Settlement, SubmitOutcome};
use crate::core::error::{ErrorChannel, ErrorMessage};
use crate::core::input::{FileSlot, InputCollector, SentInput};
use crate::core::mode::ModeController;
use crate::core::presenter::{View, present};
use crate::core::results::ResultStore;
use crate::core::service::ClassificationService;

/// What happens to the result of a mode when the operator leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchPolicy {
    /// Results stay until replaced by the next success of the same mode.
    #[default]
    Retain,
    /// The result of the mode being left is dropped.
    ClearOnLeave,
}

impl SwitchPolicy {
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::Retain => Self::ClearOnLeave,
            Self::ClearOnLeave => Self::Retain,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Retain => "Keep",
            Self::ClearOnLeave => "Clear",
        }
    }
}

/// How a settlement changed the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A result was stored. `cleared` is the sent input when it was still
    /// current and has been reset; input edited in the meantime is kept.
    Stored {
        mode: Mode,
        cleared: Option<SentInput>,
    },
    /// The error channel was set; inputs and results are untouched.
    Failed(Mode),
    /// The settlement was stale or cancelled and ignored.
    Discarded,
}

/// Owns all interaction state and the request dispatcher.
pub struct Session {
    modes: ModeController,
    inputs: InputCollector,
    results: ResultStore,
    errors: ErrorChannel,
    dispatcher: RequestDispatcher,
    policy: SwitchPolicy,
    /// Input carried by the latest request of each mode still in flight.
    sent: HashMap<Mode, SentInput>,
}

impl Session {
    #[must_use]
    pub fn new(service: Arc<dyn ClassificationService>, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            modes: ModeController::new(),
            inputs: InputCollector::new(),
            results: ResultStore::new(),
            errors: ErrorChannel::new(),
            dispatcher: RequestDispatcher::new(service, events),
            policy: SwitchPolicy::default(),
            sent: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn active_mode(&self) -> Mode {
        self.modes.active_mode()
    }

    /// Switches to `mode`, applying the switch policy to the mode left.
    ///
    /// In-flight requests of any mode are left running.
    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        let previous = self.modes.set_mode(mode);
        if previous != mode && self.policy == SwitchPolicy::ClearOnLeave {
            self.results.clear(previous);
        }
        previous
    }

    #[must_use]
    pub const fn policy(&self) -> SwitchPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SwitchPolicy) {
        self.policy = policy;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.dispatcher.set_timeout(timeout);
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.dispatcher.timeout()
    }

    #[must_use]
    pub fn inputs(&self) -> &InputCollector {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut InputCollector {
        &mut self.inputs
    }

    #[must_use]
    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Hides the current error without touching anything else.
    pub fn dismiss_error(&mut self) {
        self.errors.clear();
    }

    #[must_use]
    pub fn is_pending(&self, mode: Mode) -> bool {
        self.dispatcher.is_pending(mode)
    }

    pub fn dispatcher_mut(&mut self) -> &mut RequestDispatcher {
        &mut self.dispatcher
    }

    /// Submits the input of the active mode.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.submit_mode(self.active_mode())
    }

    /// Submits the input of `mode`.
    ///
    /// A failed precondition is reported on the error channel right away.
    pub fn submit_mode(&mut self, mode: Mode) -> SubmitOutcome {
        let outcome = match FileSlot::for_mode(mode) {
            None => self.dispatcher.submit_single(self.inputs.single().clone()),
            Some(FileSlot::Batch) => self
                .dispatcher
                .submit_batch(self.inputs.file(FileSlot::Batch).cloned()),
            Some(FileSlot::Retrain) => self
                .dispatcher
                .submit_retrain(self.inputs.file(FileSlot::Retrain).cloned()),
        };
        match &outcome {
            SubmitOutcome::Rejected(error) => {
                tracing::info!(mode = mode.name(), error = %error, "submission rejected");
                self.errors.set(ErrorMessage::from_dispatch(mode, error));
            }
            SubmitOutcome::AlreadyPending => {
                tracing::debug!(mode = mode.name(), "submission ignored, request pending");
            }
            SubmitOutcome::Dispatched(_) => {
                if let Some(sent) = self.inputs.snapshot(mode) {
                    self.sent.insert(mode, sent);
                }
            }
        }
        outcome
    }

    /// Applies a settlement delivered by the event loop.
    pub fn apply(&mut self, settlement: Settlement) -> Applied {
        let Settlement { ticket, outcome } = settlement;
        if !self.dispatcher.accept(ticket) {
            return Applied::Discarded;
        }
        let mode = ticket.mode;
        match outcome {
            Ok(result) => {
                tracing::info!(mode = mode.name(), rows = result.prediction().len(), "request succeeded");
                self.errors.clear();
                self.results.store(mode, result);
                let cleared = self
                    .sent
                    .remove(&mode)
                    .filter(|sent| self.inputs.reset_if_unchanged(sent));
                Applied::Stored { mode, cleared }
            }
            Err(error) => {
                self.sent.remove(&mode);
                self.errors.set(ErrorMessage::from_dispatch(mode, &error));
                Applied::Failed(mode)
            }
        }
    }

    /// Cancels every in-flight request.
    pub fn cancel_all(&mut self) {
        self.dispatcher.cancel_all();
        self.sent.clear();
    }

    /// Builds the view of the active mode.
    #[must_use]
    pub fn view(&self) -> View {
        let mode = self.active_mode();
        present(mode, &self.results, &self.errors, self.is_pending(mode))
    }
}
