//! Interaction core: modes, inputs, dispatch, results and errors.
//!
//! Everything here is independent of the terminal. The [`Session`] is the
//! entry point the UI talks to; the other modules are its parts.

pub mod dispatcher;
pub mod error;
pub mod input;
pub mod mode;
pub mod presenter;
pub mod results;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{
    DEFAULT_TIMEOUT, RequestDispatcher, SequenceBook, Settlement, SubmitOutcome, Ticket,
};
pub use error::{DispatchError, ErrorChannel, ErrorKind, ErrorMessage};
pub use input::{FileRef, FileSlot, InputCollector, SentInput, SingleInput};
pub use mode::{Mode, ModeController};
pub use presenter::{ResultRow, View, format_value, present};
pub use results::{Label, Metrics, ModeResult, PredictionResult, ResultStore, RetrainResult};
pub use service::{ClassificationService, DEFAULT_SERVER_URL, HttpClassificationService};
pub use session::{Applied, Session, SwitchPolicy};
