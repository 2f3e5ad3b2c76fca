//! Tests for the app module.
//!
//! Organized into submodules by functionality:
//! - `helpers` - Shared test utilities
//! - `modes` - Mode switching, key bindings and editing
//! - `dispatch` - Submission, settlement and cancellation
//! - `file_picker` - Path editor, suggestion popup and file slots
//! - `settings` - Settings panel and persistence
//! - `render` - Screen rendering with `TestBackend`
//! - `http` - Wire contract against an in-process HTTP server

#[allow(clippy::unwrap_used, clippy::expect_used)]
mod dispatch;
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod helpers;
