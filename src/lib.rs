//! `textclf` - terminal client for a text-classification service
//!
//! Classifies a single record, classifies every record of a file, or
//! retrains the model with a labeled file, over the service's HTTP API.

pub mod app;
pub mod cli;
pub mod core;
pub mod file_search;
pub mod fs;
pub mod logging;
pub mod tui;
