//! Rendering methods for the App.
//!
//! - **Main screen**: header with mode tabs, input panel, status, results, footer
//! - **Settings panel**: modal overlay drawn on top of the main screen

mod main;
mod settings;

use ratatui::Frame;

use super::{App, AppMode};

impl App {
    /// Renders the application UI.
    pub fn render(&self, frame: &mut Frame) {
        self.render_main(frame);
        if self.mode == AppMode::Settings {
            self.render_settings(frame);
        }
    }
}
