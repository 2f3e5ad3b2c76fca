//! Shared test utilities for the app module.
//!
//! - [`Harness`] - an `App` wired to a [`StubService`] inside a temporary
//!   directory, with handles on the background channels
//! - Key event helpers (`char_key`, `key`, `ctrl`, `type_text`)
//! - [`wait_for`] / [`settle`] - drive `process_events` until a condition holds
//! - [`render_to_string`] - draws the app on a `TestBackend`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tempfile::TempDir;
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, SearchQuery, SettingsState};
use crate::core::Mode;
use crate::core::testing::StubService;
use crate::fs::AppPaths;

/// An app under test plus everything needed to poke at it.
pub struct Harness {
    pub app: App,
    pub service: Arc<StubService>,
    /// Sender into the app's event channel, for injecting search results.
    pub events: mpsc::Sender<AppEvent>,
    /// Queries the app sent to the (absent) search task.
    pub search_rx: mpsc::Receiver<SearchQuery>,
    /// Working directory and parent of the config directory.
    pub dir: TempDir,
}

impl Harness {
    /// Creates a file in the working directory and returns its path
    /// relative to it.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        PathBuf::from(name)
    }

    /// Returns the absolute path of a file in the working directory.
    pub fn absolute(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn paths(&self) -> AppPaths {
        AppPaths::new(&self.dir.path().join(".textclf"))
    }
}

/// Creates an app with default settings around `service`.
///
/// No search task is spawned, so this works without a runtime; search
/// queries pile up in [`Harness::search_rx`].
pub fn create_harness(service: StubService) -> Harness {
    create_harness_with_settings(service, SettingsState::default())
}

pub fn create_harness_with_settings(service: StubService, settings: SettingsState) -> Harness {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(service);
    let (event_tx, event_rx) = mpsc::channel(64);
    let (search_tx, search_rx) = mpsc::channel(64);

    let app = App::assemble(
        AppPaths::new(&dir.path().join(".textclf")),
        settings,
        service.clone(),
        dir.path().to_path_buf(),
        (event_tx.clone(), event_rx),
        search_tx,
    );

    Harness {
        app,
        service,
        events: event_tx,
        search_rx,
        dir,
    }
}

/// Service answering every call with one positive prediction.
pub fn positive_service() -> StubService {
    StubService::ok(&[0], &[0.92])
}

pub fn key(code: KeyCode) -> KeyEvent {
    with_modifiers(code, KeyModifiers::NONE)
}

pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> KeyEvent {
    with_modifiers(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Types `text` one key at a time.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(char_key(c));
    }
}

/// Processes events until `condition` holds, panicking after two seconds.
pub async fn wait_for(app: &mut App, condition: impl Fn(&App) -> bool) {
    for _ in 0..200 {
        app.process_events();
        if condition(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

/// Processes events until no mode has a request in flight.
pub async fn settle(app: &mut App) {
    wait_for(app, |app| {
        Mode::all().iter().all(|mode| !app.session.is_pending(*mode))
    })
    .await;
}

/// Renders the app and returns the screen as text, one line per row.
pub fn render_to_string(app: &mut App, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|frame| {
        app.update_layout(frame.area());
        app.render(frame);
    })?;

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..height {
        for x in 0..width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    Ok(text)
}
