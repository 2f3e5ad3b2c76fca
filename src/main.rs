//! `textclf` - terminal client for a text-classification service
//!
//! Entry point for the application.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use textclf::app::{App, Overrides};
use textclf::cli::Args;
use textclf::fs::AppPaths;
use textclf::logging;
use textclf::tui::TerminalEventGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let paths = AppPaths::new(&args.config_dir);

    // Logging is optional: the UI works without it.
    if let Err(e) = logging::init(&paths, args.log_level.as_deref()) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let overrides = Overrides {
        server_url: args.server_url,
        timeout: args.timeout.map(Duration::from_secs),
    };
    let mut app = App::new(paths, overrides);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();

    tracing::info!("exiting");
    result
}

fn run_app(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    // Must come after ratatui::init, which resets terminal flags.
    let _event_guard = TerminalEventGuard::new();

    loop {
        // Layout is calculated inside the draw closure so it matches the
        // area being rendered.
        terminal.draw(|frame| {
            app.update_layout(frame.area());
            app.render(frame);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    tracing::trace!(?key, "key event");
                    app.handle_key(key);
                }
                Event::Paste(text) => {
                    tracing::trace!(len = text.len(), lines = text.lines().count(), "paste event");
                    app.handle_paste(&text);
                }
                _ => {}
            }
        }

        // Settlements and file search results from background tasks
        app.process_events();

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
