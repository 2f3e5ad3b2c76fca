//! Terminal event configuration.
//!
//! - Bracketed paste, so a pasted description arrives as one event
//! - Keyboard enhancement, so Shift+Enter can be told apart from Enter

use std::io::stdout;

use ratatui::crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;

/// Enables the terminal event modes and disables them again on drop,
/// including when the application panics.
pub struct TerminalEventGuard {
    bracketed_paste_enabled: bool,
    keyboard_enhancement_enabled: bool,
}

impl TerminalEventGuard {
    /// Enables the modes the terminal supports. Failures are logged and
    /// otherwise ignored.
    #[must_use]
    pub fn new() -> Self {
        let bracketed_paste_enabled = match execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "bracketed paste unavailable, pastes arrive as keystrokes");
                false
            }
        };

        let keyboard_enhancement_enabled = match execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "keyboard enhancement unavailable, use Alt+Enter for newlines");
                false
            }
        };

        tracing::debug!(
            bracketed_paste_enabled,
            keyboard_enhancement_enabled,
            "terminal event modes configured"
        );

        Self {
            bracketed_paste_enabled,
            keyboard_enhancement_enabled,
        }
    }
}

impl Default for TerminalEventGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalEventGuard {
    fn drop(&mut self) {
        if self.keyboard_enhancement_enabled {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        if self.bracketed_paste_enabled {
            let _ = execute!(stdout(), DisableBracketedPaste);
        }
    }
}
