//! Interaction modes and the controller that tracks the active one.

/// One of the three interaction flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Classify one record typed by the operator.
    #[default]
    Single,
    /// Classify every record of a delimited-text file.
    Batch,
    /// Upload a labeled file to retrain the model.
    Retrain,
}

impl Mode {
    /// Returns the display name for the mode.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Batch => "Batch",
            Self::Retrain => "Retrain",
        }
    }

    /// Returns a short description of the mode.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Single => "Classify one title/body record",
            Self::Batch => "Classify every record of a file",
            Self::Retrain => "Retrain the model with a labeled file",
        }
    }

    /// Returns the verb used in error messages for this mode.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Single => "Single prediction",
            Self::Batch => "Batch prediction",
            Self::Retrain => "Retraining",
        }
    }

    /// Returns the function key number bound to this mode.
    #[must_use]
    pub const fn hotkey(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Batch => 2,
            Self::Retrain => 3,
        }
    }

    /// Returns the mode bound to the given function key, if any.
    #[must_use]
    pub const fn from_hotkey(key: u8) -> Option<Self> {
        match key {
            1 => Some(Self::Single),
            2 => Some(Self::Batch),
            3 => Some(Self::Retrain),
            _ => None,
        }
    }

    /// Returns the next mode in the cycle.
    ///
    /// Cycles: Single -> Batch -> Retrain -> Single
    #[must_use]
    pub const fn next(&self) -> Self {
        match self {
            Self::Single => Self::Batch,
            Self::Batch => Self::Retrain,
            Self::Retrain => Self::Single,
        }
    }

    /// Returns all modes in tab order.
    #[must_use]
    pub const fn all() -> &'static [Mode] {
        &[Mode::Single, Mode::Batch, Mode::Retrain]
    }
}

/// Tracks which mode is active.
///
/// Transitions are unconditional: there are no guards and setting the
/// current mode again is a no-op. Switching never touches in-flight
/// requests, which are owned by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    active: Mode,
}

impl ModeController {
    /// Creates a controller starting in [`Mode::Single`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `mode` the active mode and returns the mode that was left.
    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        std::mem::replace(&mut self.active, mode)
    }

    /// Returns the active mode.
    #[must_use]
    pub const fn active_mode(&self) -> Mode {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_starts_in_single_mode() {
        assert_eq!(ModeController::new().active_mode(), Mode::Single);
    }

    #[test]
    fn set_mode_returns_previous_mode() {
        let mut controller = ModeController::new();
        assert_eq!(controller.set_mode(Mode::Retrain), Mode::Single);
        assert_eq!(controller.active_mode(), Mode::Retrain);
    }

    #[test]
    fn set_mode_is_idempotent() {
        let mut controller = ModeController::new();
        controller.set_mode(Mode::Batch);
        assert_eq!(controller.set_mode(Mode::Batch), Mode::Batch);
        assert_eq!(controller.active_mode(), Mode::Batch);
    }

    #[test]
    fn next_cycles_through_all_modes() {
        let start = Mode::Single;
        assert_eq!(start.next(), Mode::Batch);
        assert_eq!(start.next().next(), Mode::Retrain);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn hotkeys_round_trip() {
        for mode in Mode::all() {
            assert_eq!(Mode::from_hotkey(mode.hotkey()), Some(*mode));
        }
        assert_eq!(Mode::from_hotkey(4), None);
    }
}
