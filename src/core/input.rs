//! Per-mode input collected from the operator.
//!
//! Pure state: nothing here touches the filesystem or the network. A file
//! slot only records which path the operator picked; reading it happens at
//! dispatch time.

use std::path::{Path, PathBuf};

use crate::core::Mode;

/// Free-text input for the single-record mode.
///
/// Both fields may be empty; empty strings are forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleInput {
    pub title: String,
    pub body: String,
}

impl SingleInput {
    /// Returns true if both title and body are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }
}

/// The two file slots, one per file-based mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSlot {
    Batch,
    Retrain,
}

impl FileSlot {
    /// Returns the mode that owns this slot.
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::Batch => Mode::Batch,
            Self::Retrain => Mode::Retrain,
        }
    }

    /// Returns the slot owned by `mode`, or `None` for [`Mode::Single`].
    #[must_use]
    pub const fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Single => None,
            Mode::Batch => Some(Self::Batch),
            Mode::Retrain => Some(Self::Retrain),
        }
    }
}

/// Reference to a file picked by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: PathBuf,
}

impl FileRef {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name used for the multipart upload.
    ///
    /// Falls back to the full path when it has no final component.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// The input a request carried, kept until the request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentInput {
    Single(SingleInput),
    File(FileSlot, FileRef),
}

/// Holds the input of all three modes at once.
///
/// Each mode's input is independent: selecting a batch file does not touch
/// the retrain slot, and switching modes keeps everything.
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    single: SingleInput,
    batch_file: Option<FileRef>,
    retrain_file: Option<FileRef>,
}

impl InputCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.single.title = text.into();
    }

    pub fn set_body(&mut self, text: impl Into<String>) {
        self.single.body = text.into();
    }

    #[must_use]
    pub fn single(&self) -> &SingleInput {
        &self.single
    }

    /// Resets title and body to empty strings.
    pub fn clear_single(&mut self) {
        self.single = SingleInput::default();
    }

    /// Selects a file for `slot`, replacing any previous selection.
    pub fn select_file(&mut self, slot: FileSlot, file: FileRef) {
        *self.slot_mut(slot) = Some(file);
    }

    /// Resets `slot` to unset.
    pub fn clear_file(&mut self, slot: FileSlot) {
        *self.slot_mut(slot) = None;
    }

    #[must_use]
    pub fn file(&self, slot: FileSlot) -> Option<&FileRef> {
        match slot {
            FileSlot::Batch => self.batch_file.as_ref(),
            FileSlot::Retrain => self.retrain_file.as_ref(),
        }
    }

    /// Returns what a submission of `mode` would carry right now.
    ///
    /// `None` for a file mode with an empty slot.
    #[must_use]
    pub fn snapshot(&self, mode: Mode) -> Option<SentInput> {
        match FileSlot::for_mode(mode) {
            None => Some(SentInput::Single(self.single.clone())),
            Some(slot) => self
                .file(slot)
                .map(|file| SentInput::File(slot, file.clone())),
        }
    }

    /// Clears the input `sent` came from, if it still holds exactly what
    /// was sent. Returns true if it was cleared.
    ///
    /// Input changed while the request was in flight has not been sent yet
    /// and is kept.
    pub fn reset_if_unchanged(&mut self, sent: &SentInput) -> bool {
        match sent {
            SentInput::Single(input) if self.single == *input => {
                self.clear_single();
                true
            }
            SentInput::File(slot, file) if self.file(*slot) == Some(file) => {
                self.clear_file(*slot);
                true
            }
            _ => false,
        }
    }

    fn slot_mut(&mut self, slot: FileSlot) -> &mut Option<FileRef> {
        match slot {
            FileSlot::Batch => &mut self.batch_file,
            FileSlot::Retrain => &mut self.retrain_file,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn new_collector_is_empty() {
        let inputs = InputCollector::new();
        assert!(inputs.single().is_empty());
        assert!(inputs.file(FileSlot::Batch).is_none());
        assert!(inputs.file(FileSlot::Retrain).is_none());
    }

    #[test]
    fn title_and_body_overwrite() {
        let mut inputs = InputCollector::new();
        inputs.set_title("first");
        inputs.set_title("second");
        inputs.set_body("");
        assert_eq!(inputs.single().title, "second");
        assert_eq!(inputs.single().body, "");
    }

    #[test]
    fn file_slots_are_independent() {
        let mut inputs = InputCollector::new();
        inputs.select_file(FileSlot::Batch, FileRef::new("batch.csv"));
        assert!(inputs.file(FileSlot::Retrain).is_none());

        inputs.select_file(FileSlot::Retrain, FileRef::new("train.csv"));
        inputs.clear_file(FileSlot::Batch);
        assert!(inputs.file(FileSlot::Batch).is_none());
        assert_eq!(
            inputs.file(FileSlot::Retrain).map(FileRef::path),
            Some(Path::new("train.csv"))
        );
    }

    #[test]
    fn select_file_replaces_previous_selection() {
        let mut inputs = InputCollector::new();
        inputs.select_file(FileSlot::Batch, FileRef::new("a.csv"));
        inputs.select_file(FileSlot::Batch, FileRef::new("b.csv"));
        assert_eq!(
            inputs.file(FileSlot::Batch),
            Some(&FileRef::new("b.csv"))
        );
    }

    #[test]
    fn reset_only_touches_the_sent_input() {
        let mut inputs = InputCollector::new();
        inputs.set_title("title");
        inputs.select_file(FileSlot::Batch, FileRef::new("a.csv"));
        inputs.select_file(FileSlot::Retrain, FileRef::new("b.csv"));

        let retrain = inputs.snapshot(Mode::Retrain).expect("slot filled");
        assert!(inputs.reset_if_unchanged(&retrain));
        assert!(inputs.file(FileSlot::Retrain).is_none());
        assert!(inputs.file(FileSlot::Batch).is_some());
        assert_eq!(inputs.single().title, "title");

        let single = inputs.snapshot(Mode::Single).expect("always present");
        assert!(inputs.reset_if_unchanged(&single));
        assert!(inputs.single().is_empty());
        assert!(inputs.file(FileSlot::Batch).is_some());
    }

    #[test]
    fn empty_slot_has_no_snapshot() {
        assert!(InputCollector::new().snapshot(Mode::Batch).is_none());
    }

    #[test]
    fn input_changed_after_sending_is_kept() {
        let mut inputs = InputCollector::new();
        inputs.set_title("sent");
        let single = inputs.snapshot(Mode::Single).expect("always present");
        inputs.set_body("typed while waiting");

        assert!(!inputs.reset_if_unchanged(&single));
        assert_eq!(inputs.single().body, "typed while waiting");

        inputs.select_file(FileSlot::Batch, FileRef::new("a.csv"));
        let batch = inputs.snapshot(Mode::Batch).expect("slot filled");
        inputs.select_file(FileSlot::Batch, FileRef::new("b.csv"));

        assert!(!inputs.reset_if_unchanged(&batch));
        assert_eq!(inputs.file(FileSlot::Batch), Some(&FileRef::new("b.csv")));
    }

    #[test]
    fn file_name_uses_last_component() {
        assert_eq!(FileRef::new("data/news.csv").file_name(), "news.csv");
    }

    #[test]
    fn slot_mode_mapping() {
        assert_eq!(FileSlot::for_mode(Mode::Single), None);
        assert_eq!(FileSlot::for_mode(Mode::Batch), Some(FileSlot::Batch));
        assert_eq!(FileSlot::Retrain.mode(), Mode::Retrain);
    }
}
