// Softkey Compose History
// Text window used for boundary prediction, pruned as text is committed

/// Pending text and transform boundaries.
///
/// Boundaries are char indices into the matching text. Text before
/// `current_boundary` has already been transformed and is never matched
/// again. The previous window is the pending text as it was before the
/// last keystroke; it is dropped as soon as any text gets committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub previous_text: Option<String>,
    pub previous_boundary: usize,
    pub current_text: String,
    pub current_boundary: usize,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current window before a keystroke changes it
    pub fn remember(&mut self) {
        self.previous_text = Some(self.current_text.clone());
        self.previous_boundary = self.current_boundary;
    }

    /// Drop the first `count` chars, which were just committed
    pub fn prune(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.current_text = self.current_text.chars().skip(count).collect();
        self.current_boundary = self.current_boundary.saturating_sub(count);
        self.previous_text = None;
    }

    /// Restore the window from before the last keystroke
    pub fn undo(&mut self) -> bool {
        match self.previous_text.take() {
            Some(text) => {
                self.current_text = text;
                self.current_boundary = self.previous_boundary;
                true
            }
            None => false,
        }
    }

    /// Remove the last char; returns false when empty
    pub fn pop(&mut self) -> bool {
        if self.current_text.pop().is_none() {
            return false;
        }
        let len = self.current_text.chars().count();
        self.current_boundary = self.current_boundary.min(len);
        self.previous_text = None;
        true
    }

    /// Take the whole pending text, leaving the window empty
    pub fn take(&mut self) -> String {
        self.previous_text = None;
        self.current_boundary = 0;
        std::mem::take(&mut self.current_text)
    }

    pub fn is_empty(&self) -> bool {
        self.current_text.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
