// Softkey Compose Engine
// Splits typed glyphs into committed text and a pending composition

use crate::transform::deadkeys::{DeadKeyTable, PendingDeadKey};
use crate::transform::history::HistoryState;
use crate::transform::table::TransformTable;

/// Result of feeding the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeOutcome {
    /// Text to commit to the host, possibly empty
    pub commit: String,
    /// Text that stays pending (shown underlined), possibly empty
    pub composition: String,
}

impl ComposeOutcome {
    pub fn is_empty(&self) -> bool {
        self.commit.is_empty() && self.composition.is_empty()
    }
}

/// Dead-key and transform composition for one layout
#[derive(Debug, Clone, Default)]
pub struct ComposeEngine {
    table: TransformTable,
    dead_keys: DeadKeyTable,
    history: HistoryState,
    dead: Option<PendingDeadKey>,
}

impl ComposeEngine {
    pub fn new(table: TransformTable, dead_keys: DeadKeyTable) -> Self {
        Self {
            table,
            dead_keys,
            history: HistoryState::new(),
            dead: None,
        }
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn has_pending_dead_key(&self) -> bool {
        self.dead.is_some()
    }

    /// Everything not committed yet, dead glyph included
    pub fn composition(&self) -> String {
        let mut text = self.history.current_text.clone();
        if let Some(dead) = &self.dead {
            text.push_str(&dead.glyph);
        }
        text
    }

    /// Feed one typed glyph
    pub fn process(&mut self, glyph: &str) -> ComposeOutcome {
        let mut commit = String::new();
        let mut glyph = glyph.to_string();

        if let Some(dead) = self.dead.take() {
            match dead.try_compose(&glyph) {
                Some(merged) => {
                    log::trace!("dead key '{}' + '{}' -> '{}'", dead.glyph, glyph, merged);
                    glyph = merged;
                }
                None => {
                    commit.push_str(&self.history.take());
                    commit.push_str(&dead.glyph);
                    if let Some(next) = self.dead_keys.lookup(&glyph) {
                        self.dead = Some(next);
                        return ComposeOutcome {
                            commit,
                            composition: self.composition(),
                        };
                    }
                }
            }
        } else if let Some(dead) = self.dead_keys.lookup(&glyph) {
            self.dead = Some(dead);
            return ComposeOutcome {
                commit,
                composition: self.composition(),
            };
        }

        self.history.remember();
        let mut text = std::mem::take(&mut self.history.current_text);
        text.push_str(&glyph);

        let boundary = self.history.current_boundary;
        let split = byte_offset(&text, boundary);
        if let Some(rewritten) = self.table.apply(&text[split..]) {
            text = format!("{}{}", &text[..split], rewritten);
            self.history.current_boundary = text.chars().count();
        }
        self.history.current_text = text;

        match self.table.predict_transform_boundary(&self.history.current_text) {
            None => commit.push_str(&self.history.take()),
            Some(keep_from) => {
                let text = &self.history.current_text;
                commit.push_str(&text[..byte_offset(text, keep_from)]);
                self.history.prune(keep_from);
            }
        }

        ComposeOutcome {
            commit,
            composition: self.composition(),
        }
    }

    /// Dead key + space commits the standalone accent; otherwise the
    /// composition is flushed followed by a space.
    pub fn space(&mut self) -> ComposeOutcome {
        match self.dead.take() {
            Some(dead) => {
                let mut commit = self.history.take();
                commit.push_str(&dead.standalone());
                ComposeOutcome {
                    commit,
                    composition: String::new(),
                }
            }
            None => {
                let mut out = self.flush();
                out.commit.push(' ');
                out
            }
        }
    }

    /// Undo the last keystroke of the composition.
    ///
    /// A rewrite done by that keystroke is reverted; once text was committed
    /// the composition just loses its last glyph. Returns `None` when
    /// nothing is pending, so the host should delete committed text instead.
    pub fn backspace(&mut self) -> Option<ComposeOutcome> {
        if self.dead.take().is_none() && !self.history.undo() && !self.history.pop() {
            return None;
        }
        Some(ComposeOutcome {
            commit: String::new(),
            composition: self.composition(),
        })
    }

    /// Commit everything pending
    pub fn flush(&mut self) -> ComposeOutcome {
        let mut commit = self.history.take();
        if let Some(dead) = self.dead.take() {
            commit.push_str(&dead.glyph);
        }
        ComposeOutcome {
            commit,
            composition: String::new(),
        }
    }

    /// Drop all pending state without committing (context reset)
    pub fn reset(&mut self) {
        self.history.clear();
        self.dead = None;
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
