// Softkey State Manager
// Modifier bitmask with sticky and chording semantics

use crate::ModifierState;

/// Owns the modifier state of one keyboard session.
///
/// Four masks are tracked side by side:
/// - `state`: modifiers currently in effect
/// - `sticky`: modifiers that survive the next committed keystroke
/// - `key_down`: modifier keys physically held on screen
/// - `chording`: held modifiers frozen by a commit; they release together
///
/// `chording` is always a subset of `key_down`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateManager {
    state: ModifierState,
    sticky: ModifierState,
    key_down: ModifierState,
    chording: ModifierState,
}

impl StateManager {
    /// Create a manager in the DEFAULT state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current modifier state
    pub fn state(&self) -> ModifierState {
        self.state
    }

    /// Record a modifier key going down or up.
    ///
    /// Releasing a key ends any chord it took part in.
    pub fn set_key_down(&mut self, bits: ModifierState, is_down: bool) {
        self.key_down.set(bits, is_down);
        if !is_down {
            self.chording.remove(bits);
        }
    }

    /// Enable or disable modifier bits
    pub fn set_state(&mut self, bits: ModifierState, enabled: bool) {
        self.state.set(bits, enabled);
    }

    /// Mark modifier bits as sticky (surviving the next commit) or not
    pub fn set_sticky(&mut self, bits: ModifierState, enabled: bool) {
        self.sticky.set(bits, enabled);
    }

    /// Check a modifier.
    ///
    /// `DEFAULT` is "in effect" only when no modifier is set.
    pub fn has_state(&self, bits: ModifierState) -> bool {
        if bits.is_empty() {
            self.state.is_empty()
        } else {
            self.state.intersects(bits)
        }
    }

    /// Check whether a modifier is sticky
    pub fn is_sticky(&self, bits: ModifierState) -> bool {
        !bits.is_empty() && self.sticky.intersects(bits)
    }

    /// Check whether a modifier key is held down
    pub fn is_key_down(&self, bits: ModifierState) -> bool {
        !bits.is_empty() && self.key_down.intersects(bits)
    }

    /// Freeze every held modifier into the chord.
    ///
    /// Called once when a non-modifier key commits while modifiers are held.
    pub fn trigger_chording(&mut self) {
        self.chording |= self.key_down;
    }

    /// Check whether a modifier participates in the current chord
    pub fn is_chording(&self, bits: ModifierState) -> bool {
        !bits.is_empty() && self.chording.intersects(bits)
    }

    /// Drop every modifier that is not sticky.
    ///
    /// Returns the bits that were released so callers can report them.
    pub fn clear_unsticky_state(&mut self) -> ModifierState {
        let released = self.state - self.sticky;
        self.state &= self.sticky;
        released
    }

    /// Check whether any active modifier would be dropped by the next commit
    pub fn has_unsticky_state(&self) -> bool {
        !(self.state - self.sticky).is_empty()
    }

    /// Return to DEFAULT (focus loss)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
