// Softkey Modifier System
// Closed set of on-screen modifiers and their bitmask representation

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

bitflags! {
    /// Bitmask over the modifiers that can be active on the keyboard.
    ///
    /// The empty mask is the DEFAULT state. Bits outside the declared
    /// flags are dropped on construction, so an unknown modifier bit
    /// never reaches the state manager.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierState: u8 {
        const SHIFT = 1 << 0;
        const ALTGR = 1 << 1;
        const CAPSLOCK = 1 << 2;
        const CTRL = 1 << 3;
        const ALT = 1 << 4;
    }
}

impl ModifierState {
    /// The DEFAULT state (no modifier set)
    pub const DEFAULT: Self = Self::empty();

    /// Build a state from raw bits, ignoring unknown bits
    pub fn from_raw(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Modifiers contained in this mask, in declaration order
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> {
        Modifier::iter().filter(move |m| self.contains(m.state()))
    }
}

/// A single modifier key that can appear on a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(to_string = "SHIFT")]
    Shift,
    #[strum(to_string = "ALTGR", serialize = "AltGraph")]
    AltGr,
    #[strum(to_string = "CAPSLOCK", serialize = "Caps")]
    CapsLock,
    #[strum(to_string = "CTRL", serialize = "Control")]
    Ctrl,
    #[strum(to_string = "ALT")]
    Alt,
}

impl Modifier {
    /// The bit this modifier owns in a [`ModifierState`]
    pub fn state(self) -> ModifierState {
        match self {
            Modifier::Shift => ModifierState::SHIFT,
            Modifier::AltGr => ModifierState::ALTGR,
            Modifier::CapsLock => ModifierState::CAPSLOCK,
            Modifier::Ctrl => ModifierState::CTRL,
            Modifier::Alt => ModifierState::ALT,
        }
    }

    /// Look a modifier up by name or alias (case-insensitive)
    pub fn from_alias(alias: &str) -> Option<Modifier> {
        Modifier::from_str(alias.trim()).ok()
    }

    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Locking modifiers toggle on tap instead of acting one-shot
    pub fn is_lock(self) -> bool {
        matches!(self, Modifier::CapsLock)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
