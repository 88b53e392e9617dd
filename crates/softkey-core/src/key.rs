// Softkey Key Types
// Key identifiers, key kinds and per-kind gesture defaults

use std::fmt;

use crate::input::TargetConfig;
use crate::layout::slot::CharacterSlot;
use crate::Modifier;

/// Stable identifier of one on-screen key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyId(pub u16);

impl KeyId {
    pub fn code(self) -> u16 {
        self.0
    }
}

impl From<u16> for KeyId {
    fn from(code: u16) -> Self {
        KeyId(code)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Code carried by a raw key event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Tab,
    /// A character forwarded with CTRL or ALT held
    Char(String),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Char(text) => write!(f, "{}", text),
        }
    }
}

/// What a key does when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    /// Up to four glyphs picked by modifier state
    Character { slot: CharacterSlot },
    /// One glyph with long-press alternatives
    Compact { text: String, more: Vec<String> },
    Modifier { modifier: Modifier },
    Backspace,
    Enter,
    Tab,
    Space,
    /// Switches the visible keyset
    Switcher { keyset: String },
}

impl KeyKind {
    /// Character and compact keys take part in the nearby-key index
    pub fn is_spatial(&self) -> bool {
        matches!(self, KeyKind::Character { .. } | KeyKind::Compact { .. })
    }

    /// Default gesture behavior for this kind of key
    pub fn default_config(&self) -> TargetConfig {
        match self {
            KeyKind::Modifier { .. } => TargetConfig {
                double_click: true,
                long_press_without_pointer_up: true,
                ..TargetConfig::default()
            },
            KeyKind::Compact { more, .. } if !more.is_empty() => TargetConfig {
                long_press_with_pointer_up: true,
                ..TargetConfig::default()
            },
            KeyKind::Backspace => TargetConfig {
                repeat: true,
                ..TargetConfig::default()
            },
            _ => TargetConfig::default(),
        }
    }
}

/// One key of a loaded layout
#[derive(Debug, Clone, PartialEq)]
pub struct SoftKey {
    pub id: KeyId,
    pub name: String,
    pub kind: KeyKind,
    pub config: TargetConfig,
}

impl SoftKey {
    /// Create a key with the default gesture behavior of its kind
    pub fn new(id: KeyId, name: impl Into<String>, kind: KeyKind) -> Self {
        let config = kind.default_config();
        Self {
            id,
            name: name.into(),
            kind,
            config,
        }
    }

    pub fn with_config(mut self, config: TargetConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether the key has any altgr glyph
    pub fn has_altgr(&self) -> bool {
        match &self.kind {
            KeyKind::Character { slot } => slot.has_altgr(),
            _ => false,
        }
    }
}
