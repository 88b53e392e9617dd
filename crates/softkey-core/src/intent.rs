// Softkey Output Intents
// Instructions the keyboard hands back to its host

use std::fmt;

use crate::input::{TimerId, Timestamp};
use crate::{Action, KeyCode, KeyId, Modifier};

/// One instruction for the host; the keyboard never performs side effects
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Insert text at the cursor
    Commit { text: String },
    /// Replace the pending (underlined) composition
    SetComposition { text: String },
    /// Send a raw key event
    KeyEvent { code: KeyCode, action: Action },
    /// A modifier changed; `sticky` is false for one-shot modifiers
    ChangeModifier {
        modifier: Modifier,
        enabled: bool,
        sticky: bool,
    },
    SwitchKeyset { keyset: String },
    /// Show the long-press alternatives of a compact key
    ShowAlternatives { key: KeyId, alternatives: Vec<String> },
    Highlight { key: KeyId, on: bool },
    ScheduleTimer { timer: TimerId, at: Timestamp },
    CancelTimer { timer: TimerId },
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Commit { text } => write!(f, "commit {:?}", text),
            Intent::SetComposition { text } => write!(f, "composition {:?}", text),
            Intent::KeyEvent { code, action } => write!(f, "key {} {}", code, action),
            Intent::ChangeModifier {
                modifier,
                enabled,
                sticky,
            } => write!(
                f,
                "modifier {} {}{}",
                modifier,
                if *enabled { "on" } else { "off" },
                if *sticky { " (locked)" } else { "" }
            ),
            Intent::SwitchKeyset { keyset } => write!(f, "switch {}", keyset),
            Intent::ShowAlternatives { key, alternatives } => {
                write!(f, "alternatives {} [{}]", key, alternatives.join(" "))
            }
            Intent::Highlight { key, on } => {
                write!(f, "highlight {} {}", key, if *on { "on" } else { "off" })
            }
            Intent::ScheduleTimer { timer, at } => {
                write!(f, "schedule {:?} {} at {}ms", timer.kind, timer.target, at)
            }
            Intent::CancelTimer { timer } => {
                write!(f, "cancel {:?} {}", timer.kind, timer.target)
            }
        }
    }
}
