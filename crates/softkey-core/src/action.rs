// Softkey Action Type
// Press/release phase of a key event sent to the host

use std::fmt;

/// Represents the action state of an emitted key event.
///
/// Soft keys only produce `Press` (tap) and `Repeat` (auto-repeat while
/// held); `Release` is emitted for modifiers forwarded as raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
    Repeat,
}

impl Action {
    /// Returns true if the action is either PRESS or REPEAT
    pub fn is_pressed(self) -> bool {
        matches!(self, Action::Press | Action::Repeat)
    }

    /// Returns true if this is a REPEAT event
    pub fn is_repeat(self) -> bool {
        matches!(self, Action::Repeat)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "release"),
            Action::Press => write!(f, "press"),
            Action::Repeat => write!(f, "repeat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_properties() {
        assert!(Action::Press.is_pressed());
        assert!(!Action::Press.is_repeat());
        assert!(Action::Repeat.is_pressed());
        assert!(Action::Repeat.is_repeat());
        assert!(!Action::Release.is_pressed());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Press.to_string(), "press");
        assert_eq!(Action::Repeat.to_string(), "repeat");
        assert_eq!(Action::Release.to_string(), "release");
    }
}
