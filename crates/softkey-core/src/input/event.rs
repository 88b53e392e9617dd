// Softkey Pointer Events
// Raw pointer records fed into the gesture layer

use std::fmt;
use std::str::FromStr;

use crate::input::TimerId;
use crate::KeyId;

/// Milliseconds on the host's monotonic clock
pub type Timestamp = u64;

/// Phase of a raw pointer or touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEventKind {
    /// Returns true for the events that end a gesture
    pub fn is_terminal(self) -> bool {
        matches!(self, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

impl fmt::Display for PointerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerEventKind::Down => write!(f, "down"),
            PointerEventKind::Move => write!(f, "move"),
            PointerEventKind::Up => write!(f, "up"),
            PointerEventKind::Cancel => write!(f, "cancel"),
        }
    }
}

impl FromStr for PointerEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "down" | "pointerdown" | "touchstart" => Ok(PointerEventKind::Down),
            "move" | "pointermove" | "touchmove" => Ok(PointerEventKind::Move),
            "up" | "pointerup" | "touchend" => Ok(PointerEventKind::Up),
            "cancel" | "pointercancel" | "touchcancel" => Ok(PointerEventKind::Cancel),
            other => Err(format!("unknown pointer event: {}", other)),
        }
    }
}

/// One raw pointer record.
///
/// `target` is the key the gesture started on (touch semantics: it does
/// not change while the finger moves). `over` is the key currently under
/// the pointer as reported by the host's hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: KeyId,
    pub over: Option<KeyId>,
    pub x: f64,
    pub y: f64,
    pub timestamp: Timestamp,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, target: KeyId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self {
            kind,
            target,
            over: Some(target),
            x,
            y,
            timestamp,
        }
    }

    pub fn down(target: KeyId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(PointerEventKind::Down, target, x, y, timestamp)
    }

    pub fn moved(target: KeyId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(PointerEventKind::Move, target, x, y, timestamp)
    }

    pub fn up(target: KeyId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(PointerEventKind::Up, target, x, y, timestamp)
    }

    pub fn cancel(target: KeyId, timestamp: Timestamp) -> Self {
        Self::new(PointerEventKind::Cancel, target, 0.0, 0.0, timestamp)
    }

    /// Set the key reported under the pointer
    pub fn with_over(mut self, over: Option<KeyId>) -> Self {
        self.over = over;
        self
    }
}

/// Everything that can advance a gesture: pointer records and timer ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    Pointer(PointerEvent),
    Tick { timer: TimerId, now: Timestamp },
}

impl GestureInput {
    /// Key the input is addressed to
    pub fn target(&self) -> KeyId {
        match self {
            GestureInput::Pointer(event) => event.target,
            GestureInput::Tick { timer, .. } => timer.target,
        }
    }
}

impl From<PointerEvent> for GestureInput {
    fn from(event: PointerEvent) -> Self {
        GestureInput::Pointer(event)
    }
}
