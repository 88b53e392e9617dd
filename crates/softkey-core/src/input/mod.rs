// Softkey Input Layer
// Pointer events, gesture disambiguation and timer scheduling

mod event;
pub mod gesture;
mod handler;
mod timer;

pub use event::{GestureInput, PointerEvent, PointerEventKind, Timestamp};
pub use gesture::{
    GestureConfig, GestureDisambiguator, GestureIntent, GestureIntents, Phase, SwipeDirection,
    TargetConfig,
};
pub use handler::PointerHandler;
pub use timer::{TimerId, TimerKind, TimerQueue};
