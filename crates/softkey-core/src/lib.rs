// Softkey Core Library
// Gesture, modifier, layout and composition model of an on-screen keyboard

pub mod action;
pub mod input;
pub mod intent;
pub mod key;
pub mod keyboard;
pub mod layout;
pub mod modifier;
pub mod state;
pub mod transform;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "config")]
pub mod settings;

pub use action::Action;
pub use input::{
    GestureConfig, GestureDisambiguator, GestureInput, GestureIntent, PointerEvent,
    PointerEventKind, PointerHandler, SwipeDirection, TargetConfig, TimerId, TimerKind,
    TimerQueue, Timestamp,
};
pub use intent::Intent;
pub use key::{KeyCode, KeyId, KeyKind, SoftKey};
pub use keyboard::{Keyboard, KeyboardOptions};
pub use layout::{split_value, CharacterSlot, KeyboardGeometry, Layout, SlotIndex, SlotView};
pub use modifier::{Modifier, ModifierState};
pub use state::StateManager;
pub use transform::{ComposeEngine, ComposeOutcome, DeadKeyTable, TransformTable};

#[cfg(feature = "config")]
pub use config::ConfigError;

#[cfg(feature = "config")]
pub use settings::{default_settings_content, Settings, SettingsError};
