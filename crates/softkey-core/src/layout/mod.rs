// Softkey Layout
// Layout model, weighted sizing, key geometry, nearby keys and glyph slots

pub mod geometry;
pub mod model;
pub mod slot;
pub mod spatial;
mod weight;

pub use geometry::{KeyGeometry, KeySpec, KeyboardGeometry, Point, RowSpec};
pub use model::{Layout, LayoutRow};
pub use slot::{reverse_case, CharacterSlot, SlotFlags, SlotIndex, SlotView};
pub use spatial::{build_nearby_keys, is_nearby, NEARBY_KEY_FACTOR};
pub use weight::split_value;
