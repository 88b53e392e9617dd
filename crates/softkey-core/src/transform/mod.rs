// Softkey Transform Layer
// Dead keys, transform rules and the compose engine built on them

pub mod deadkeys;
pub mod engine;
pub mod history;
pub mod prefix;
pub mod table;

pub use deadkeys::{DeadKeyKind, DeadKeyTable, PendingDeadKey};
pub use engine::{ComposeEngine, ComposeOutcome};
pub use history::HistoryState;
pub use table::TransformTable;
