// Softkey State
// Session-owned modifier state

mod manager;

pub use manager::StateManager;
