// Softkey Config API
// Layout files in TOML

pub mod parser;

pub use parser::{ConfigError, KeyToml, LayoutHeader, LayoutToml, RowToml, TransformToml};
