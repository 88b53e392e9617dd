// Softkey Layout Model
// A loaded layout: rows of keys, transform rules and dead keys

use indexmap::IndexMap;

use crate::layout::geometry::{KeySpec, RowSpec};
use crate::transform::{DeadKeyTable, TransformTable};
use crate::{KeyId, KeyKind, SoftKey};

/// One row of keys with its height weight and per-key width weights
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutRow {
    pub height: u32,
    pub keys: Vec<(KeyId, u32)>,
}

/// Immutable description of a keyboard layout
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub name: String,
    /// Keep altgr glyphs on screen even when ALTGR is off
    pub always_render_altgr: bool,
    rows: Vec<LayoutRow>,
    keys: IndexMap<KeyId, SoftKey>,
    transforms: Vec<(String, String)>,
    dead_keys: Vec<String>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Start a new row; following keys go into it
    pub fn add_row(&mut self, height: u32) {
        self.rows.push(LayoutRow {
            height,
            keys: Vec::new(),
        });
    }

    /// Append a key to the last row (a row of weight 1 is opened if none
    /// exists). Ids are assigned in declaration order, starting at 1.
    pub fn add_key(&mut self, name: impl Into<String>, kind: KeyKind, width: u32) -> &mut SoftKey {
        if self.rows.is_empty() {
            self.add_row(1);
        }
        let id = KeyId(self.keys.len() as u16 + 1);
        if let Some(row) = self.rows.last_mut() {
            row.keys.push((id, width));
        }
        self.keys
            .entry(id)
            .or_insert_with(|| SoftKey::new(id, name, kind))
    }

    pub fn add_transform(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.transforms.push((from.into(), to.into()));
    }

    pub fn add_dead_key(&mut self, glyph: impl Into<String>) {
        self.dead_keys.push(glyph.into());
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn key(&self, id: KeyId) -> Option<&SoftKey> {
        self.keys.get(&id)
    }

    pub fn key_by_name(&self, name: &str) -> Option<&SoftKey> {
        self.keys.values().find(|k| k.name == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SoftKey> {
        self.keys.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether any key carries an altgr glyph
    pub fn has_altgr_key(&self) -> bool {
        self.keys.values().any(SoftKey::has_altgr)
    }

    pub fn transforms(&self) -> &[(String, String)] {
        &self.transforms
    }

    pub fn dead_keys(&self) -> &[String] {
        &self.dead_keys
    }

    pub fn transform_table(&self) -> TransformTable {
        if self.transforms.is_empty() {
            return TransformTable::empty();
        }
        TransformTable::new(
            self.transforms
                .iter()
                .map(|(from, to)| (from.as_str(), to.as_str())),
        )
    }

    pub fn dead_key_table(&self) -> DeadKeyTable {
        DeadKeyTable::new(self.dead_keys.iter().cloned())
    }

    /// Weights for the geometry pass
    pub fn row_specs(&self) -> Vec<RowSpec> {
        self.rows
            .iter()
            .map(|row| RowSpec {
                height_weight: row.height,
                keys: row
                    .keys
                    .iter()
                    .map(|&(id, width)| KeySpec {
                        id,
                        width_weight: width,
                        spatial: self.keys.get(&id).is_some_and(|k| k.kind.is_spatial()),
                    })
                    .collect(),
            })
            .collect()
    }
}
