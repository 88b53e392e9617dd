// Softkey Layout Parser - TOML with Serde
// Parses layout files into a compiled Layout

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use strum_macros::EnumString;

use crate::input::SwipeDirection;
use crate::layout::{CharacterSlot, Layout};
use crate::{KeyKind, Modifier};

/// Layout parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Unknown key kind: {0}")]
    UnknownKey(String),

    #[error("Duplicate key name: {0}")]
    DuplicateKey(String),

    #[error("Invalid key slot: {0}")]
    InvalidKeySlot(String),
}

/// Root TOML table of a layout file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutToml {
    pub layout: LayoutHeader,

    #[serde(default)]
    pub rows: Vec<RowToml>,

    /// Transform rules, tried in declaration order
    #[serde(default)]
    pub transforms: Vec<TransformToml>,
}

/// `[layout]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutHeader {
    pub name: String,

    #[serde(default)]
    pub always_render_altgr: bool,

    /// Accent glyphs that act as dead keys
    #[serde(default)]
    pub dead_keys: Vec<String>,
}

/// `[[rows]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowToml {
    #[serde(default = "default_weight")]
    pub height: u32,

    #[serde(default)]
    pub keys: Vec<KeyToml>,
}

/// `[[rows.keys]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyToml {
    pub name: String,

    pub kind: String,

    #[serde(default = "default_weight")]
    pub width: u32,

    /// Character key: default, shift, altgr, altgr+shift
    #[serde(default)]
    pub glyphs: Vec<String>,

    /// Character key shorthand: one letter, shift glyph derived
    pub letter: Option<String>,

    /// Compact key glyph
    pub text: Option<String>,

    /// Compact key long-press alternatives
    #[serde(default)]
    pub more: Vec<String>,

    /// Direction name -> glyph
    #[serde(default)]
    pub flicks: BTreeMap<String, String>,

    pub modifier: Option<String>,

    pub keyset: Option<String>,
}

/// `[[transforms]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformToml {
    pub from: String,
    pub to: String,
}

fn default_weight() -> u32 {
    1
}

/// `kind` values accepted in a layout file
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
enum KindTag {
    Character,
    Compact,
    Modifier,
    Backspace,
    Enter,
    Tab,
    Space,
    Switcher,
}

impl Layout {
    /// Parse a layout from a TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a layout from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_layout: LayoutToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        toml_layout.to_layout()
    }
}

impl LayoutToml {
    /// Convert parsed TOML to a compiled Layout
    pub fn to_layout(&self) -> Result<Layout, ConfigError> {
        let mut layout = Layout::new(self.layout.name.clone());
        layout.always_render_altgr = self.layout.always_render_altgr;

        let mut seen = HashSet::new();
        for row in &self.rows {
            layout.add_row(row.height);
            for entry in &row.keys {
                if !seen.insert(entry.name.as_str()) {
                    return Err(ConfigError::DuplicateKey(entry.name.clone()));
                }
                let kind = parse_kind(entry)?;
                let flicks = parse_flicks(entry)?;
                let key = layout.add_key(entry.name.clone(), kind, entry.width);
                key.config.flicks.extend(flicks);
            }
        }

        for rule in &self.transforms {
            layout.add_transform(rule.from.clone(), rule.to.clone());
        }
        for glyph in &self.layout.dead_keys {
            layout.add_dead_key(glyph.clone());
        }

        log::debug!(
            "parsed layout '{}': {} rows, {} keys, {} transforms",
            layout.name,
            layout.rows().len(),
            layout.len(),
            self.transforms.len()
        );
        Ok(layout)
    }
}

fn parse_kind(entry: &KeyToml) -> Result<KeyKind, ConfigError> {
    let tag = KindTag::from_str(entry.kind.trim())
        .map_err(|_| ConfigError::UnknownKey(format!("{} (key '{}')", entry.kind, entry.name)))?;

    let kind = match tag {
        KindTag::Character => KeyKind::Character {
            slot: parse_slot(entry)?,
        },
        KindTag::Compact => {
            let text = entry
                .text
                .clone()
                .or_else(|| entry.glyphs.first().cloned())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| missing(entry, "text"))?;
            KeyKind::Compact {
                text,
                more: entry.more.clone(),
            }
        }
        KindTag::Modifier => {
            let name = entry.modifier.as_deref().ok_or_else(|| missing(entry, "modifier"))?;
            let modifier = Modifier::from_alias(name)
                .ok_or_else(|| ConfigError::UnknownModifier(name.to_string()))?;
            KeyKind::Modifier { modifier }
        }
        KindTag::Backspace => KeyKind::Backspace,
        KindTag::Enter => KeyKind::Enter,
        KindTag::Tab => KeyKind::Tab,
        KindTag::Space => KeyKind::Space,
        KindTag::Switcher => KeyKind::Switcher {
            keyset: entry.keyset.clone().ok_or_else(|| missing(entry, "keyset"))?,
        },
    };
    Ok(kind)
}

/// Build a character slot from `letter` or `glyphs`
fn parse_slot(entry: &KeyToml) -> Result<CharacterSlot, ConfigError> {
    if let Some(letter) = &entry.letter {
        let mut chars = letter.chars();
        return match (chars.next(), chars.next(), entry.glyphs.is_empty()) {
            (Some(ch), None, true) => Ok(CharacterSlot::letter(ch)),
            (_, _, false) => Err(ConfigError::InvalidKeySlot(format!(
                "key '{}' sets both letter and glyphs",
                entry.name
            ))),
            _ => Err(ConfigError::InvalidKeySlot(format!(
                "key '{}': letter must be one character, got '{}'",
                entry.name, letter
            ))),
        };
    }

    match entry.glyphs.as_slice() {
        [] => Err(missing(entry, "glyphs")),
        glyphs if glyphs.len() > 4 => Err(ConfigError::InvalidKeySlot(format!(
            "key '{}' has {} glyphs (at most 4)",
            entry.name,
            glyphs.len()
        ))),
        [default, ..] if default.is_empty() => Err(ConfigError::InvalidKeySlot(format!(
            "key '{}' has no default glyph",
            entry.name
        ))),
        glyphs => Ok(CharacterSlot::new(glyphs.iter().cloned(), is_cased(&glyphs[0]))),
    }
}

/// Glyphs made of cased letters flip case under CAPSLOCK
fn is_cased(glyph: &str) -> bool {
    glyph
        .chars()
        .all(|c| c.is_alphabetic() && c.to_uppercase().ne(c.to_lowercase()))
}

fn parse_flicks(entry: &KeyToml) -> Result<Vec<(SwipeDirection, String)>, ConfigError> {
    entry
        .flicks
        .iter()
        .map(|(name, glyph)| {
            SwipeDirection::parse_direction(name)
                .map(|direction| (direction, glyph.clone()))
                .ok_or_else(|| {
                    ConfigError::InvalidKeySlot(format!(
                        "key '{}': unknown flick direction '{}'",
                        entry.name, name
                    ))
                })
        })
        .collect()
}

fn missing(entry: &KeyToml, field: &str) -> ConfigError {
    ConfigError::InvalidKeySlot(format!(
        "{} key '{}' needs '{}'",
        entry.kind, entry.name, field
    ))
}
