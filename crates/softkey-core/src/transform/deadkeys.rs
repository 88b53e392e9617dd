// Softkey Dead Keys
// Accent glyphs that wait for the next glyph and merge with it

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadKeyKind {
    Acute,
    Grave,
    Tilde,
    Umlaut,
    Circumflex,
    Cedilla,
    Caron,
    Ring,
    Macron,
}

impl DeadKeyKind {
    /// Spacing accent (as printed on a key) for this kind
    pub fn from_spacing(ch: char) -> Option<Self> {
        match ch {
            '\u{00B4}' | '\'' => Some(Self::Acute),
            '`' => Some(Self::Grave),
            '~' | '\u{02DC}' => Some(Self::Tilde),
            '\u{00A8}' | '"' => Some(Self::Umlaut),
            '^' | '\u{02C6}' => Some(Self::Circumflex),
            '\u{00B8}' => Some(Self::Cedilla),
            '\u{02C7}' => Some(Self::Caron),
            '\u{02DA}' => Some(Self::Ring),
            '\u{00AF}' => Some(Self::Macron),
            _ => None,
        }
    }

    pub fn combining_mark(self) -> char {
        match self {
            Self::Acute => '\u{0301}',
            Self::Grave => '\u{0300}',
            Self::Tilde => '\u{0303}',
            Self::Umlaut => '\u{0308}',
            Self::Circumflex => '\u{0302}',
            Self::Cedilla => '\u{0327}',
            Self::Caron => '\u{030C}',
            Self::Ring => '\u{030A}',
            Self::Macron => '\u{0304}',
        }
    }

    /// Standalone accent committed for dead key + space
    pub fn display_char(self) -> char {
        match self {
            Self::Acute => '\u{00B4}',
            Self::Grave => '`',
            Self::Tilde => '~',
            Self::Umlaut => '\u{00A8}',
            Self::Circumflex => '^',
            Self::Cedilla => '\u{00B8}',
            Self::Caron => '\u{02C7}',
            Self::Ring => '\u{02DA}',
            Self::Macron => '\u{00AF}',
        }
    }
}

/// A glyph held back until the next keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeadKey {
    /// The glyph as typed, flushed verbatim when nothing merges
    pub glyph: String,
    pub mark: char,
}

/// Dead glyphs a layout declares.
///
/// Combining marks (U+0300..U+036F) are always dead; spacing accents only
/// when the layout lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadKeyTable {
    declared: HashSet<String>,
}

impl DeadKeyTable {
    pub fn new<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared = HashSet::new();
        for glyph in glyphs {
            let glyph: String = glyph.into();
            if single_char(&glyph).is_some_and(|ch| {
                is_combining_mark(ch) || DeadKeyKind::from_spacing(ch).is_some()
            }) {
                declared.insert(glyph);
            } else {
                log::warn!("'{}' is not an accent, ignored as dead key", glyph);
            }
        }
        Self { declared }
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Check whether a glyph starts a dead-key sequence
    pub fn lookup(&self, glyph: &str) -> Option<PendingDeadKey> {
        let ch = single_char(glyph)?;
        let mark = if is_combining_mark(ch) {
            ch
        } else if self.declared.contains(glyph) {
            DeadKeyKind::from_spacing(ch)?.combining_mark()
        } else {
            return None;
        };
        Some(PendingDeadKey {
            glyph: glyph.to_string(),
            mark,
        })
    }
}

impl PendingDeadKey {
    /// Merge with the next glyph; `None` when no precomposed form exists
    pub fn try_compose(&self, base: &str) -> Option<String> {
        let base = single_char(base)?;
        let composed: String = [base, self.mark].into_iter().nfc().collect();
        single_char(&composed).map(String::from)
    }

    /// What dead key + space commits
    pub fn standalone(&self) -> String {
        let spacing = single_char(&self.glyph)
            .and_then(DeadKeyKind::from_spacing)
            .or_else(|| {
                ALL_KINDS
                    .iter()
                    .copied()
                    .find(|kind| kind.combining_mark() == self.mark)
            });
        match spacing {
            Some(kind) => kind.display_char().to_string(),
            None => self.glyph.clone(),
        }
    }
}

const ALL_KINDS: [DeadKeyKind; 9] = [
    DeadKeyKind::Acute,
    DeadKeyKind::Grave,
    DeadKeyKind::Tilde,
    DeadKeyKind::Umlaut,
    DeadKeyKind::Circumflex,
    DeadKeyKind::Cedilla,
    DeadKeyKind::Caron,
    DeadKeyKind::Ring,
    DeadKeyKind::Macron,
];

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}
