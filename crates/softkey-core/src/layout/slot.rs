// Softkey Character Slots
// Picks the glyph a character key shows and commits for a modifier state

use crate::ModifierState;

/// Position of a glyph within a [`CharacterSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotIndex {
    Default = 0,
    Shift = 1,
    AltGr = 2,
    AltGrShift = 3,
}

impl SlotIndex {
    pub const ALL: [SlotIndex; 4] = [
        SlotIndex::Default,
        SlotIndex::Shift,
        SlotIndex::AltGr,
        SlotIndex::AltGrShift,
    ];

    fn is_shifted(self) -> bool {
        matches!(self, SlotIndex::Shift | SlotIndex::AltGrShift)
    }

    fn is_altgr(self) -> bool {
        matches!(self, SlotIndex::AltGr | SlotIndex::AltGrShift)
    }
}

/// The four glyphs of a character key: default, shift, altgr, altgr+shift.
///
/// `is_letter` marks keys whose shift glyph is the case variant of the
/// default glyph; those keys only ever show one of the pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterSlot {
    glyphs: [Option<String>; 4],
    is_letter: bool,
}

/// Layout-wide flags the resolver needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotFlags {
    /// Keep altgr glyphs on screen as a reference even without ALTGR
    pub always_render_altgr: bool,
    /// The active keyset has at least one altgr glyph
    pub keyset_has_altgr: bool,
}

/// What one key should display and commit for the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    /// Slot whose glyph a commit would produce
    pub active: SlotIndex,
    /// Per-slot visibility, indexed by [`SlotIndex`]
    pub visible: [bool; 4],
    /// Per-slot highlight: only the active slot is highlighted
    pub highlighted: [bool; 4],
    /// Rendered text per slot (CAPSLOCK applied)
    pub text: [Option<String>; 4],
}

impl CharacterSlot {
    /// Build a slot from up to four glyphs; empty strings count as absent
    pub fn new<I, S>(glyphs: I, is_letter: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slot = Self {
            glyphs: Default::default(),
            is_letter,
        };
        for (i, glyph) in glyphs.into_iter().take(4).enumerate() {
            let glyph: String = glyph.into();
            if !glyph.is_empty() {
                slot.glyphs[i] = Some(glyph);
            }
        }
        slot
    }

    /// A letter key: lower-case default and its upper-case shift glyph
    pub fn letter(ch: char) -> Self {
        let lower: String = ch.to_lowercase().collect();
        let upper: String = ch.to_uppercase().collect();
        Self::new([lower, upper], true)
    }

    pub fn glyph(&self, index: SlotIndex) -> Option<&str> {
        self.glyphs[index as usize].as_deref()
    }

    pub fn is_letter(&self) -> bool {
        self.is_letter
    }

    /// Whether either altgr slot carries a glyph
    pub fn has_altgr(&self) -> bool {
        self.glyphs[2].is_some() || self.glyphs[3].is_some()
    }

    /// Slot a commit uses for `state`
    pub fn active_index(&self, state: ModifierState) -> SlotIndex {
        let altgr = state.contains(ModifierState::ALTGR);
        let shift = state.contains(ModifierState::SHIFT);
        if altgr && shift && self.glyphs[3].is_some() {
            SlotIndex::AltGrShift
        } else if altgr {
            SlotIndex::AltGr
        } else if shift {
            SlotIndex::Shift
        } else {
            SlotIndex::Default
        }
    }

    /// Glyph a commit produces for `state`.
    ///
    /// An empty active slot falls back to the shift or default glyph.
    /// CAPSLOCK reverses the case of letter keys.
    pub fn active_glyph(&self, state: ModifierState) -> Option<String> {
        let active = self.active_index(state);
        let glyph = self.glyph(active).or_else(|| {
            if state.contains(ModifierState::SHIFT) {
                self.glyph(SlotIndex::Shift)
                    .or_else(|| self.glyph(SlotIndex::Default))
            } else {
                self.glyph(SlotIndex::Default)
            }
        })?;
        if self.is_letter && state.contains(ModifierState::CAPSLOCK) {
            Some(reverse_case(glyph))
        } else {
            Some(glyph.to_string())
        }
    }

    /// Resolve visibility, highlight and rendered text for every slot
    pub fn resolve(&self, state: ModifierState, flags: SlotFlags) -> SlotView {
        let altgr = state.contains(ModifierState::ALTGR);
        let shift = state.contains(ModifierState::SHIFT);
        let capslock = state.contains(ModifierState::CAPSLOCK);
        let active = self.active_index(state);
        let pin_altgr = flags.always_render_altgr && flags.keyset_has_altgr;

        let mut visible = [false; 4];
        let mut highlighted = [false; 4];
        let mut text: [Option<String>; 4] = Default::default();
        for index in SlotIndex::ALL {
            let Some(glyph) = self.glyph(index) else {
                continue;
            };
            let cased = !self.is_letter || index.is_shifted() == shift;
            visible[index as usize] = if index.is_altgr() {
                pin_altgr || (altgr && cased)
            } else {
                !altgr && cased
            };
            highlighted[index as usize] = index == active;
            text[index as usize] = Some(if capslock {
                reverse_case(glyph)
            } else {
                glyph.to_string()
            });
        }

        SlotView {
            active,
            visible,
            highlighted,
            text,
        }
    }
}

/// Swap upper and lower case for every cased character
pub fn reverse_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_lowercase() {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
