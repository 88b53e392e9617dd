// Softkey Keyboard Session
// Routes classified gestures by key kind into modifier state and composition
//
// The keyboard owns every piece of mutable state of one session: modifier
// state, per-key gesture machines, the compose engine and the current
// geometry. Each call returns the intents the host has to carry out.

use strum::IntoEnumIterator;

use crate::input::{
    GestureConfig, GestureInput, GestureIntent, PointerHandler, TimerId, Timestamp,
};
use crate::intent::Intent;
use crate::layout::{KeyboardGeometry, Layout, SlotFlags, SlotView};
use crate::state::StateManager;
use crate::transform::{ComposeEngine, ComposeOutcome};
use crate::{Action, KeyCode, KeyId, KeyKind, Modifier, ModifierState};

/// Session-wide behavior switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardOptions {
    pub gesture: GestureConfig,
    /// Run typed glyphs through dead keys and transform rules
    pub compose: bool,
}

impl Default for KeyboardOptions {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            compose: true,
        }
    }
}

/// One on-screen keyboard session
#[derive(Debug, Clone)]
pub struct Keyboard {
    layout: Layout,
    options: KeyboardOptions,
    state: StateManager,
    pointers: PointerHandler,
    compose: ComposeEngine,
    geometry: KeyboardGeometry,
    /// Composition last reported to the host
    shown_composition: String,
}

impl Keyboard {
    pub fn new(layout: Layout, options: KeyboardOptions) -> Self {
        let mut keyboard = Self {
            compose: ComposeEngine::new(layout.transform_table(), layout.dead_key_table()),
            pointers: PointerHandler::new(options.gesture),
            layout,
            options,
            state: StateManager::new(),
            geometry: KeyboardGeometry::default(),
            shown_composition: String::new(),
        };
        keyboard.register_keys();
        log::debug!(
            "keyboard ready with layout '{}' ({} keys)",
            keyboard.layout.name,
            keyboard.layout.len()
        );
        keyboard
    }

    fn register_keys(&mut self) {
        for key in self.layout.keys() {
            self.pointers.register(key.id, key.config.clone());
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn options(&self) -> KeyboardOptions {
        self.options
    }

    pub fn modifiers(&self) -> &StateManager {
        &self.state
    }

    pub fn geometry(&self) -> &KeyboardGeometry {
        &self.geometry
    }

    /// Pending composition, dead glyph included
    pub fn composition(&self) -> String {
        self.compose.composition()
    }

    /// Recompute key geometry and the nearby-key index for a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.geometry = KeyboardGeometry::compute(&self.layout.row_specs(), width, height);
    }

    /// Fat-finger candidates for a key at the current size
    pub fn nearby_keys(&self, id: KeyId) -> &[KeyId] {
        self.geometry.nearby_keys(id)
    }

    /// What a character key displays for the current modifier state
    pub fn slot_view(&self, id: KeyId) -> Option<SlotView> {
        let flags = SlotFlags {
            always_render_altgr: self.layout.always_render_altgr,
            keyset_has_altgr: self.layout.has_altgr_key(),
        };
        match &self.layout.key(id)?.kind {
            KeyKind::Character { slot } => Some(slot.resolve(self.state.state(), flags)),
            _ => None,
        }
    }

    /// Feed one pointer event or timer tick
    pub fn handle(&mut self, input: GestureInput) -> Vec<Intent> {
        let mut out = Vec::new();
        for gesture in self.pointers.handle(&input) {
            self.dispatch(gesture, &mut out);
        }
        out
    }

    /// Feed a timer that came due
    pub fn tick(&mut self, timer: TimerId, now: Timestamp) -> Vec<Intent> {
        self.handle(GestureInput::Tick { timer, now })
    }

    /// Focus loss: drop modifiers, gestures and composition
    pub fn blur(&mut self) -> Vec<Intent> {
        let mut out = Vec::new();
        for gesture in self.pointers.cancel_all() {
            self.dispatch(gesture, &mut out);
        }
        for modifier in self.state.state().modifiers() {
            out.push(Intent::ChangeModifier {
                modifier,
                enabled: false,
                sticky: false,
            });
        }
        self.state.reset();
        self.compose.reset();
        self.sync_composition(&mut out);
        log::debug!("keyboard blurred");
        out
    }

    /// The host's text context changed; pending text is abandoned
    pub fn reset_context(&mut self) -> Vec<Intent> {
        let mut out = Vec::new();
        self.compose.reset();
        self.sync_composition(&mut out);
        out
    }

    /// Load another layout, keeping modifier state and size
    pub fn switch_layout(&mut self, layout: Layout) -> Vec<Intent> {
        let mut out = Vec::new();
        for gesture in self.pointers.cancel_all() {
            self.dispatch(gesture, &mut out);
        }
        // Held modifier keys never see their pointer-up on the new layout.
        for modifier in Modifier::iter() {
            if self.state.is_key_down(modifier.state()) {
                self.on_modifier_up(modifier, &mut out);
                self.on_modifier_release(modifier, &mut out);
            }
        }
        let pending = self.compose.flush();
        self.push_outcome(pending, &mut out);

        log::debug!("switching layout '{}' -> '{}'", self.layout.name, layout.name);
        self.compose = ComposeEngine::new(layout.transform_table(), layout.dead_key_table());
        self.pointers = PointerHandler::new(self.options.gesture);
        self.layout = layout;
        self.register_keys();
        let (width, height) = (self.geometry.width(), self.geometry.height());
        if !self.geometry.is_empty() {
            self.resize(width, height);
        }
        out
    }

    fn dispatch(&mut self, gesture: GestureIntent, out: &mut Vec<Intent>) {
        match gesture {
            GestureIntent::ScheduleTimer { timer, at } => {
                out.push(Intent::ScheduleTimer { timer, at })
            }
            GestureIntent::CancelTimer { timer } => out.push(Intent::CancelTimer { timer }),
            GestureIntent::PointerDown { target } => self.on_pointer_down(target, out),
            GestureIntent::PointerUp {
                target,
                x,
                flicked,
                long_pressed,
                cancelled,
                ..
            } => {
                if cancelled {
                    self.on_cancel(target, out);
                } else {
                    self.on_pointer_up(target, x, flicked, long_pressed, out);
                }
            }
            GestureIntent::DoubleClick { target } => self.on_double_click(target, out),
            GestureIntent::LongPress { target, .. } => self.on_long_press(target, out),
            GestureIntent::LongPressEnd { target } => {
                if let Some(KeyKind::Modifier { modifier }) = self.kind_of(target) {
                    self.on_modifier_release(modifier, out);
                }
                out.push(Intent::Highlight {
                    key: target,
                    on: false,
                });
            }
            GestureIntent::Repeat { target } => {
                if matches!(self.kind_of(target), Some(KeyKind::Backspace)) {
                    self.backspace(Action::Repeat, out);
                }
            }
            GestureIntent::Swipe { target, direction } => {
                log::trace!("swipe {:?} on {}", direction, target);
            }
            GestureIntent::PointerOver { element, .. } => out.push(Intent::Highlight {
                key: element,
                on: true,
            }),
            GestureIntent::PointerOut { element, .. } => out.push(Intent::Highlight {
                key: element,
                on: false,
            }),
        }
    }

    fn kind_of(&self, id: KeyId) -> Option<KeyKind> {
        self.layout.key(id).map(|k| k.kind.clone())
    }

    fn on_pointer_down(&mut self, target: KeyId, out: &mut Vec<Intent>) {
        out.push(Intent::Highlight {
            key: target,
            on: true,
        });
        match self.kind_of(target) {
            Some(KeyKind::Modifier { modifier }) => {
                let bit = modifier.state();
                let enabled = !self.state.has_state(bit);
                self.state.set_state(bit, enabled);
                self.state.set_sticky(bit, enabled);
                self.state.set_key_down(bit, true);
                out.push(Intent::ChangeModifier {
                    modifier,
                    enabled,
                    sticky: enabled,
                });
            }
            Some(KeyKind::Backspace) => self.backspace(Action::Press, out),
            _ => {}
        }
    }

    fn on_pointer_up(
        &mut self,
        target: KeyId,
        x: f64,
        flicked: Option<String>,
        long_pressed: bool,
        out: &mut Vec<Intent>,
    ) {
        let Some(kind) = self.kind_of(target) else {
            return;
        };
        match kind {
            KeyKind::Modifier { modifier } => self.on_modifier_up(modifier, out),
            KeyKind::Character { slot } => {
                let glyph = flicked.or_else(|| slot.active_glyph(self.state.state()));
                match glyph {
                    Some(glyph) => self.type_glyph(&glyph, out),
                    None => log::debug!("{} has no glyph for {:?}", target, self.state.state()),
                }
            }
            KeyKind::Compact { text, more } => {
                let glyph = if long_pressed && !more.is_empty() {
                    self.pick_alternative(target, x, &more)
                } else {
                    flicked.unwrap_or_else(|| self.apply_case(&text))
                };
                self.type_glyph(&glyph, out);
            }
            KeyKind::Space => {
                let outcome = if self.options.compose {
                    self.compose.space()
                } else {
                    ComposeOutcome {
                        commit: " ".to_string(),
                        composition: String::new(),
                    }
                };
                self.push_outcome(outcome, out);
                self.release_unsticky(out);
            }
            KeyKind::Enter => self.send_key(KeyCode::Enter, out),
            KeyKind::Tab => self.send_key(KeyCode::Tab, out),
            KeyKind::Switcher { keyset } => {
                let pending = self.compose.flush();
                self.push_outcome(pending, out);
                out.push(Intent::SwitchKeyset { keyset });
            }
            KeyKind::Backspace => {}
        }
    }

    /// A cancelled gesture commits nothing, but held modifiers still release
    fn on_cancel(&mut self, target: KeyId, out: &mut Vec<Intent>) {
        if let Some(KeyKind::Modifier { modifier }) = self.kind_of(target) {
            self.on_modifier_up(modifier, out);
        }
    }

    /// Tap release; a chorded modifier is left to `on_modifier_release`
    fn on_modifier_up(&mut self, modifier: Modifier, out: &mut Vec<Intent>) {
        let bit = modifier.state();
        if self.state.is_chording(bit) || modifier.is_lock() || !self.state.has_state(bit) {
            return;
        }
        // One-shot: cleared by the next committed keystroke.
        self.state.set_sticky(bit, false);
        out.push(Intent::ChangeModifier {
            modifier,
            enabled: true,
            sticky: false,
        });
    }

    /// The key left the screen, whether or not a pointer-up was reported
    fn on_modifier_release(&mut self, modifier: Modifier, out: &mut Vec<Intent>) {
        let bit = modifier.state();
        let chorded = self.state.is_chording(bit);
        self.state.set_key_down(bit, false);
        if chorded {
            log::debug!("chord on {} released", modifier);
            self.state.set_state(bit, false);
            self.state.set_sticky(bit, false);
            out.push(Intent::ChangeModifier {
                modifier,
                enabled: false,
                sticky: false,
            });
        }
    }

    fn on_double_click(&mut self, target: KeyId, out: &mut Vec<Intent>) {
        match self.kind_of(target) {
            Some(KeyKind::Modifier { modifier }) => self.lock(modifier, out),
            _ => log::trace!("double-click on {} ignored", target),
        }
    }

    fn on_long_press(&mut self, target: KeyId, out: &mut Vec<Intent>) {
        match self.kind_of(target) {
            Some(KeyKind::Modifier { modifier }) => {
                if !self.state.is_chording(modifier.state()) {
                    self.lock(modifier, out);
                }
            }
            Some(KeyKind::Compact { more, .. }) if !more.is_empty() => {
                out.push(Intent::ShowAlternatives {
                    key: target,
                    alternatives: more,
                });
            }
            _ => {}
        }
    }

    fn lock(&mut self, modifier: Modifier, out: &mut Vec<Intent>) {
        let bit = modifier.state();
        self.state.set_state(bit, true);
        self.state.set_sticky(bit, true);
        out.push(Intent::ChangeModifier {
            modifier,
            enabled: true,
            sticky: true,
        });
    }

    /// Alternatives open in a strip starting at the key's left edge, one
    /// key width per cell
    fn pick_alternative(&self, target: KeyId, x: f64, more: &[String]) -> String {
        let index = match self.geometry.get(target) {
            Some(key) if key.width > 0.0 => {
                let offset = ((x - key.top_left.x) / key.width).floor();
                offset.clamp(0.0, (more.len() - 1) as f64) as usize
            }
            _ => 0,
        };
        self.apply_case(&more[index])
    }

    fn apply_case(&self, text: &str) -> String {
        let shift = self.state.has_state(ModifierState::SHIFT);
        let caps = self.state.has_state(ModifierState::CAPSLOCK);
        if shift != caps {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }

    fn type_glyph(&mut self, glyph: &str, out: &mut Vec<Intent>) {
        if self
            .state
            .has_state(ModifierState::CTRL | ModifierState::ALT)
        {
            return self.send_key(KeyCode::Char(glyph.to_string()), out);
        }
        if self.options.compose {
            let outcome = self.compose.process(glyph);
            self.push_outcome(outcome, out);
        } else {
            out.push(Intent::Commit {
                text: glyph.to_string(),
            });
        }
        self.release_unsticky(out);
    }

    /// Commit pending text, then send a raw key press
    fn send_key(&mut self, code: KeyCode, out: &mut Vec<Intent>) {
        let pending = self.compose.flush();
        self.push_outcome(pending, out);
        out.push(Intent::KeyEvent {
            code,
            action: Action::Press,
        });
        self.release_unsticky(out);
    }

    fn release_unsticky(&mut self, out: &mut Vec<Intent>) {
        self.state.trigger_chording();
        let released = self.state.clear_unsticky_state();
        for modifier in released.modifiers() {
            log::debug!("one-shot {} released", modifier);
            out.push(Intent::ChangeModifier {
                modifier,
                enabled: false,
                sticky: false,
            });
        }
    }

    fn backspace(&mut self, action: Action, out: &mut Vec<Intent>) {
        let outcome = if self.options.compose {
            self.compose.backspace()
        } else {
            None
        };
        match outcome {
            Some(outcome) => self.push_outcome(outcome, out),
            None => out.push(Intent::KeyEvent {
                code: KeyCode::Backspace,
                action,
            }),
        }
    }

    fn push_outcome(&mut self, outcome: ComposeOutcome, out: &mut Vec<Intent>) {
        if !outcome.commit.is_empty() {
            out.push(Intent::Commit {
                text: outcome.commit,
            });
        }
        self.sync_composition(out);
    }

    fn sync_composition(&mut self, out: &mut Vec<Intent>) {
        let current = self.compose.composition();
        if current != self.shown_composition {
            out.push(Intent::SetComposition {
                text: current.clone(),
            });
            self.shown_composition = current;
        }
    }
}
