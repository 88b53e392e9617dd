// Softkey End-to-End Test Scenarios
//
// Full typing sessions against the bundled latin layout: pointer events in,
// intents out, with the test playing the host's timer role.
//
// Run with: cargo test --test e2e_scenarios

#[cfg(feature = "config")]
mod e2e_tests {
    use pretty_assertions::assert_eq;

    use softkey_core::{
        Action, GestureInput, Intent, KeyCode, KeyId, Keyboard, KeyboardOptions, Layout, Modifier,
        ModifierState, PointerEvent, TimerQueue, Timestamp,
    };

    const LATIN: &str = include_str!("../../../layouts/latin.toml");

    // =========================================================================
    // Test Helpers
    // =========================================================================

    /// A keyboard session plus the host-side timer queue
    struct Session {
        keyboard: Keyboard,
        timers: TimerQueue,
        now: Timestamp,
    }

    impl Session {
        fn new() -> Self {
            Self::with_options(KeyboardOptions::default())
        }

        fn with_options(options: KeyboardOptions) -> Self {
            let layout = Layout::from_toml(LATIN).unwrap();
            let mut keyboard = Keyboard::new(layout, options);
            keyboard.resize(1000, 400);
            Self {
                keyboard,
                timers: TimerQueue::new(),
                now: 0,
            }
        }

        fn id(&self, name: &str) -> KeyId {
            self.keyboard.layout().key_by_name(name).unwrap().id
        }

        fn center(&self, name: &str) -> (f64, f64) {
            let key = self.keyboard.geometry().get(self.id(name)).unwrap();
            (key.center.x, key.center.y)
        }

        /// Advance the clock, firing due timers, then feed one input
        fn feed(&mut self, at: Timestamp, input: GestureInput) -> Vec<Intent> {
            let mut out = self.advance(at);
            let intents = self.keyboard.handle(input);
            self.track(&intents);
            out.extend(intents);
            out
        }

        fn advance(&mut self, to: Timestamp) -> Vec<Intent> {
            let mut out = Vec::new();
            while let Some((timer, at)) = self.timers.pop_due(to) {
                let intents = self.keyboard.tick(timer, at);
                self.track(&intents);
                out.extend(intents);
            }
            self.now = to;
            out
        }

        fn track(&mut self, intents: &[Intent]) {
            for intent in intents {
                match intent {
                    Intent::ScheduleTimer { timer, at } => self.timers.schedule(*timer, *at),
                    Intent::CancelTimer { timer } => self.timers.cancel(*timer),
                    _ => {}
                }
            }
        }

        fn down(&mut self, name: &str) -> Vec<Intent> {
            let (x, y) = self.center(name);
            let at = self.now + 1;
            self.feed(at, PointerEvent::down(self.id(name), x, y, at).into())
        }

        fn up_at(&mut self, name: &str, x: f64, y: f64, hold: Timestamp) -> Vec<Intent> {
            let at = self.now + hold;
            self.feed(at, PointerEvent::up(self.id(name), x, y, at).into())
        }

        fn up(&mut self, name: &str) -> Vec<Intent> {
            let (x, y) = self.center(name);
            self.up_at(name, x, y, 40)
        }

        /// Tap a key and leave a pause longer than the double-click window
        fn tap(&mut self, name: &str) -> Vec<Intent> {
            let mut out = self.down(name);
            out.extend(self.up(name));
            out.extend(self.advance(self.now + 600));
            out
        }

        fn type_keys(&mut self, names: &[&str]) -> Vec<Intent> {
            names.iter().flat_map(|name| self.tap(name)).collect()
        }
    }

    fn committed(intents: &[Intent]) -> String {
        intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::Commit { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn compositions(intents: &[Intent]) -> Vec<&str> {
        intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::SetComposition { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Scenario 1: plain typing and one-shot shift
    // =========================================================================

    #[test]
    fn test_type_word_with_one_shot_shift() {
        let mut session = Session::new();
        let out = session.type_keys(&["shift", "h", "e", "l", "l", "o"]);
        assert_eq!(committed(&out), "Hello");
        assert_eq!(session.keyboard.modifiers().state(), ModifierState::DEFAULT);
    }

    #[test]
    fn test_caps_lock_persists_until_toggled() {
        let mut session = Session::new();
        let out = session.type_keys(&["caps", "o", "k", "caps", "o", "k"]);
        assert_eq!(committed(&out), "OKok");
    }

    #[test]
    fn test_altgr_one_shot_symbol() {
        let mut session = Session::new();
        let out = session.type_keys(&["altgr", "e", "e"]);
        assert_eq!(committed(&out), "€e");
    }

    // =========================================================================
    // Scenario 2: composition
    // =========================================================================

    #[test]
    fn test_dead_acute_composes() {
        let mut session = Session::new();
        let out = session.type_keys(&["acute", "e", "acute", "shift", "a"]);
        assert_eq!(committed(&out), "éÁ");
        assert_eq!(compositions(&out), vec!["´", "", "´", ""]);
    }

    #[test]
    fn test_dead_key_then_space_commits_accent() {
        let mut session = Session::new();
        let out = session.type_keys(&["acute", "space"]);
        assert_eq!(committed(&out), "´");
    }

    #[test]
    fn test_guillemet_rule_waits_for_second_glyph() {
        let mut layout = Layout::from_toml(LATIN).unwrap();
        let lt = layout.add_key(
            "lt",
            softkey_core::KeyKind::Compact {
                text: "<".into(),
                more: Vec::new(),
            },
            1,
        );
        let lt = lt.id;
        let mut keyboard = Keyboard::new(layout, KeyboardOptions::default());

        let mut out = Vec::new();
        for (i, at) in [0u64, 1000].into_iter().enumerate() {
            out.extend(keyboard.handle(PointerEvent::down(lt, 0.0, 0.0, at).into()));
            let up = keyboard.handle(PointerEvent::up(lt, 0.0, 0.0, at + 30).into());
            if i == 0 {
                assert_eq!(committed(&up), "");
            }
            out.extend(up);
        }
        assert_eq!(committed(&out), "«");
    }

    #[test]
    fn test_backspace_edits_composition_first() {
        let mut session = Session::new();
        session.tap("acute");
        let out = session.tap("backspace");
        assert_eq!(compositions(&out), vec![""]);
        assert!(!out.iter().any(|i| matches!(i, Intent::KeyEvent { .. })));

        let out = session.tap("backspace");
        assert!(out.contains(&Intent::KeyEvent {
            code: KeyCode::Backspace,
            action: Action::Press,
        }));
    }

    #[test]
    fn test_enter_flushes_composition() {
        let mut session = Session::new();
        session.tap("acute");
        let out = session.tap("enter");
        assert_eq!(committed(&out), "´");
        let enter = out
            .iter()
            .position(|i| {
                *i == Intent::KeyEvent {
                    code: KeyCode::Enter,
                    action: Action::Press,
                }
            })
            .unwrap();
        let commit = out
            .iter()
            .position(|i| matches!(i, Intent::Commit { .. }))
            .unwrap();
        assert!(commit < enter);
    }

    #[test]
    fn test_switcher_flushes_and_switches() {
        let mut session = Session::new();
        session.tap("acute");
        let out = session.tap("symbols");
        assert_eq!(committed(&out), "´");
        assert!(out.contains(&Intent::SwitchKeyset {
            keyset: "symbols".into()
        }));
        assert_eq!(session.keyboard.composition(), "");
    }

    #[test]
    fn test_compose_disabled() {
        let mut session = Session::with_options(KeyboardOptions {
            compose: false,
            ..KeyboardOptions::default()
        });
        let out = session.type_keys(&["acute", "e"]);
        assert_eq!(committed(&out), "´e");
        assert!(compositions(&out).is_empty());
    }

    // =========================================================================
    // Scenario 3: gestures
    // =========================================================================

    #[test]
    fn test_long_press_alternatives_pick_by_offset() {
        let mut session = Session::new();
        let acute = session.id("acute");
        let out = session.down("acute");
        assert!(out.contains(&Intent::Highlight { key: acute, on: true }));

        let out = session.advance(session.now + 500);
        assert!(out.contains(&Intent::ShowAlternatives {
            key: acute,
            alternatives: vec!["¨".into(), "^".into(), "`".into()],
        }));

        // Third cell of the strip: the grave, which is not a dead key here
        // but starts the grave transform rules.
        let geometry = session.keyboard.geometry().get(acute).unwrap().clone();
        let x = geometry.top_left.x + geometry.width * 2.5;
        let out = session.up_at("acute", x, geometry.center.y, 100);
        assert_eq!(compositions(&out), vec!["`"]);

        let out = session.type_keys(&["a"]);
        assert_eq!(committed(&out), "à");
    }

    #[test]
    fn test_long_press_alternative_beyond_strip_clamps() {
        let mut session = Session::new();
        session.down("acute");
        session.advance(session.now + 500);
        let out = session.up_at("acute", -50.0, 0.0, 100);
        // Leftmost alternative, the diaeresis, is a dead key.
        assert_eq!(compositions(&out), vec!["¨"]);
        let out = session.type_keys(&["o"]);
        assert_eq!(committed(&out), "ö");
    }

    #[test]
    fn test_flick_up_types_digit() {
        let mut session = Session::new();
        let (x, y) = session.center("w");
        let w = session.id("w");
        session.feed(10, PointerEvent::down(w, x, y, 10).into());
        session.feed(30, PointerEvent::moved(w, x, y - 30.0, 30).into());
        let out = session.feed(50, PointerEvent::up(w, x, y - 30.0, 50).into());
        assert_eq!(committed(&out), "2");
    }

    #[test]
    fn test_swipe_highlights_keys_under_pointer() {
        let mut session = Session::new();
        let (x, y) = session.center("r");
        let (r, t) = (session.id("r"), session.id("t"));
        session.feed(10, PointerEvent::down(r, x, y, 10).into());
        let out = session.feed(
            30,
            PointerEvent::moved(r, x + 100.0, y, 30).with_over(Some(t)).into(),
        );
        assert!(out.contains(&Intent::Highlight { key: r, on: false }));
        assert!(out.contains(&Intent::Highlight { key: t, on: true }));
    }

    #[test]
    fn test_held_shift_chords_and_releases() {
        let mut session = Session::new();
        session.down("shift");
        let out = session.type_keys(&["o", "k"]);
        assert_eq!(committed(&out), "OK");

        // The long-press tick fired mid-chord; it must not lock shift.
        let out = session.up("shift");
        assert!(out.contains(&Intent::ChangeModifier {
            modifier: Modifier::Shift,
            enabled: false,
            sticky: false,
        }));
        let out = session.type_keys(&["o"]);
        assert_eq!(committed(&out), "o");
    }

    #[test]
    fn test_backspace_auto_repeat() {
        let mut session = Session::new();
        session.down("backspace");
        let out = session.advance(session.now + 460);
        let repeats = out
            .iter()
            .filter(|i| {
                **i == Intent::KeyEvent {
                    code: KeyCode::Backspace,
                    action: Action::Repeat,
                }
            })
            .count();
        // 300ms delay, then every 75ms: 301, 376, 451
        assert_eq!(repeats, 3);
        session.up("backspace");
        assert!(session.timers.is_empty());
    }

    #[test]
    fn test_blur_drops_state() {
        let mut session = Session::new();
        session.tap("acute");
        session.tap("shift");
        session.down("acute");
        let out = session.keyboard.blur();
        session.track(&out);
        assert!(session.timers.is_empty());
        assert!(out.contains(&Intent::ChangeModifier {
            modifier: Modifier::Shift,
            enabled: false,
            sticky: false,
        }));
        assert_eq!(compositions(&out), vec![""]);
        assert_eq!(session.keyboard.modifiers().state(), ModifierState::DEFAULT);
    }

    // =========================================================================
    // Scenario 4: geometry and rendering
    // =========================================================================

    #[test]
    fn test_nearby_keys_after_resize() {
        let session = Session::new();
        let near = session.keyboard.nearby_keys(session.id("q"));
        for name in ["w", "a", "s"] {
            assert!(near.contains(&session.id(name)), "{} should be near q", name);
        }
        assert!(!near.contains(&session.id("e")));
        assert!(!near.contains(&session.id("shift")));
    }

    #[test]
    fn test_slot_view_follows_modifiers() {
        let mut session = Session::new();
        let e = session.id("e");
        let view = session.keyboard.slot_view(e).unwrap();
        assert_eq!(view.visible, [true, false, false, false]);

        session.tap("caps");
        let view = session.keyboard.slot_view(e).unwrap();
        assert_eq!(view.text[0].as_deref(), Some("E"));
        assert_eq!(view.visible, [true, false, false, false]);
    }

    #[test]
    fn test_switch_layout_keeps_modifiers() {
        let mut session = Session::new();
        session.tap("acute");
        session.tap("caps");
        let mut next = Layout::new("tiny");
        next.add_key(
            "x",
            softkey_core::KeyKind::Character {
                slot: softkey_core::CharacterSlot::letter('x'),
            },
            1,
        );
        let out = session.keyboard.switch_layout(next);
        assert_eq!(committed(&out), "´");
        assert!(session.keyboard.modifiers().has_state(ModifierState::CAPSLOCK));
        assert_eq!(session.keyboard.layout().name, "tiny");
        assert_eq!(session.keyboard.nearby_keys(KeyId(1)), &[] as &[KeyId]);
    }
}
