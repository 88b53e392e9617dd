// Softkey Gesture Disambiguator
// Classifies one key's pointer sequence into tap, long-press, double-click or swipe
//
// Every transition is a plain method call on an owned value. Timers are not
// run here: arming one emits `ScheduleTimer`, and the host feeds the timer
// back as a `Tick` input carrying the same id. Ticks whose id is no longer
// armed are ignored.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::input::{GestureInput, PointerEvent, PointerEventKind, TimerId, TimerKind, Timestamp};
use crate::KeyId;

bitflags! {
    /// Swipe directions (screen coordinates: y grows downward)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SwipeDirection: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl SwipeDirection {
    /// Parse a single direction name
    pub fn parse_direction(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::UP),
            "down" => Some(Self::DOWN),
            "left" => Some(Self::LEFT),
            "right" => Some(Self::RIGHT),
            _ => None,
        }
    }
}

/// Timing and distance thresholds shared by every target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Hold time before a long-press fires (default: 500ms)
    pub long_press_ms: u64,
    /// Maximum gap between two pointer-downs for a double-click (default: 500ms)
    pub double_click_ms: u64,
    /// Offset on one axis that counts as a swipe (default: 20px)
    pub swipe_threshold: f64,
    /// Delay before the first auto-repeat (default: 300ms)
    pub repeat_delay_ms: u64,
    /// Interval between auto-repeats (default: 75ms)
    pub repeat_interval_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            double_click_ms: 500,
            swipe_threshold: 20.0,
            repeat_delay_ms: 300,
            repeat_interval_ms: 75,
        }
    }
}

/// Static gesture behavior of one key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetConfig {
    pub double_click: bool,
    /// Long-press opens something that is finished by the pointer-up
    pub long_press_with_pointer_up: bool,
    /// Long-press applies its effect immediately; the pointer-up is swallowed
    pub long_press_without_pointer_up: bool,
    /// Auto-repeat while held
    pub repeat: bool,
    /// Alternate glyphs selected by a short swipe in a direction
    pub flicks: SmallVec<[(SwipeDirection, String); 4]>,
}

impl TargetConfig {
    pub fn supports_long_press(&self) -> bool {
        self.long_press_with_pointer_up || self.long_press_without_pointer_up
    }

    /// Directions that select a flick glyph
    pub fn flicker_directions(&self) -> SwipeDirection {
        self.flicks
            .iter()
            .fold(SwipeDirection::empty(), |acc, (dir, _)| acc | *dir)
    }

    pub fn flick_glyph(&self, direction: SwipeDirection) -> Option<&str> {
        self.flicks
            .iter()
            .find(|(dir, _)| *dir == direction)
            .map(|(_, glyph)| glyph.as_str())
    }
}

/// Classified outcome of a pointer sequence on one key
#[derive(Debug, Clone, PartialEq)]
pub enum GestureIntent {
    PointerDown {
        target: KeyId,
    },
    /// The gesture ended with a tap-like release.
    ///
    /// `flicked` carries the flick glyph chosen during the gesture.
    PointerUp {
        target: KeyId,
        x: f64,
        y: f64,
        flicked: Option<String>,
        long_pressed: bool,
        cancelled: bool,
    },
    DoubleClick {
        target: KeyId,
    },
    /// `applied` is true when the long-press effect needs no pointer-up
    LongPress {
        target: KeyId,
        applied: bool,
    },
    /// Clears transient highlighting; sent at the end of every gesture
    LongPressEnd {
        target: KeyId,
    },
    Swipe {
        target: KeyId,
        direction: SwipeDirection,
    },
    PointerOver {
        target: KeyId,
        element: KeyId,
    },
    PointerOut {
        target: KeyId,
        element: KeyId,
    },
    Repeat {
        target: KeyId,
    },
    ScheduleTimer {
        timer: TimerId,
        at: Timestamp,
    },
    CancelTimer {
        timer: TimerId,
    },
}

pub type GestureIntents = SmallVec<[GestureIntent; 4]>;

/// Where a gesture currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Down,
    LongPressed,
    Flickering {
        direction: SwipeDirection,
        glyph: String,
    },
    DoubleClickArmed,
}

/// Per-gesture data, reset when the gesture ends
#[derive(Debug, Clone, Default)]
struct GestureState {
    down_at: Timestamp,
    last_x: f64,
    last_y: f64,
    offset_x: f64,
    offset_y: f64,
    swiped: bool,
    hovered: Option<KeyId>,
    long_press_timer: Option<TimerId>,
    repeat_timer: Option<TimerId>,
}

/// Gesture state machine for one key
#[derive(Debug, Clone)]
pub struct GestureDisambiguator {
    target: KeyId,
    config: TargetConfig,
    timing: GestureConfig,
    phase: Phase,
    gesture: GestureState,
    /// Pointer-down time of the previous gesture, for double-click
    last_down_at: Option<Timestamp>,
    next_token: u64,
}

impl GestureDisambiguator {
    pub fn new(target: KeyId, config: TargetConfig, timing: GestureConfig) -> Self {
        Self {
            target,
            config,
            timing,
            phase: Phase::Idle,
            gesture: GestureState::default(),
            last_down_at: None,
            next_token: 0,
        }
    }

    pub fn target(&self) -> KeyId {
        self.target
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Check if a gesture is in progress
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Advance the state machine by one input
    pub fn handle(&mut self, input: &GestureInput) -> GestureIntents {
        let mut out = GestureIntents::new();
        match input {
            GestureInput::Pointer(event) => match event.kind {
                PointerEventKind::Down => self.on_down(event, &mut out),
                PointerEventKind::Move => self.on_move(event, &mut out),
                PointerEventKind::Up => self.on_up(event, false, &mut out),
                PointerEventKind::Cancel => self.on_up(event, true, &mut out),
            },
            GestureInput::Tick { timer, now } => self.on_tick(*timer, *now, &mut out),
        }
        out
    }

    /// Abandon any gesture without emitting a release (target disposed)
    pub fn dispose(&mut self) -> GestureIntents {
        let mut out = GestureIntents::new();
        self.cancel_timers(&mut out);
        self.end_gesture();
        out
    }

    fn on_down(&mut self, event: &PointerEvent, out: &mut GestureIntents) {
        if self.is_active() {
            log::debug!("{:?}: new pointer-down supersedes running gesture", self.target);
            self.cancel_timers(out);
            self.end_gesture();
        }

        let now = event.timestamp;
        self.gesture = GestureState {
            down_at: now,
            last_x: event.x,
            last_y: event.y,
            hovered: event.over,
            ..GestureState::default()
        };

        let is_double = self.config.double_click
            && self
                .last_down_at
                .is_some_and(|prev| now >= prev && now - prev < self.timing.double_click_ms);
        if is_double {
            // A third tap starts a fresh sequence instead of another double-click.
            self.last_down_at = None;
            self.phase = Phase::DoubleClickArmed;
            out.push(GestureIntent::DoubleClick {
                target: self.target,
            });
            return;
        }

        self.last_down_at = Some(now);
        self.phase = Phase::Down;
        out.push(GestureIntent::PointerDown {
            target: self.target,
        });

        if self.config.supports_long_press() {
            let timer = self.arm(TimerKind::LongPress, now + self.timing.long_press_ms, out);
            self.gesture.long_press_timer = Some(timer);
        }
        if self.config.repeat {
            let timer = self.arm(TimerKind::Repeat, now + self.timing.repeat_delay_ms, out);
            self.gesture.repeat_timer = Some(timer);
        }
    }

    fn on_tick(&mut self, timer: TimerId, now: Timestamp, out: &mut GestureIntents) {
        match timer.kind {
            TimerKind::LongPress => {
                if self.gesture.long_press_timer != Some(timer) {
                    log::trace!("{:?}: stale long-press tick ignored", self.target);
                    return;
                }
                self.gesture.long_press_timer = None;
                if self.phase == Phase::Down {
                    self.phase = Phase::LongPressed;
                    out.push(GestureIntent::LongPress {
                        target: self.target,
                        applied: self.config.long_press_without_pointer_up,
                    });
                }
            }
            TimerKind::Repeat => {
                if self.gesture.repeat_timer != Some(timer) {
                    log::trace!("{:?}: stale repeat tick ignored", self.target);
                    return;
                }
                out.push(GestureIntent::Repeat {
                    target: self.target,
                });
                let next = self.arm(TimerKind::Repeat, now + self.timing.repeat_interval_ms, out);
                self.gesture.repeat_timer = Some(next);
            }
        }
    }

    fn on_move(&mut self, event: &PointerEvent, out: &mut GestureIntents) {
        if !self.is_active() {
            return;
        }

        let state = &mut self.gesture;
        state.offset_x += event.x - state.last_x;
        state.offset_y += event.y - state.last_y;
        state.last_x = event.x;
        state.last_y = event.y;

        let threshold = self.timing.swipe_threshold;
        if state.offset_x.abs() > threshold || state.offset_y.abs() > threshold {
            let direction = if state.offset_y.abs() > state.offset_x.abs() {
                let dir = if state.offset_y < 0.0 {
                    SwipeDirection::UP
                } else {
                    SwipeDirection::DOWN
                };
                state.offset_y = 0.0;
                dir
            } else {
                let dir = if state.offset_x < 0.0 {
                    SwipeDirection::LEFT
                } else {
                    SwipeDirection::RIGHT
                };
                state.offset_x = 0.0;
                dir
            };
            state.swiped = true;

            if let Some(timer) = self.gesture.long_press_timer.take() {
                out.push(GestureIntent::CancelTimer { timer });
            }
            if let Some(timer) = self.gesture.repeat_timer.take() {
                out.push(GestureIntent::CancelTimer { timer });
            }
            out.push(GestureIntent::Swipe {
                target: self.target,
                direction,
            });

            let can_flick = matches!(self.phase, Phase::Down | Phase::Flickering { .. });
            if can_flick {
                if let Some(glyph) = self.config.flick_glyph(direction) {
                    log::trace!("{:?}: flick {:?} -> {}", self.target, direction, glyph);
                    self.phase = Phase::Flickering {
                        direction,
                        glyph: glyph.to_string(),
                    };
                }
            }
        }

        if self.gesture.swiped && event.over != self.gesture.hovered {
            if let Some(element) = self.gesture.hovered {
                out.push(GestureIntent::PointerOut {
                    target: self.target,
                    element,
                });
            }
            if let Some(element) = event.over {
                out.push(GestureIntent::PointerOver {
                    target: self.target,
                    element,
                });
            }
            self.gesture.hovered = event.over;
        }
    }

    fn on_up(&mut self, event: &PointerEvent, cancelled: bool, out: &mut GestureIntents) {
        if !self.is_active() {
            log::trace!("{:?}: pointer-up without pointer-down ignored", self.target);
            return;
        }

        self.cancel_timers(out);

        let suppressed = match self.phase {
            Phase::DoubleClickArmed => true,
            Phase::LongPressed => self.config.long_press_without_pointer_up,
            _ => false,
        };
        if !suppressed {
            let flicked = match &self.phase {
                Phase::Flickering { glyph, .. } => Some(glyph.clone()),
                _ => None,
            };
            out.push(GestureIntent::PointerUp {
                target: self.target,
                x: event.x,
                y: event.y,
                flicked,
                long_pressed: self.phase == Phase::LongPressed,
                cancelled,
            });
        }
        out.push(GestureIntent::LongPressEnd {
            target: self.target,
        });

        self.end_gesture();
    }

    fn arm(&mut self, kind: TimerKind, at: Timestamp, out: &mut GestureIntents) -> TimerId {
        self.next_token += 1;
        let timer = TimerId {
            target: self.target,
            kind,
            token: self.next_token,
        };
        out.push(GestureIntent::ScheduleTimer { timer, at });
        timer
    }

    fn cancel_timers(&mut self, out: &mut GestureIntents) {
        if let Some(timer) = self.gesture.long_press_timer.take() {
            out.push(GestureIntent::CancelTimer { timer });
        }
        if let Some(timer) = self.gesture.repeat_timer.take() {
            out.push(GestureIntent::CancelTimer { timer });
        }
    }

    fn end_gesture(&mut self) {
        self.phase = Phase::Idle;
        self.gesture = GestureState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: KeyId = KeyId(7);

    fn tap_only() -> GestureDisambiguator {
        GestureDisambiguator::new(KEY, TargetConfig::default(), GestureConfig::default())
    }

    fn with_config(config: TargetConfig) -> GestureDisambiguator {
        GestureDisambiguator::new(KEY, config, GestureConfig::default())
    }

    fn pointer(g: &mut GestureDisambiguator, event: PointerEvent) -> GestureIntents {
        g.handle(&GestureInput::Pointer(event))
    }

    fn scheduled(out: &GestureIntents) -> Vec<TimerId> {
        out.iter()
            .filter_map(|i| match i {
                GestureIntent::ScheduleTimer { timer, .. } => Some(*timer),
                _ => None,
            })
            .collect()
    }

    fn count(out: &[GestureIntent], pred: impl Fn(&GestureIntent) -> bool) -> usize {
        out.iter().filter(|i| pred(i)).count()
    }

    #[test]
    fn test_quick_tap() {
        let mut g = tap_only();
        let mut all = Vec::new();
        all.extend(pointer(&mut g, PointerEvent::down(KEY, 5.0, 5.0, 0)));
        all.extend(pointer(&mut g, PointerEvent::up(KEY, 5.0, 5.0, 80)));

        assert_eq!(count(&all, |i| matches!(i, GestureIntent::PointerUp { .. })), 1);
        assert_eq!(count(&all, |i| matches!(i, GestureIntent::LongPress { .. })), 0);
        assert_eq!(count(&all, |i| matches!(i, GestureIntent::Swipe { .. })), 0);
        assert_eq!(count(&all, |i| matches!(i, GestureIntent::ScheduleTimer { .. })), 0);
        assert!(!g.is_active());
    }

    #[test]
    fn test_long_press_before_pointer_up() {
        let mut g = with_config(TargetConfig {
            long_press_with_pointer_up: true,
            ..TargetConfig::default()
        });
        let down = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        let timers = scheduled(&down);
        assert_eq!(timers.len(), 1);
        assert!(down.contains(&GestureIntent::ScheduleTimer {
            timer: timers[0],
            at: 500
        }));

        let tick = g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 500,
        });
        assert_eq!(
            tick.as_slice(),
            &[GestureIntent::LongPress {
                target: KEY,
                applied: false
            }]
        );
        assert_eq!(g.phase(), &Phase::LongPressed);

        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 600));
        assert_eq!(
            up[0],
            GestureIntent::PointerUp {
                target: KEY,
                x: 0.0,
                y: 0.0,
                flicked: None,
                long_pressed: true,
                cancelled: false,
            }
        );
        assert_eq!(up[1], GestureIntent::LongPressEnd { target: KEY });
    }

    #[test]
    fn test_long_press_without_pointer_up_suppresses_release() {
        let mut g = with_config(TargetConfig {
            long_press_without_pointer_up: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        let tick = g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 500,
        });
        assert!(tick.contains(&GestureIntent::LongPress {
            target: KEY,
            applied: true
        }));

        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 700));
        assert_eq!(up.as_slice(), &[GestureIntent::LongPressEnd { target: KEY }]);
    }

    #[test]
    fn test_release_cancels_long_press_timer() {
        let mut g = with_config(TargetConfig {
            long_press_with_pointer_up: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 100));
        assert_eq!(up[0], GestureIntent::CancelTimer { timer: timers[0] });

        // The late tick finds no live timer.
        let tick = g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 500,
        });
        assert!(tick.is_empty());
    }

    #[test]
    fn test_double_click_replaces_pointer_down_and_up() {
        let mut g = with_config(TargetConfig {
            double_click: true,
            ..TargetConfig::default()
        });
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 50));

        let down = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 200));
        assert_eq!(down.as_slice(), &[GestureIntent::DoubleClick { target: KEY }]);
        assert_eq!(g.phase(), &Phase::DoubleClickArmed);

        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 250));
        assert_eq!(up.as_slice(), &[GestureIntent::LongPressEnd { target: KEY }]);

        // A third tap is a plain tap again.
        let third = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 300));
        assert_eq!(third.as_slice(), &[GestureIntent::PointerDown { target: KEY }]);
    }

    #[test]
    fn test_double_click_window_is_exclusive() {
        let mut g = with_config(TargetConfig {
            double_click: true,
            ..TargetConfig::default()
        });
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 50));
        let down = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 500));
        assert_eq!(down.as_slice(), &[GestureIntent::PointerDown { target: KEY }]);
    }

    #[test]
    fn test_double_click_disabled() {
        let mut g = tap_only();
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 50));
        let down = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 100));
        assert_eq!(down.as_slice(), &[GestureIntent::PointerDown { target: KEY }]);
    }

    #[test]
    fn test_swipe_cancels_long_press() {
        let mut g = with_config(TargetConfig {
            long_press_with_pointer_up: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));

        let small = pointer(&mut g, PointerEvent::moved(KEY, 10.0, 0.0, 50));
        assert!(small.is_empty());

        let out = pointer(&mut g, PointerEvent::moved(KEY, 25.0, 3.0, 100));
        assert_eq!(out[0], GestureIntent::CancelTimer { timer: timers[0] });
        assert_eq!(
            out[1],
            GestureIntent::Swipe {
                target: KEY,
                direction: SwipeDirection::RIGHT
            }
        );

        let tick = g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 500,
        });
        assert!(tick.is_empty());
        assert_eq!(g.phase(), &Phase::Down);
    }

    #[test]
    fn test_vertical_swipe_wins_when_larger() {
        let mut g = tap_only();
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        let out = pointer(&mut g, PointerEvent::moved(KEY, -18.0, -30.0, 40));
        assert!(out.contains(&GestureIntent::Swipe {
            target: KEY,
            direction: SwipeDirection::UP
        }));

        // The horizontal accumulator was kept: another small step left crosses it.
        let out = pointer(&mut g, PointerEvent::moved(KEY, -24.0, -30.0, 60));
        assert!(out.contains(&GestureIntent::Swipe {
            target: KEY,
            direction: SwipeDirection::LEFT
        }));
    }

    #[test]
    fn test_flick_commits_alternate_glyph() {
        let mut flicks = SmallVec::new();
        flicks.push((SwipeDirection::UP, "1".to_string()));
        let mut g = with_config(TargetConfig {
            flicks,
            ..TargetConfig::default()
        });
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 30.0, 0));
        pointer(&mut g, PointerEvent::moved(KEY, 0.0, 5.0, 40));
        assert_eq!(
            g.phase(),
            &Phase::Flickering {
                direction: SwipeDirection::UP,
                glyph: "1".to_string()
            }
        );

        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 5.0, 80));
        assert!(matches!(
            &up[0],
            GestureIntent::PointerUp { flicked: Some(glyph), .. } if glyph == "1"
        ));
    }

    #[test]
    fn test_no_flick_after_long_press() {
        let mut flicks = SmallVec::new();
        flicks.push((SwipeDirection::DOWN, "x".to_string()));
        let mut g = with_config(TargetConfig {
            flicks,
            long_press_with_pointer_up: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 500,
        });
        pointer(&mut g, PointerEvent::moved(KEY, 0.0, 40.0, 550));
        assert_eq!(g.phase(), &Phase::LongPressed);
    }

    #[test]
    fn test_pointer_over_out_after_swipe() {
        let other = KeyId(8);
        let mut g = tap_only();
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        pointer(&mut g, PointerEvent::moved(KEY, 30.0, 0.0, 20));

        let out = pointer(
            &mut g,
            PointerEvent::moved(KEY, 45.0, 0.0, 40).with_over(Some(other)),
        );
        assert_eq!(
            out.as_slice(),
            &[
                GestureIntent::PointerOut {
                    target: KEY,
                    element: KEY
                },
                GestureIntent::PointerOver {
                    target: KEY,
                    element: other
                },
            ]
        );

        // Staying over the same element reports nothing new.
        let out = pointer(
            &mut g,
            PointerEvent::moved(KEY, 46.0, 0.0, 50).with_over(Some(other)),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_hover_tracking_without_swipe() {
        let mut g = tap_only();
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        let out = pointer(
            &mut g,
            PointerEvent::moved(KEY, 5.0, 0.0, 10).with_over(Some(KeyId(9))),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_unmatched_release_is_silent() {
        let mut g = tap_only();
        assert!(pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 10)).is_empty());
        assert!(pointer(&mut g, PointerEvent::cancel(KEY, 10)).is_empty());
        assert!(pointer(&mut g, PointerEvent::moved(KEY, 50.0, 0.0, 10)).is_empty());
    }

    #[test]
    fn test_cancel_reports_cancelled_release() {
        let mut g = tap_only();
        pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0));
        let out = pointer(&mut g, PointerEvent::cancel(KEY, 30));
        assert!(matches!(
            out[0],
            GestureIntent::PointerUp {
                cancelled: true,
                ..
            }
        ));
        assert_eq!(out[1], GestureIntent::LongPressEnd { target: KEY });
    }

    #[test]
    fn test_new_down_supersedes_gesture() {
        let mut g = with_config(TargetConfig {
            long_press_with_pointer_up: true,
            ..TargetConfig::default()
        });
        let first = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        let out = pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 600));
        assert_eq!(out[0], GestureIntent::CancelTimer { timer: first[0] });
        assert_eq!(out[1], GestureIntent::PointerDown { target: KEY });
        let second = scheduled(&out);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn test_repeat_timer() {
        let mut g = with_config(TargetConfig {
            repeat: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        assert_eq!(timers[0].kind, TimerKind::Repeat);

        let out = g.handle(&GestureInput::Tick {
            timer: timers[0],
            now: 300,
        });
        assert_eq!(out[0], GestureIntent::Repeat { target: KEY });
        let next = scheduled(&out);
        assert!(out.contains(&GestureIntent::ScheduleTimer {
            timer: next[0],
            at: 375
        }));

        let up = pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 400));
        assert_eq!(up[0], GestureIntent::CancelTimer { timer: next[0] });
    }

    #[test]
    fn test_dispose_cancels_timers() {
        let mut g = with_config(TargetConfig {
            long_press_without_pointer_up: true,
            ..TargetConfig::default()
        });
        let timers = scheduled(&pointer(&mut g, PointerEvent::down(KEY, 0.0, 0.0, 0)));
        let out = g.dispose();
        assert_eq!(out.as_slice(), &[GestureIntent::CancelTimer { timer: timers[0] }]);
        assert!(!g.is_active());
        assert!(pointer(&mut g, PointerEvent::up(KEY, 0.0, 0.0, 10)).is_empty());
    }

    #[test]
    fn test_flicker_directions() {
        let mut flicks = SmallVec::new();
        flicks.push((SwipeDirection::UP, "a".to_string()));
        flicks.push((SwipeDirection::LEFT, "b".to_string()));
        let config = TargetConfig {
            flicks,
            ..TargetConfig::default()
        };
        assert_eq!(
            config.flicker_directions(),
            SwipeDirection::UP | SwipeDirection::LEFT
        );
        assert_eq!(config.flick_glyph(SwipeDirection::LEFT), Some("b"));
        assert_eq!(config.flick_glyph(SwipeDirection::DOWN), None);
        assert_eq!(SwipeDirection::parse_direction("Up"), Some(SwipeDirection::UP));
        assert_eq!(SwipeDirection::parse_direction("sideways"), None);
    }
}
