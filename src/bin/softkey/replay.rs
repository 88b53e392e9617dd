// Softkey Replay
// Drives a keyboard session from a recorded pointer script
//
// Script lines:
//   down|move|up|cancel <key> <x> <y> <ms> [over=<key>]
//   blur <ms>
// Keys are referred to by layout name; `#` starts a comment.

use anyhow::{anyhow, bail, Context, Result};

use softkey_core::{
    Intent, KeyId, Keyboard, Layout, PointerEvent, PointerEventKind, TimerQueue, Timestamp,
};

/// One line of a replay script
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    Pointer(PointerEvent),
    Blur { at: Timestamp },
}

impl ReplayStep {
    fn at(&self) -> Timestamp {
        match self {
            ReplayStep::Pointer(event) => event.timestamp,
            ReplayStep::Blur { at } => *at,
        }
    }
}

/// Parse a whole script against the key names of `layout`
pub fn parse_script(script: &str, layout: &Layout) -> Result<Vec<ReplayStep>> {
    let mut steps = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line, layout).with_context(|| format!("line {}: {}", index + 1, raw))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str, layout: &Layout) -> Result<ReplayStep> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if let ["blur", ms] = fields.as_slice() {
        return Ok(ReplayStep::Blur {
            at: ms.parse().context("invalid timestamp")?,
        });
    }

    let [kind, key, x, y, ms, rest @ ..] = fields.as_slice() else {
        bail!("expected '<event> <key> <x> <y> <ms> [over=<key>]'");
    };
    let kind: PointerEventKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let target = key_id(layout, key)?;
    let mut event = PointerEvent::new(
        kind,
        target,
        x.parse().context("invalid x")?,
        y.parse().context("invalid y")?,
        ms.parse().context("invalid timestamp")?,
    );

    for extra in rest {
        match extra.split_once('=') {
            Some(("over", "none")) => event = event.with_over(None),
            Some(("over", name)) => event = event.with_over(Some(key_id(layout, name)?)),
            _ => bail!("unexpected field '{}'", extra),
        }
    }
    Ok(ReplayStep::Pointer(event))
}

fn key_id(layout: &Layout, name: &str) -> Result<KeyId> {
    layout
        .key_by_name(name)
        .map(|key| key.id)
        .ok_or_else(|| anyhow!("unknown key '{}'", name))
}

/// Runs steps through a keyboard, playing the host's timer role
pub struct Replayer {
    keyboard: Keyboard,
    timers: TimerQueue,
    log: Vec<(Timestamp, Intent)>,
}

impl Replayer {
    pub fn new(keyboard: Keyboard) -> Self {
        Self {
            keyboard,
            timers: TimerQueue::new(),
            log: Vec::new(),
        }
    }

    /// Feed every step, firing timers that come due before each one
    pub fn run(&mut self, steps: &[ReplayStep]) -> &[(Timestamp, Intent)] {
        for step in steps {
            let at = step.at();
            self.fire_due(at);
            let intents = match step {
                ReplayStep::Pointer(event) => self.keyboard.handle((*event).into()),
                ReplayStep::Blur { .. } => self.keyboard.blur(),
            };
            self.record(at, intents);
        }
        &self.log
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    fn fire_due(&mut self, now: Timestamp) {
        while let Some((timer, deadline)) = self.timers.pop_due(now) {
            let intents = self.keyboard.tick(timer, deadline);
            self.record(deadline, intents);
        }
    }

    fn record(&mut self, at: Timestamp, intents: Vec<Intent>) {
        for intent in intents {
            match &intent {
                Intent::ScheduleTimer { timer, at } => self.timers.schedule(*timer, *at),
                Intent::CancelTimer { timer } => self.timers.cancel(*timer),
                _ => {}
            }
            log::trace!("{:>6}ms {}", at, intent);
            self.log.push((at, intent));
        }
    }
}
