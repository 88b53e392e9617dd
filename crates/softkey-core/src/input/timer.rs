// Softkey Timer Queue
// Host-side scheduling of gesture timers as tick inputs

use crate::input::Timestamp;
use crate::KeyId;

/// What a gesture timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Single-shot long-press detection
    LongPress,
    /// Auto-repeat while a repeating key stays down
    Repeat,
}

/// Identity of one scheduled timer.
///
/// The token changes every time a timer is armed, so a tick for a timer
/// that was cancelled or re-armed never matches the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    pub target: KeyId,
    pub kind: TimerKind,
    pub token: u64,
}

/// Pending timers ordered by deadline.
///
/// The gesture layer never sleeps; it emits schedule/cancel intents that a
/// host mirrors here, and the host feeds due timers back as ticks.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<(Timestamp, TimerId)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer, replacing any previous entry with the same id
    pub fn schedule(&mut self, timer: TimerId, at: Timestamp) {
        self.cancel(timer);
        let pos = self.pending.partition_point(|&(deadline, _)| deadline <= at);
        self.pending.insert(pos, (at, timer));
    }

    /// Remove a timer; unknown ids are ignored
    pub fn cancel(&mut self, timer: TimerId) {
        self.pending.retain(|&(_, t)| t != timer);
    }

    /// Pop the earliest timer due at `now`
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(TimerId, Timestamp)> {
        match self.pending.first() {
            Some(&(deadline, timer)) if deadline <= now => {
                self.pending.remove(0);
                Some((timer, deadline))
            }
            _ => None,
        }
    }

    /// Deadline of the next timer
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.first().map(|&(deadline, _)| deadline)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(token: u64) -> TimerId {
        TimerId {
            target: KeyId(1),
            kind: TimerKind::LongPress,
            token,
        }
    }

    #[test]
    fn test_pop_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(timer(1), 500);
        queue.schedule(timer(2), 300);
        queue.schedule(timer(3), 400);

        assert_eq!(queue.next_deadline(), Some(300));
        assert_eq!(queue.pop_due(450), Some((timer(2), 300)));
        assert_eq!(queue.pop_due(450), Some((timer(3), 400)));
        assert_eq!(queue.pop_due(450), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        queue.schedule(timer(1), 100);
        queue.cancel(timer(1));
        queue.cancel(timer(9));
        assert!(queue.is_empty());
        assert_eq!(queue.pop_due(1000), None);
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut queue = TimerQueue::new();
        queue.schedule(timer(1), 100);
        queue.schedule(timer(1), 200);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(150), None);
        assert_eq!(queue.pop_due(200), Some((timer(1), 200)));
    }

    #[test]
    fn test_equal_deadlines_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(timer(1), 100);
        queue.schedule(timer(2), 100);
        assert_eq!(queue.pop_due(100), Some((timer(1), 100)));
        assert_eq!(queue.pop_due(100), Some((timer(2), 100)));
    }
}
