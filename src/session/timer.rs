use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    CountdownStep,
    Advance,
}

/// A delayed transition. `generation` identifies the session that scheduled
/// it; the controller drops timers whose generation is no longer current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub generation: u64,
    pub due: Instant,
    pub kind: TimerKind,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn schedule(&mut self, generation: u64, due: Instant, kind: TimerKind) {
        self.pending.push(Scheduled {
            generation,
            due,
            kind,
        });
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Scheduled> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;
        due.sort_by_key(|t| t.due);
        due
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_drain_returns_only_due_in_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::default();
        queue.schedule(1, t0 + Duration::from_millis(300), TimerKind::Advance);
        queue.schedule(1, t0 + Duration::from_millis(100), TimerKind::CountdownStep);
        queue.schedule(2, t0 + Duration::from_secs(5), TimerKind::Advance);

        let due = queue.drain_due(t0 + Duration::from_millis(500));
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].kind, TimerKind::CountdownStep);
        assert_eq!(due[1].kind, TimerKind::Advance);

        let rest = queue.drain_due(t0 + Duration::from_secs(5));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].generation, 2);
        assert!(queue.drain_due(t0 + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::default();
        queue.schedule(1, t0 + Duration::from_secs(1), TimerKind::Advance);
        assert!(queue.drain_due(t0).is_empty());
        assert_eq!(queue.drain_due(t0 + Duration::from_secs(1)).len(), 1);
    }
}
