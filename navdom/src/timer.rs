use std::time::Duration;

/// Handle returned by [`Timers::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer whose deadline was reached during [`Timers::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: u64,
    pub tag: String,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    owner: u64,
    tag: String,
    deadline: Duration,
}

/// Virtual clock with one-shot timers. Time only moves when the host calls
/// `advance`, which keeps timing deterministic.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    pending: Vec<Pending>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the document was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn set_timeout(&mut self, delay: Duration, owner: u64, tag: impl Into<String>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            owner,
            tag: tag.into(),
            deadline: self.now + delay,
        });
        id
    }

    /// Cancel a pending timer. Returns false when it already fired or never existed.
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and return the timers that fired, earliest first.
    /// Timers with equal deadlines fire in creation order.
    pub fn advance(&mut self, by: Duration) -> Vec<FiredTimer> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.deadline <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.deadline, p.id));

        due.into_iter()
            .map(|p| FiredTimer {
                id: p.id,
                owner: p.owner,
                tag: p.tag,
            })
            .collect()
    }

    /// Time until the next pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.deadline.saturating_sub(self.now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = Timers::new();
        let late = timers.set_timeout(Duration::from_millis(300), 1, "late");
        let early = timers.set_timeout(Duration::from_millis(100), 1, "early");

        assert!(timers.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(50)));

        let fired = timers.advance(Duration::from_millis(500));
        let ids: Vec<TimerId> = fired.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![early, late]);
        assert!(timers.is_empty());
    }

    #[test]
    fn cleared_timer_never_fires() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(Duration::from_millis(10), 7, "x");
        assert!(timers.clear_timeout(id));
        assert!(!timers.clear_timeout(id));
        assert!(timers.advance(Duration::from_secs(1)).is_empty());
    }
}
