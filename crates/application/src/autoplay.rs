use std::time::{Duration, Instant};

/// Periodic trigger for hands-free page turning.
///
/// The driver only tracks its own deadline; the caller decides whether a
/// fire may actually turn the page (the navigator must be idle and able to
/// advance). A fire that lands while the caller cannot act is consumed and
/// the deadline re-armed, so suppressed ticks never pile up into a burst of
/// deferred steps.
#[derive(Debug, Default)]
pub struct Autoplay {
    next_due: Option<Instant>,
    interval: Option<Duration>,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// A redundant arm with the current interval leaves the deadline
    /// alone; arming with a new interval takes effect immediately rather
    /// than after the already-scheduled fire.
    pub fn arm(&mut self, now: Instant, interval: Duration) {
        if self.next_due.is_none() || self.interval != Some(interval) {
            self.next_due = Some(now + interval);
            self.interval = Some(interval);
        }
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
        self.interval = None;
    }

    /// True at most once per interval; re-arms itself on every fire.
    pub fn due(&mut self, now: Instant, interval: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + interval);
                self.interval = Some(interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(5);

    #[test]
    fn disarmed_never_fires() {
        let mut autoplay = Autoplay::new();
        assert!(!autoplay.due(Instant::now(), INTERVAL));
    }

    #[test]
    fn fires_once_per_interval() {
        let mut autoplay = Autoplay::new();
        let start = Instant::now();
        autoplay.arm(start, INTERVAL);

        assert!(!autoplay.due(start + Duration::from_secs(4), INTERVAL));
        assert!(autoplay.due(start + INTERVAL, INTERVAL));
        // Re-armed relative to the fire, not the original deadline.
        assert!(!autoplay.due(start + INTERVAL + Duration::from_secs(1), INTERVAL));
        assert!(autoplay.due(start + INTERVAL + INTERVAL, INTERVAL));
    }

    #[test]
    fn interval_change_rearms_from_now() {
        let mut autoplay = Autoplay::new();
        let start = Instant::now();
        autoplay.arm(start, INTERVAL);

        // Cadence shortened mid-cycle: the new interval counts from the
        // change, not from the old deadline.
        let short = Duration::from_secs(2);
        autoplay.arm(start + Duration::from_secs(1), short);
        assert!(!autoplay.due(start + Duration::from_secs(2), short));
        assert!(autoplay.due(start + Duration::from_secs(3), short));
    }

    #[test]
    fn arm_is_idempotent_while_armed() {
        let mut autoplay = Autoplay::new();
        let start = Instant::now();
        autoplay.arm(start, INTERVAL);
        // A later redundant arm must not push the deadline out.
        autoplay.arm(start + Duration::from_secs(4), INTERVAL);
        assert!(autoplay.due(start + INTERVAL, INTERVAL));
    }

    #[test]
    fn disarm_clears_pending_fire() {
        let mut autoplay = Autoplay::new();
        let start = Instant::now();
        autoplay.arm(start, INTERVAL);
        autoplay.disarm();
        assert!(!autoplay.is_armed());
        assert!(!autoplay.due(start + INTERVAL, INTERVAL));
    }
}
