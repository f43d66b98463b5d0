//! Turns wall-clock time into the fixed-size ticks the engine runs on.

use std::time::{Duration, Instant};

/// Paces nominal ticks off a steady clock.
///
/// Ticks stay lined up with the first one, but if the loop stalls until a period and a half past the tick that was
/// due, the schedule restarts from the current time instead of replaying the whole backlog.
#[derive(Debug, Clone)]
pub struct Ticker {
    next: Instant,
    period: Duration,
}

impl Ticker {
    /// The first tick is due one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Ticker {
            next: now + period,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick is due. Handy for `ControlFlow::WaitUntil`.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// How many ticks have come due by `now`, advancing the schedule past them.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        if now >= self.next + self.period / 2 + self.period {
            // stalled; count one tick and resync
            self.next = now + self.period;
            return 1;
        }
        let mut ticks = 0;
        while now >= self.next {
            self.next += self.period;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    #[test]
    fn nothing_due_early() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);
        assert_eq!(ticker.due(start), 0);
        assert_eq!(ticker.due(start + Duration::from_millis(99)), 0);
        assert_eq!(ticker.deadline(), start + PERIOD);
    }

    #[test]
    fn stays_aligned() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);
        assert_eq!(ticker.due(start + Duration::from_millis(130)), 1);
        assert_eq!(ticker.deadline(), start + Duration::from_millis(200));
        assert_eq!(ticker.due(start + Duration::from_millis(200)), 1);
        assert_eq!(ticker.deadline(), start + Duration::from_millis(300));
    }

    #[test]
    fn small_backlog_is_caught_up() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);
        assert_eq!(ticker.due(start + Duration::from_millis(220)), 2);
        assert_eq!(ticker.deadline(), start + Duration::from_millis(300));
    }

    #[test]
    fn resync_starts_a_period_and_a_half_late() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);
        // first tick due at 100ms; 249ms still catches up, 250ms resyncs
        assert_eq!(ticker.clone().due(start + Duration::from_millis(249)), 2);
        let stalled = start + Duration::from_millis(250);
        assert_eq!(ticker.due(stalled), 1);
        assert_eq!(ticker.deadline(), stalled + PERIOD);
    }

    #[test]
    fn long_stall_resyncs() {
        let start = Instant::now();
        let mut ticker = Ticker::new(PERIOD, start);
        let later = start + Duration::from_secs(5);
        assert_eq!(ticker.due(later), 1);
        assert_eq!(ticker.deadline(), later + PERIOD);
    }
}
