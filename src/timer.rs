/// Countdown timer computed from a start anchor, independent of sampling
/// cadence. No internal ticking: callers pass `now_ms` from whatever clock
/// drives them, which makes elapsed time fully deterministic in tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    ms_remaining: u64,
    anchor: Option<Anchor>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Anchor {
    start_ms: u64,
    ms_remaining_at_start: u64,
}

impl CountdownTimer {
    pub fn new(budget_ms: u64) -> Self {
        CountdownTimer {
            ms_remaining: budget_ms,
            anchor: None,
        }
    }

    /// Replaces the budget and stops the timer.
    pub fn set(&mut self, budget_ms: u64) {
        self.ms_remaining = budget_ms;
        self.anchor = None;
    }

    /// (Re)anchors the countdown at the current remaining budget.
    pub fn start(&mut self, now_ms: u64) {
        self.ms_remaining = self.sample(now_ms);
        self.anchor = Some(Anchor {
            start_ms: now_ms,
            ms_remaining_at_start: self.ms_remaining,
        });
    }

    /// Remaining budget at `now_ms`, recomputed from the anchor rather than
    /// accumulated, so polling granularity cannot drift it. Never negative.
    pub fn sample(&self, now_ms: u64) -> u64 {
        match self.anchor {
            Some(a) => a
                .ms_remaining_at_start
                .saturating_sub(now_ms.saturating_sub(a.start_ms)),
            None => self.ms_remaining,
        }
    }

    /// Freezes the remaining budget at its sampled value.
    pub fn stop(&mut self, now_ms: u64) {
        self.ms_remaining = self.sample(now_ms);
        self.anchor = None;
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_pure_in_now() {
        let mut t = CountdownTimer::new(10_000);
        t.start(1_000);
        assert_eq!(t.sample(1_000), 10_000);
        assert_eq!(t.sample(4_000), 7_000);
        assert_eq!(t.sample(4_000), 7_000);
        assert_eq!(t.sample(11_000), 0);
        assert_eq!(t.sample(99_000), 0);
    }

    #[test]
    fn stop_freezes_remaining() {
        let mut t = CountdownTimer::new(10_000);
        t.start(0);
        t.stop(2_500);
        assert_eq!(t.sample(50_000), 7_500);
        assert!(!t.is_running());
    }

    #[test]
    fn restart_keeps_the_frozen_budget() {
        let mut t = CountdownTimer::new(10_000);
        t.start(0);
        t.stop(4_000);
        t.start(20_000);
        assert_eq!(t.sample(21_000), 5_000);
    }

    #[test]
    fn restart_while_running_reanchors() {
        let mut t = CountdownTimer::new(10_000);
        t.start(0);
        t.start(3_000);
        assert_eq!(t.sample(3_000), 7_000);
        assert_eq!(t.sample(5_000), 5_000);
    }

    #[test]
    fn clock_going_backwards_does_not_refund_time() {
        let mut t = CountdownTimer::new(10_000);
        t.start(5_000);
        assert_eq!(t.sample(4_000), 10_000);
    }
}
