use std::time::Duration;

/// Repeating timer that reports how many whole periods passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    period: Duration,
    elapsed: Duration,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Drop any partial period.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}

/// Single-shot delay. Fires once, then stays spent.
#[derive(Debug, Clone, PartialEq)]
pub struct OneShot {
    remaining: Duration,
    fired: bool,
}

impl OneShot {
    pub fn new(delay: Duration) -> Self {
        Self {
            remaining: delay,
            fired: false,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// True exactly once, on the advance that reaches the deadline.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.fired = true;
            return true;
        }
        false
    }
}
