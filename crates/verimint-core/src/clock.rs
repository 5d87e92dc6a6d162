/// Wall-clock seam for the freshness window. The authorizer never reads
/// system time directly, so tests pin `now` to a fixed instant.
pub trait Clock {
    /// Current Unix timestamp in seconds.
    fn now(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// A clock frozen at construction time; advance it explicitly.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u64);

impl FixedClock {
    pub fn advance(&mut self, seconds: u64) {
        self.0 += seconds;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let mut clock = FixedClock(100);
        assert_eq!(clock.now(), 100);
        clock.advance(50);
        assert_eq!(clock.now(), 150);
    }

    #[test]
    fn test_system_clock_is_past_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
