use std::time::{SystemTime, UNIX_EPOCH};

/// Time source handed to the block factory, so block timestamps never come
/// from an implicit global read.
pub trait Clock {
    fn unix_secs(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs()
    }
}

/// Always reports the same instant. Used for deterministic sealing in tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_secs(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.unix_secs() > 1_577_836_800);
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        assert_eq!(FixedClock(1_600_000_000).unix_secs(), 1_600_000_000);
    }
}
