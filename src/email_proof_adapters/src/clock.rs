use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, TimeDelta, Utc};
use email_proof_core::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<ArcSwap<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(ArcSwap::from_pointee(start)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.store(Arc::new(now));
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.rcu(|now| **now + delta);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        **self.now.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances_all_clones() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared = clock.clone();

        clock.advance(TimeDelta::minutes(5));

        assert_eq!(shared.now(), start + TimeDelta::minutes(5));
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock::new().now();
        assert!(now >= before);
    }
}
