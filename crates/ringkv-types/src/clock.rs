use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A monotonic-clamped wall clock.
///
/// Every reading is `max(system_time_now, previous_reading)`, so a single
/// server's write timestamps never go backwards even if the system clock is
/// stepped — this is what makes per-server timestamp ordering an actual
/// guarantee rather than an empirical observation.
///
/// Scaled down from a cluster-wide synchronized clock (only the primary
/// assigns timestamps, quorum-checked against peer clocks) to the single
/// local clamp this crate needs: there is exactly one clock reading per
/// server, never reconciled against peers.
pub struct LocalClock {
    last: Mutex<f64>,
}

impl LocalClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(0.0),
        }
    }

    /// Returns a timestamp guaranteed to be `>=` every previous reading from
    /// this clock.
    pub fn now(&self) -> f64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        let mut last = self.last.lock().expect("clock mutex poisoned");
        let reading = wall.max(*last + f64::EPSILON);
        *last = reading;
        reading
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_are_strictly_increasing() {
        let clock = LocalClock::new();
        let mut prev = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > prev, "{next} did not exceed {prev}");
            prev = next;
        }
    }

    #[test]
    fn never_returns_zero() {
        let clock = LocalClock::new();
        assert!(clock.now() > 0.0);
    }
}
