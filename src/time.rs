use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Simulation time with nanosecond resolution.
///
/// Scenario files carry seconds as floating point values; they are rounded to
/// the nearest nanosecond once on the way in so that TTL comparisons are exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SimTime(i64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime((secs * NANOS_PER_SEC).round() as i64)
    }

    pub fn from_nanos(nanos: i64) -> Self {
        SimTime(nanos)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime::from_secs_f64(secs)
    }
}

impl From<SimTime> for f64 {
    fn from(t: SimTime) -> Self {
        t.as_secs_f64()
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs_f64())
    }
}

/// Handle of a scheduled timer, minted by the event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs_is_exact_for_scenario_values() {
        let now = SimTime::from_secs_f64(20.0);
        let max_age = SimTime::from_secs_f64(3.0);
        let received = now - max_age;
        assert_eq!(now - received, max_age);
        assert_eq!(received.as_secs_f64(), 17.0);
    }

    #[test]
    fn test_json_uses_seconds() {
        let t: SimTime = serde_json::from_str("1.5").unwrap();
        assert_eq!(t, SimTime::from_nanos(1_500_000_000));
        assert_eq!(serde_json::to_string(&t).unwrap(), "1.5");
    }

    #[test]
    fn test_ordering() {
        assert!(SimTime::from_secs_f64(0.5) < SimTime::from_secs_f64(1.0));
        assert!(!SimTime::ZERO.is_positive());
    }
}
