use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Monotonic wall-clock reading, in nanoseconds since the first clock read of
/// the process.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }
}

/// Read the wall clock.
#[inline]
pub fn now() -> Timestamp {
    let anchor = ANCHOR.get_or_init(Instant::now);
    Timestamp(anchor.elapsed().as_nanos() as u64)
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    // Saturates: a stop read before its start reports zero.
    fn sub(self, rhs: Self) -> Self::Output {
        Duration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_is_a_duration() {
        let a = Timestamp::from_nanos(1_500);
        let b = Timestamp::from_nanos(2_001_500);

        assert_eq!(b - a, Duration::from_millis(2));
        assert_eq!(a - b, Duration::ZERO);
    }

    #[test]
    fn now_is_monotonic() {
        let a = now();
        std::thread::sleep(Duration::from_millis(2));
        let b = now();

        assert!(b > a);
        assert!(b - a >= Duration::from_millis(2));
    }

    #[test]
    fn display_splits_seconds() {
        assert_eq!(Timestamp::from_nanos(3_000_000_042).to_string(), "3.000000042s");
    }
}
