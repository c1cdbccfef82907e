//! 90 kHz presentation time

use std::fmt;
use std::ops::Add;

/// Ticks per second of Blu-ray presentation time
pub const TICKS_PER_SECOND: u64 = 90_000;

/// A time value in 90 kHz ticks, as stored in playlists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(pub u64);

impl Ticks {
    /// Raw tick count
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whole seconds as ticks
    pub fn from_secs(secs: u64) -> Self {
        Self(secs * TICKS_PER_SECOND)
    }
}

impl From<u64> for Ticks {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(rhs.0))
    }
}

/// Formats as `HH:MM:SS.mmm`, milliseconds truncated
impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0 / TICKS_PER_SECOND;
        let ms = (self.0 % TICKS_PER_SECOND) / 90;

        let s = total_secs % 60;
        let m = (total_secs / 60) % 60;
        let h = total_secs / 3600;

        write!(f, "{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Ticks(0).to_string(), "00:00:00.000");
        assert_eq!(Ticks(90_000).to_string(), "00:00:01.000");
        assert_eq!(Ticks(45_000).to_string(), "00:00:00.500");
        assert_eq!(Ticks::from_secs(3600 + 23 * 60 + 45).to_string(), "01:23:45.000");
        // 89 ticks is under a millisecond
        assert_eq!(Ticks(89).to_string(), "00:00:00.000");
        assert_eq!(Ticks(90_000 * 100 * 3600).to_string(), "100:00:00.000");
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(Ticks::from(90_000), Ticks::from_secs(1));
        assert_eq!(Ticks::from(45_000).get(), 45_000);
    }

    #[test]
    fn test_add() {
        assert_eq!(Ticks(10) + Ticks(5), Ticks(15));
        assert_eq!(Ticks(u64::MAX) + Ticks(1), Ticks(u64::MAX));
    }
}
