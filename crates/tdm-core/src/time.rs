//! Clock time and the discretised scheduling day.
//!
//! # Design
//!
//! Activity times use the 24-hour integer encoding `hour * 100 + minute`
//! (`730` is 07:30, `2300` is 23:00), wrapped in [`ClockTime`] so arithmetic
//! happens in minutes and never on the encoded value.
//!
//! The scheduling grid is a [`DayWindow`]: one period per hour from
//! `first_hour` to `last_hour` inclusive, so
//!
//!   periods = last_hour - first_hour + 1
//!
//! and period `i` starts at `(first_hour + i):00`.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── ClockTime ─────────────────────────────────────────────────────────────────

/// Time of day encoded as `hour * 100 + minute`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Build from hour and minute components.
    pub fn from_hm(hour: u8, minute: u8) -> CoreResult<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(CoreError::InvalidClockTime(hour as u32 * 100 + minute as u32));
        }
        Ok(ClockTime(hour as u16 * 100 + minute as u16))
    }

    /// Validate an already-encoded `hhmm` value.
    pub fn from_encoded(hhmm: u32) -> CoreResult<Self> {
        let hour = hhmm / 100;
        let minute = hhmm % 100;
        if hour >= 24 || minute >= 60 {
            return Err(CoreError::InvalidClockTime(hhmm));
        }
        Ok(ClockTime(hhmm as u16))
    }

    /// The raw `hhmm` value.
    #[inline]
    pub fn encoded(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn hour(self) -> u8 {
        (self.0 / 100) as u8
    }

    #[inline]
    pub fn minute(self) -> u8 {
        (self.0 % 100) as u8
    }

    #[inline]
    pub fn minutes_since_midnight(self) -> u32 {
        self.hour() as u32 * 60 + self.minute() as u32
    }

    /// Minutes from `self` to `later`, saturating at zero.
    #[inline]
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        later
            .minutes_since_midnight()
            .saturating_sub(self.minutes_since_midnight())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

// ── DayWindow ─────────────────────────────────────────────────────────────────

/// The hourly period grid the scheduler chooses windows on.
///
/// `DayWindow` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayWindow {
    pub first_hour: u8,
    pub last_hour:  u8,
}

impl DayWindow {
    /// # Errors
    ///
    /// `CoreError::Config` unless `first_hour <= last_hour < 24`.
    pub fn new(first_hour: u8, last_hour: u8) -> CoreResult<Self> {
        if first_hour > last_hour || last_hour >= 24 {
            return Err(CoreError::Config(format!(
                "day window {first_hour}..={last_hour} must satisfy first <= last < 24"
            )));
        }
        Ok(Self { first_hour, last_hour })
    }

    /// Number of one-hour periods, inclusive of both ends.
    #[inline]
    pub fn periods(&self) -> usize {
        (self.last_hour - self.first_hour) as usize + 1
    }

    /// Size of the triangular `(start, end)` alternative space.
    #[inline]
    pub fn alternative_count(&self) -> usize {
        let p = self.periods();
        p * (p + 1) / 2
    }

    /// Clock time at which `period` begins.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `period >= periods()`.
    #[inline]
    pub fn period_start(&self, period: usize) -> ClockTime {
        debug_assert!(period < self.periods(), "period {period} outside day window");
        ClockTime((self.first_hour as u16 + period as u16) * 100)
    }

    /// The period containing `hour`, or `None` if outside the window.
    pub fn period_of_hour(&self, hour: u8) -> Option<usize> {
        (self.first_hour..=self.last_hour)
            .contains(&hour)
            .then(|| (hour - self.first_hour) as usize)
    }

    /// The last representable time of the simulated day (`last_hour:00`).
    #[inline]
    pub fn end_of_day(&self) -> ClockTime {
        ClockTime(self.last_hour as u16 * 100)
    }

    #[inline]
    pub fn start_of_day(&self) -> ClockTime {
        ClockTime(self.first_hour as u16 * 100)
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{} ({} periods)", self.start_of_day(), self.end_of_day(), self.periods())
    }
}
