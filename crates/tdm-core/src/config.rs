//! Model configuration.
//!
//! Typically loaded from a JSON file by the application crate (see the
//! `daysim` demo) and passed to the simulator builder.

use crate::{CoreError, CoreResult, DayWindow};

/// What the caller does when a tour has no feasible time window.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackPolicy {
    /// Fail the whole person; other persons are unaffected.
    #[default]
    DropPerson,
    /// Stamp the full day on the failing tour, mark it degraded, and keep
    /// scheduling the person's remaining tours.
    FullDaySpan,
}

/// Top-level configuration for pattern decomposition and tour scheduling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// First hour a tour may start.
    pub first_hour: u8,

    /// Last hour a tour may end; also the end-of-day stamp on the last tour.
    pub last_hour: u8,

    /// A tour that precedes a school tour in the same day must be back by
    /// this hour.
    pub school_return_cutoff_hour: u8,

    /// Utility assigned to unavailable alternatives.  Never reaches the
    /// probability computation; kept so logged utilities are recognisable.
    pub unavailable_utility: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    pub fallback: FallbackPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            first_hour:                5,
            last_hour:                 23,
            school_return_cutoff_hour: 19,
            unavailable_utility:       -999.0,
            seed:                      0,
            num_threads:               None,
            fallback:                  FallbackPolicy::DropPerson,
        }
    }
}

impl ModelConfig {
    /// The period grid implied by `first_hour..=last_hour`.
    pub fn day_window(&self) -> CoreResult<DayWindow> {
        DayWindow::new(self.first_hour, self.last_hour)
    }

    /// `last_hour - first_hour + 1`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `first_hour > last_hour`; call
    /// [`validate`](Self::validate) first.
    pub fn periods(&self) -> usize {
        debug_assert!(self.first_hour <= self.last_hour);
        (self.last_hour - self.first_hour) as usize + 1
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> CoreResult<()> {
        self.day_window()?;
        if self.school_return_cutoff_hour >= 24 {
            return Err(CoreError::Config(format!(
                "school_return_cutoff_hour {} must be < 24",
                self.school_return_cutoff_hour
            )));
        }
        if !self.unavailable_utility.is_finite() {
            return Err(CoreError::Config("unavailable_utility must be finite".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be > 0 when set".into()));
        }
        Ok(())
    }
}
