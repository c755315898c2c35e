//! Run observer trait for progress reporting and result collection.

use tdm_core::PersonAttributes;

use crate::{PersonDay, SimError};

/// Counters accumulated over one [`DaySimulator::run`][crate::DaySimulator::run].
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct RunSummary {
    pub persons:          usize,
    pub scheduled:        usize,
    pub failed:           usize,
    pub tours:            usize,
    /// Tours stamped with a fallback window.
    pub degraded_tours:   usize,
    /// Scheduled persons with at least one degraded tour.
    pub degraded_persons: usize,
}

impl RunSummary {
    pub(crate) fn record_day(&mut self, day: &PersonDay) {
        self.scheduled += 1;
        self.tours += day.tours.len();
        let degraded = day.degraded_tours();
        self.degraded_tours += degraded;
        if degraded > 0 {
            self.degraded_persons += 1;
        }
    }
}

/// Callbacks invoked by [`DaySimulator::run`][crate::DaySimulator::run].
///
/// Calls arrive on the calling thread in input order, even when persons were
/// simulated in parallel.  All methods default to no-ops.
///
/// # Example: failure counter
///
/// ```rust,ignore
/// struct Failures(Vec<PersonId>);
///
/// impl SimObserver for Failures {
///     fn on_person_failed(&mut self, person: &PersonAttributes, _error: &SimError) {
///         self.0.push(person.id);
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_run_start(&mut self, _persons: usize) {}

    fn on_person_scheduled(&mut self, _day: &PersonDay) {}

    fn on_person_failed(&mut self, _person: &PersonAttributes, _error: &SimError) {}

    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
