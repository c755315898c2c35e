//! Per-person interval bookkeeping.
//!
//! A [`Scheduler`] tracks the windows already committed for one person's day.
//! Home-based tours share one timeline; each home-based tour additionally
//! owns a nested timeline for its work-based sub-tours, which must fit inside
//! the parent's window and are only checked against their siblings.
//!
//! Windows are closed period ranges `[start, end]`.  Two windows conflict when
//! they overlap by more than a boundary: `[2, 4]` and `[4, 6]` may both be
//! committed (the second tour departs in the period the first returns).

use std::fmt;

use crate::{ScheduleError, ScheduleResult};

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A `(start period, end period)` pair with `start <= end`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TimeWindow {
    pub start: usize,
    pub end:   usize,
}

impl TimeWindow {
    /// `None` when `end < start`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Length in periods; zero for a same-period return.
    #[inline]
    pub fn duration(&self) -> usize {
        self.end - self.start
    }

    /// Overlap beyond a shared boundary.
    #[inline]
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ── WindowConstraint ──────────────────────────────────────────────────────────

/// Bounds a candidate window must respect in addition to existing commitments.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WindowConstraint {
    pub earliest_start: usize,
    pub latest_end:     usize,
    /// Index of the parent tour for a work-based sub-tour.
    pub nested_in:      Option<usize>,
}

impl WindowConstraint {
    /// The whole day on the home-based timeline.
    pub fn full_day(periods: usize) -> Self {
        Self { earliest_start: 0, latest_end: periods.saturating_sub(1), nested_in: None }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Commitment {
    pub tour:      usize,
    pub window:    TimeWindow,
    pub nested_in: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    periods:   usize,
    committed: Vec<Commitment>,
}

impl Scheduler {
    pub fn new(periods: usize) -> Self {
        Self { periods, committed: Vec::new() }
    }

    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// All commitments, in commit order.
    pub fn committed(&self) -> &[Commitment] {
        &self.committed
    }

    pub fn is_committed(&self, tour: usize) -> bool {
        self.committed.iter().any(|c| c.tour == tour)
    }

    pub fn window_of(&self, tour: usize) -> Option<TimeWindow> {
        self.committed.iter().find(|c| c.tour == tour).map(|c| c.window)
    }

    /// Commitments on the same timeline as `nested_in`.
    fn peers(&self, nested_in: Option<usize>) -> impl Iterator<Item = &Commitment> {
        self.committed.iter().filter(move |c| c.nested_in == nested_in)
    }

    fn conflicts(&self, window: &TimeWindow, nested_in: Option<usize>) -> bool {
        self.peers(nested_in).any(|c| c.window.overlaps(window))
    }

    /// `true` if `window` could be committed under `constraint`.
    pub fn is_available(&self, window: TimeWindow, constraint: &WindowConstraint) -> bool {
        if window.end >= self.periods
            || window.start < constraint.earliest_start
            || window.end > constraint.latest_end
        {
            return false;
        }
        if let Some(parent) = constraint.nested_in {
            match self.window_of(parent) {
                Some(outer) if outer.contains(&window) => {}
                _ => return false,
            }
        }
        !self.conflicts(&window, constraint.nested_in)
    }

    /// The tightest `[first, last]` period range that still contains every
    /// available window under `constraint`, or `None` if nothing fits.
    pub fn available_range(&self, constraint: &WindowConstraint) -> Option<TimeWindow> {
        let mut lo = constraint.earliest_start;
        let mut hi = constraint.latest_end.min(self.periods.checked_sub(1)?);
        if let Some(parent) = constraint.nested_in {
            let outer = self.window_of(parent)?;
            lo = lo.max(outer.start);
            hi = hi.min(outer.end);
        }
        if lo > hi {
            return None;
        }
        // Any window [i, j] contains the zero-length window [i, i], so a
        // period whose zero-length window is blocked cannot start anything.
        let open = |p: usize| !self.conflicts(&TimeWindow { start: p, end: p }, constraint.nested_in);
        let first = (lo..=hi).find(|&p| open(p))?;
        let last = (first..=hi).rev().find(|&p| open(p))?;
        Some(TimeWindow { start: first, end: last })
    }

    /// Record `window` for `tour`.
    ///
    /// # Errors
    ///
    /// - `OutOfDay` if the window ends past the last period.
    /// - `AlreadyCommitted` if `tour` already holds a window.
    /// - `WindowConflict` if it overlaps a peer or leaves the parent window.
    pub fn commit(
        &mut self,
        tour: usize,
        window: TimeWindow,
        nested_in: Option<usize>,
    ) -> ScheduleResult<()> {
        if window.end >= self.periods {
            return Err(ScheduleError::OutOfDay { window, periods: self.periods });
        }
        if self.is_committed(tour) {
            return Err(ScheduleError::AlreadyCommitted(tour));
        }
        if let Some(parent) = nested_in {
            let inside = self.window_of(parent).is_some_and(|outer| outer.contains(&window));
            if !inside {
                return Err(ScheduleError::WindowConflict { tour, window });
            }
        }
        if self.conflicts(&window, nested_in) {
            return Err(ScheduleError::WindowConflict { tour, window });
        }
        self.committed.push(Commitment { tour, window, nested_in });
        Ok(())
    }

    /// Remove `tour`'s window, together with any sub-tours nested in it.
    pub fn release(&mut self, tour: usize) -> Option<TimeWindow> {
        let window = self.window_of(tour)?;
        self.committed.retain(|c| c.tour != tour && c.nested_in != Some(tour));
        Some(window)
    }

    pub fn clear(&mut self) {
        self.committed.clear();
    }
}
