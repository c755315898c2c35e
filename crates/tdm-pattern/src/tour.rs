//! Activities and tours.
//!
//! A `Tour` is created once per pattern decomposition and then mutated in
//! place: the scheduler stamps times, destination choice fills locations,
//! and mode choice fills trip modes.  The scheduling core only ever writes
//! times, purposes and roles.

use tdm_core::{ActivityPurpose, ActivityType, ClockTime, TripMode, ZoneId};

use crate::{PatternError, PatternResult};

// ── Activity ──────────────────────────────────────────────────────────────────

/// One stop on a tour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    pub purpose:       ActivityPurpose,
    pub activity_type: ActivityType,
    /// `ZoneId::INVALID` until destination choice runs.
    pub location:      ZoneId,
    pub start_time:    Option<ClockTime>,
    pub end_time:      Option<ClockTime>,
    pub duration_minutes: u32,
    /// Travel time to reach this activity from the previous one.
    pub time_to_activity_minutes:   f32,
    pub distance_to_activity_miles: f32,
    /// Mode of the trip arriving at this activity.
    pub trip_mode:     Option<TripMode>,
}

impl Activity {
    pub fn new(purpose: ActivityPurpose, activity_type: ActivityType) -> Self {
        Self {
            purpose,
            activity_type,
            location: ZoneId::INVALID,
            start_time: None,
            end_time: None,
            duration_minutes: 0,
            time_to_activity_minutes: 0.0,
            distance_to_activity_miles: 0.0,
            trip_mode: None,
        }
    }

    /// Set both times and recompute the duration.
    ///
    /// # Errors
    ///
    /// `TimeOrder` if `end < start`; the activity is left unchanged.
    pub fn set_times(&mut self, start: ClockTime, end: ClockTime) -> PatternResult<()> {
        if end < start {
            return Err(PatternError::TimeOrder { start, end });
        }
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.duration_minutes = start.minutes_until(end);
        Ok(())
    }

    /// Move only the end time, keeping the start.
    pub fn set_end_time(&mut self, end: ClockTime) -> PatternResult<()> {
        match self.start_time {
            Some(start) => self.set_times(start, end),
            None => {
                self.end_time = Some(end);
                Ok(())
            }
        }
    }
}

// ── Tour ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TourKind {
    /// Home → … → home.
    HomeBased,
    /// Work → other → work, nested inside a parent work tour.
    WorkBased,
}

/// One round trip from home (or from work, for sub-tours) back to the same
/// anchor.
///
/// `order` and `priority` are independent: `order` is the chronological
/// position (among home-based tours, or among the sub-tours of one parent),
/// `priority` is the caller-assigned scheduling precedence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    /// The substring this tour was built from, e.g. `"hswh"`.
    pub tour_string: String,
    pub kind:        TourKind,
    pub order:       usize,
    pub priority:    usize,
    /// Index of the parent tour in the person's tour list (work-based only).
    pub parent:      Option<usize>,

    pub begin:               Activity,
    pub intermediate_stop1:  Option<Activity>,
    pub primary_destination: Activity,
    pub intermediate_stop2:  Option<Activity>,
    pub end:                 Activity,

    pub duration_minutes: u32,
    /// Set when the caller stamped a fallback window instead of a chosen one.
    pub degraded: bool,
}

impl Tour {
    pub fn primary_purpose(&self) -> ActivityPurpose {
        self.primary_destination.purpose
    }

    /// Purpose used to pick the coefficient row when scheduling.
    ///
    /// Sub-tours always use the work-based row regardless of their
    /// destination activity.
    pub fn scheduling_purpose(&self) -> ActivityPurpose {
        match self.kind {
            TourKind::HomeBased => self.primary_purpose(),
            TourKind::WorkBased => ActivityPurpose::WorkBased,
        }
    }

    pub fn is_work_based(&self) -> bool {
        self.kind == TourKind::WorkBased
    }

    pub fn stop_count(&self) -> usize {
        self.intermediate_stop1.is_some() as usize + self.intermediate_stop2.is_some() as usize
    }

    pub fn has_stops(&self) -> bool {
        self.stop_count() > 0
    }

    /// Activities in travel order: begin, stop 1, primary, stop 2, end.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        std::iter::once(&self.begin)
            .chain(self.intermediate_stop1.as_ref())
            .chain(std::iter::once(&self.primary_destination))
            .chain(self.intermediate_stop2.as_ref())
            .chain(std::iter::once(&self.end))
    }

    /// Out-of-home activities only (no anchors).
    pub fn interior_activities(&self) -> impl Iterator<Item = &Activity> {
        self.intermediate_stop1
            .iter()
            .chain(std::iter::once(&self.primary_destination))
            .chain(self.intermediate_stop2.iter())
    }

    pub fn contains_purpose(&self, purpose: ActivityPurpose) -> bool {
        self.interior_activities().any(|a| a.purpose == purpose)
    }

    /// The work activity a work-based sub-tour would anchor on.
    pub fn work_activity(&self) -> Option<&Activity> {
        self.interior_activities().find(|a| a.purpose == ActivityPurpose::Work)
    }

    /// Number of `b` markers in the tour string.
    pub fn work_based_markers(&self) -> usize {
        self.tour_string
            .chars()
            .filter(|&c| ActivityPurpose::from_code(c) == Some(ActivityPurpose::WorkBased))
            .count()
    }

    /// Committed `(departure, return)` times, if scheduled.
    pub fn window(&self) -> Option<(ClockTime, ClockTime)> {
        Some((self.begin.end_time?, self.end.start_time?))
    }

    /// Stamp a committed window onto the anchors and primary destination and
    /// recompute the tour duration.
    ///
    /// The begin anchor only gets its end (departure) time; its start belongs
    /// to whatever preceded the tour.  The primary destination spans the
    /// window, and the end anchor starts (and, until a later override, ends)
    /// at the return time.
    pub fn stamp_window(&mut self, start: ClockTime, end: ClockTime) -> PatternResult<()> {
        if end < start {
            return Err(PatternError::TimeOrder { start, end });
        }
        self.begin.set_end_time(start)?;
        self.primary_destination.set_times(start, end)?;
        self.end.set_times(end, end)?;
        self.duration_minutes = start.minutes_until(end);
        Ok(())
    }
}
