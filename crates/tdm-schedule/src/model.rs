//! The tour time-of-day choice model.
//!
//! [`TourSchedulingModel`] is built once per run and shared read-only by
//! every person.  All per-person state lives in the caller's [`Scheduler`],
//! tour list and RNG.

use std::sync::Arc;

use tdm_choice::{ChoiceError, ChoiceModel, ChoiceSet};
use tdm_core::{
    ActivityPurpose, DayWindow, HouseholdAttributes, ModelConfig, PersonAttributes, PersonRng,
};
use tdm_pattern::{Pattern, Tour};
use tracing::{debug, warn};

use crate::terms::{TermContext, TermLayout, WeightBasis, INTERACTION_TERMS};
use crate::{
    CoefficientTable, ScheduleError, ScheduleResult, Scheduler, TimeWindow, TourContext,
    WindowConstraint,
};

/// The person whose tours are being scheduled.
#[derive(Copy, Clone)]
pub struct PersonContext<'a> {
    pub person:    &'a PersonAttributes,
    pub household: &'a HouseholdAttributes,
    pub pattern:   &'a Pattern,
}

/// `[departure, duration]` coefficients of one active interaction term.
type ActiveTerm = (f64, f64);

pub struct TourSchedulingModel {
    day:                 DayWindow,
    layout:              TermLayout,
    coefficients:        Arc<CoefficientTable>,
    /// Last period a tour may end in when a school tour follows it.
    school_cutoff:       Option<usize>,
    unavailable_utility: f64,
    alternatives:        Vec<TimeWindow>,
}

impl TourSchedulingModel {
    /// # Errors
    ///
    /// `Core` for an invalid configuration, `CoefficientShape` if the table
    /// width does not match the day window and the term table.
    pub fn new(config: &ModelConfig, coefficients: Arc<CoefficientTable>) -> ScheduleResult<Self> {
        config.validate()?;
        let day = config.day_window()?;
        let layout = TermLayout::new(day.periods());
        coefficients.validate_width(layout.term_count())?;

        let cutoff_hour = config.school_return_cutoff_hour;
        let school_cutoff =
            (cutoff_hour < day.last_hour).then(|| cutoff_hour.saturating_sub(day.first_hour) as usize);

        let periods = day.periods();
        let mut alternatives = Vec::with_capacity(day.alternative_count());
        for start in 0..periods {
            for end in start..periods {
                alternatives.push(TimeWindow { start, end });
            }
        }

        Ok(Self {
            day,
            layout,
            coefficients,
            school_cutoff,
            unavailable_utility: config.unavailable_utility,
            alternatives,
        })
    }

    #[inline]
    pub fn day_window(&self) -> DayWindow {
        self.day
    }

    #[inline]
    pub fn layout(&self) -> TermLayout {
        self.layout
    }

    /// Every `(start, end)` window, start-major.
    pub fn alternatives(&self) -> &[TimeWindow] {
        &self.alternatives
    }

    pub fn new_scheduler(&self) -> Scheduler {
        Scheduler::new(self.day.periods())
    }

    // ── Ordering ──────────────────────────────────────────────────────────

    /// Tour indices in the order they must be scheduled: home-based tours by
    /// `(priority, order)`, then work-based sub-tours by
    /// `(priority, parent, order)`.
    ///
    /// # Errors
    ///
    /// `InvalidParent` if a sub-tour's parent is missing or is itself a
    /// sub-tour.
    pub fn scheduling_order(tours: &[Tour]) -> ScheduleResult<Vec<usize>> {
        let mut home: Vec<usize> = Vec::new();
        let mut nested: Vec<usize> = Vec::new();
        for (i, tour) in tours.iter().enumerate() {
            match tour.parent {
                None => home.push(i),
                Some(parent) => {
                    if tours.get(parent).is_none_or(Tour::is_work_based) {
                        return Err(ScheduleError::InvalidParent { tour: i, parent });
                    }
                    nested.push(i);
                }
            }
        }
        home.sort_by_key(|&i| (tours[i].priority, tours[i].order, i));
        nested.sort_by_key(|&i| (tours[i].priority, tours[i].parent, tours[i].order, i));
        home.extend(nested);
        Ok(home)
    }

    // ── Constraints ───────────────────────────────────────────────────────

    pub fn tour_context(&self, person: &PersonAttributes, tours: &[Tour], index: usize) -> TourContext {
        let tour = &tours[index];
        TourContext {
            person:   person.id,
            tour:     index,
            order:    tour.order,
            priority: tour.priority,
            purpose:  tour.scheduling_purpose(),
            kind:     tour.kind,
        }
    }

    /// Bounds from the chronological neighbours that are already committed.
    ///
    /// Neighbours are tours on the same timeline: home-based tours for a
    /// home-based tour, siblings for a work-based sub-tour.
    pub fn window_constraint(
        &self,
        person: &PersonAttributes,
        tours: &[Tour],
        index: usize,
        scheduler: &Scheduler,
    ) -> ScheduleResult<WindowConstraint> {
        let tour = &tours[index];
        if let Some(parent) = tour.parent {
            if !scheduler.is_committed(parent) {
                return Err(ScheduleError::ParentNotScheduled(self.tour_context(person, tours, index)));
            }
        }

        let mut constraint = WindowConstraint::full_day(self.day.periods());
        constraint.nested_in = tour.parent;
        for (i, other) in tours.iter().enumerate() {
            if i == index || other.parent != tour.parent {
                continue;
            }
            let Some(window) = scheduler.window_of(i) else { continue };
            if other.order < tour.order {
                constraint.earliest_start = constraint.earliest_start.max(window.end);
            } else if other.order > tour.order {
                constraint.latest_end = constraint.latest_end.min(window.start);
            }
        }
        Ok(constraint)
    }

    /// Last period `tours[index]` may end in, if a later home-based tour in
    /// the day is a school tour.
    pub fn return_cutoff(&self, tours: &[Tour], index: usize) -> Option<usize> {
        let tour = &tours[index];
        if tour.is_work_based() {
            return None;
        }
        let school_follows = tours.iter().any(|t| {
            !t.is_work_based() && t.order > tour.order && t.primary_purpose() == ActivityPurpose::School
        });
        if school_follows { self.school_cutoff } else { None }
    }

    /// `true` if the tour must spend time at more than one place.
    fn needs_nonzero_duration(tours: &[Tour], index: usize) -> bool {
        tours[index].has_stops() || tours.iter().any(|t| t.parent == Some(index))
    }

    // ── Utility ───────────────────────────────────────────────────────────

    fn active_terms(&self, ctx: &PersonContext<'_>, tours: &[Tour], index: usize) -> Vec<ActiveTerm> {
        let purpose = tours[index].scheduling_purpose();
        let row = self.coefficients.row(purpose);
        let terms = TermContext {
            person:    ctx.person,
            household: ctx.household,
            pattern:   ctx.pattern,
            tours,
            index,
        };
        INTERACTION_TERMS
            .iter()
            .enumerate()
            .filter(|(_, term)| (term.applies)(&terms))
            .map(|(k, _)| {
                (
                    row[self.layout.interaction_column(k, WeightBasis::Departure)],
                    row[self.layout.interaction_column(k, WeightBasis::Duration)],
                )
            })
            .filter(|&(dep, dur)| dep != 0.0 || dur != 0.0)
            .collect()
    }

    fn utility_with(&self, row: &[f64], active: &[ActiveTerm], window: TimeWindow) -> f64 {
        let departure = window.start as f64;
        let duration = window.duration() as f64;
        let mut utility = row[self.layout.departure_column(window.start)]
            + row[self.layout.duration_column(window.duration())];
        for &(dep, dur) in active {
            if dep != 0.0 {
                utility += dep * departure;
            }
            if dur != 0.0 {
                utility += dur * duration;
            }
        }
        utility
    }

    /// Systematic utility of `window` for `tours[index]`, ignoring
    /// availability.
    pub fn utility(
        &self,
        ctx: &PersonContext<'_>,
        tours: &[Tour],
        index: usize,
        window: TimeWindow,
    ) -> f64 {
        let row = self.coefficients.row(tours[index].scheduling_purpose());
        let active = self.active_terms(ctx, tours, index);
        self.utility_with(row, &active, window)
    }

    /// One alternative per window, with unavailable windows carrying the
    /// configured sentinel utility.
    pub fn choice_set(
        &self,
        ctx: &PersonContext<'_>,
        tours: &[Tour],
        index: usize,
        scheduler: &Scheduler,
    ) -> ScheduleResult<ChoiceSet<TimeWindow>> {
        let constraint = self.window_constraint(ctx.person, tours, index, scheduler)?;
        let range = scheduler.available_range(&constraint);
        let cutoff = self.return_cutoff(tours, index);
        let needs_time = Self::needs_nonzero_duration(tours, index);

        let row = self.coefficients.row(tours[index].scheduling_purpose());
        let active = self.active_terms(ctx, tours, index);

        let mut set = ChoiceSet::with_capacity(self.alternatives.len());
        for &window in &self.alternatives {
            let available = range.is_some_and(|r| r.contains(&window))
                && cutoff.is_none_or(|c| window.end <= c)
                && !(needs_time && window.duration() == 0)
                && scheduler.is_available(window, &constraint);
            let utility =
                if available { self.utility_with(row, &active, window) } else { self.unavailable_utility };
            set.push_with(window, utility, available);
        }
        Ok(set)
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Choose, commit and stamp a window for `tours[index]` using `draw`.
    ///
    /// # Errors
    ///
    /// Recoverable: `NoFeasibleWindow`, `DegenerateProbabilities`,
    /// `ParentNotScheduled`.  Anything else indicates a malformed tour list.
    pub fn schedule_tour(
        &self,
        ctx: &PersonContext<'_>,
        tours: &mut [Tour],
        index: usize,
        scheduler: &mut Scheduler,
        draw: f64,
    ) -> ScheduleResult<TimeWindow> {
        let set = self.choice_set(ctx, tours, index, scheduler)?;
        let chosen = match set.choose(draw) {
            Ok(k) => set.alternatives()[k].label,
            Err(ChoiceError::NoAvailableAlternatives { .. }) => {
                let context = self.tour_context(ctx.person, tours, index);
                warn!(
                    person = %context.person,
                    order = context.order,
                    priority = context.priority,
                    purpose = %context.purpose,
                    "no feasible time window"
                );
                return Err(ScheduleError::NoFeasibleWindow(context));
            }
            Err(ChoiceError::DegenerateProbabilities { sum }) => {
                let context = self.tour_context(ctx.person, tours, index);
                warn!(
                    person = %context.person,
                    order = context.order,
                    priority = context.priority,
                    purpose = %context.purpose,
                    sum,
                    "degenerate time window probabilities"
                );
                return Err(ScheduleError::DegenerateProbabilities { context, sum });
            }
            Err(e) => return Err(e.into()),
        };

        self.commit(tours, index, chosen, scheduler)?;
        debug!(
            person = %ctx.person.id,
            tour = index,
            purpose = %tours[index].scheduling_purpose(),
            start = chosen.start,
            end = chosen.end,
            "tour scheduled"
        );
        Ok(chosen)
    }

    /// Schedule every tour in [`scheduling_order`](Self::scheduling_order),
    /// one draw each, stopping at the first error.
    pub fn schedule_tours(
        &self,
        ctx: &PersonContext<'_>,
        tours: &mut [Tour],
        scheduler: &mut Scheduler,
        rng: &mut PersonRng,
    ) -> ScheduleResult<()> {
        for index in Self::scheduling_order(tours)? {
            let draw = rng.uniform();
            self.schedule_tour(ctx, tours, index, scheduler, draw)?;
        }
        Ok(())
    }

    /// Record `window` with the scheduler and stamp it on the tour.
    pub fn commit(
        &self,
        tours: &mut [Tour],
        index: usize,
        window: TimeWindow,
        scheduler: &mut Scheduler,
    ) -> ScheduleResult<()> {
        scheduler.commit(index, window, tours[index].parent)?;
        self.stamp(tours, index, window)
    }

    /// Stamp a fallback window without committing it: the parent's window
    /// for a sub-tour whose parent is committed, otherwise the whole day.
    /// The tour is marked `degraded`.
    pub fn stamp_fallback(
        &self,
        tours: &mut [Tour],
        index: usize,
        scheduler: &Scheduler,
    ) -> ScheduleResult<TimeWindow> {
        let window = tours[index]
            .parent
            .and_then(|parent| scheduler.window_of(parent))
            .unwrap_or(TimeWindow { start: 0, end: self.day.periods() - 1 });
        self.stamp(tours, index, window)?;
        tours[index].degraded = true;
        Ok(window)
    }

    fn stamp(&self, tours: &mut [Tour], index: usize, window: TimeWindow) -> ScheduleResult<()> {
        let last = Self::is_last_home_based(tours, index);
        let tour = &mut tours[index];
        tour.stamp_window(self.day.period_start(window.start), self.day.period_start(window.end))?;
        if last {
            tour.end.set_end_time(self.day.end_of_day())?;
        }
        Ok(())
    }

    fn is_last_home_based(tours: &[Tour], index: usize) -> bool {
        let tour = &tours[index];
        !tour.is_work_based()
            && tours.iter().all(|t| t.is_work_based() || t.order <= tour.order)
    }
}
