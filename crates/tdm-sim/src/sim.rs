//! The `DaySimulator` and its per-person pipeline.

use tdm_core::{
    FallbackPolicy, HouseholdAttributes, HouseholdId, ModelConfig, PersonAttributes, PersonId,
    PersonRng,
};
use tdm_pattern::{build_tours, Pattern, Tour};
use tdm_schedule::{PersonContext, TourSchedulingModel};
use tracing::{debug, info, info_span, warn};

use crate::{assign_default_priorities, RunSummary, SimError, SimObserver, SimResult};

#[cfg(feature = "fx-hash")]
pub(crate) type HouseholdMap = rustc_hash::FxHashMap<HouseholdId, HouseholdAttributes>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type HouseholdMap = std::collections::HashMap<HouseholdId, HouseholdAttributes>;

// ── Inputs and outputs ────────────────────────────────────────────────────────

/// One person and the day-pattern code chosen for them upstream.
#[derive(Clone, Debug)]
pub struct PersonDayInput {
    pub person:  PersonAttributes,
    pub pattern: String,
}

impl PersonDayInput {
    pub fn new(person: PersonAttributes, pattern: impl Into<String>) -> Self {
        Self { person, pattern: pattern.into() }
    }
}

/// A person's scheduled day.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonDay {
    pub person:    PersonId,
    pub household: HouseholdId,
    pub pattern:   Pattern,
    /// Home-based tours in chronological order, then work-based sub-tours.
    pub tours:     Vec<Tour>,
}

impl PersonDay {
    pub fn degraded_tours(&self) -> usize {
        self.tours.iter().filter(|t| t.degraded).count()
    }

    pub fn is_degraded(&self) -> bool {
        self.tours.iter().any(|t| t.degraded)
    }
}

// ── DaySimulator ──────────────────────────────────────────────────────────────

/// Schedules persons' days against a shared model and household table.
///
/// Holds no per-person state; `simulate_person` takes `&self` and may be
/// called from many threads at once.  Create via
/// [`DaySimulatorBuilder`][crate::DaySimulatorBuilder].
pub struct DaySimulator {
    pub(crate) config:     ModelConfig,
    pub(crate) model:      TourSchedulingModel,
    pub(crate) households: HouseholdMap,
    #[cfg(feature = "parallel")]
    pub(crate) pool:       Option<rayon::ThreadPool>,
}

impl DaySimulator {
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn model(&self) -> &TourSchedulingModel {
        &self.model
    }

    pub fn household(&self, id: HouseholdId) -> Option<&HouseholdAttributes> {
        self.households.get(&id)
    }

    /// Run the whole pipeline for one person.
    ///
    /// # Errors
    ///
    /// - `HouseholdNotFound` if the household was not supplied.
    /// - `Pattern` for a malformed pattern code.
    /// - `Schedule` for any scheduling failure under
    ///   [`FallbackPolicy::DropPerson`], and for non-recoverable ones under
    ///   [`FallbackPolicy::FullDaySpan`].
    pub fn simulate_person(&self, input: &PersonDayInput) -> SimResult<PersonDay> {
        let person = &input.person;
        let span = info_span!("person", person = %person.id, household = %person.household);
        let _enter = span.enter();

        let household = self.households.get(&person.household).ok_or(
            SimError::HouseholdNotFound { person: person.id, household: person.household },
        )?;
        let pattern = Pattern::parse(&input.pattern)?;
        let mut tours = build_tours(&pattern)?;
        assign_default_priorities(&mut tours);

        let ctx = PersonContext { person, household, pattern: &pattern };
        let mut scheduler = self.model.new_scheduler();
        let mut rng = PersonRng::for_person(self.config.seed, person);

        for index in TourSchedulingModel::scheduling_order(&tours)? {
            let draw = rng.uniform();
            match self.model.schedule_tour(&ctx, &mut tours, index, &mut scheduler, draw) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() && self.config.fallback == FallbackPolicy::FullDaySpan => {
                    let window = self.model.stamp_fallback(&mut tours, index, &scheduler)?;
                    warn!(tour = index, %window, error = %e, "stamped fallback window");
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(pattern = %pattern, tours = tours.len(), "person scheduled");
        Ok(PersonDay { person: person.id, household: person.household, pattern, tours })
    }

    /// Simulate every input and report each outcome to `observer`.
    ///
    /// The returned results are in input order.  With the `parallel` feature
    /// persons run on Rayon (on a dedicated pool when `num_threads` is set).
    pub fn run<O: SimObserver>(
        &self,
        inputs: &[PersonDayInput],
        observer: &mut O,
    ) -> Vec<SimResult<PersonDay>> {
        observer.on_run_start(inputs.len());
        let results = self.simulate_all(inputs);

        let mut summary = RunSummary { persons: inputs.len(), ..RunSummary::default() };
        for (input, result) in inputs.iter().zip(&results) {
            match result {
                Ok(day) => {
                    summary.record_day(day);
                    observer.on_person_scheduled(day);
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(person = %input.person.id, error = %e, "person dropped");
                    observer.on_person_failed(&input.person, e);
                }
            }
        }

        info!(
            persons = summary.persons,
            scheduled = summary.scheduled,
            failed = summary.failed,
            tours = summary.tours,
            degraded_tours = summary.degraded_tours,
            "run complete"
        );
        observer.on_run_end(&summary);
        results
    }

    fn simulate_all(&self, inputs: &[PersonDayInput]) -> Vec<SimResult<PersonDay>> {
        #[cfg(not(feature = "parallel"))]
        {
            inputs.iter().map(|input| self.simulate_person(input)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let work = || -> Vec<SimResult<PersonDay>> {
                inputs.par_iter().map(|input| self.simulate_person(input)).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }
}
