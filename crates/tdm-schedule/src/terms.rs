//! Utility term table.
//!
//! Every interaction term is one row of [`INTERACTION_TERMS`]: a name (used
//! in logs and in coefficient file headers) and a predicate over the
//! [`TermContext`] of the tour being scheduled.  An active term contributes
//!
//! ```text
//! β_dep · departure_period + β_dur · duration_periods
//! ```
//!
//! where the two coefficients come from the purpose's row of the coefficient
//! table at the columns given by [`TermLayout`].  Adding a term means adding
//! a table entry and two coefficient columns; no scheduling code changes.

use tdm_core::{
    ActivityPurpose, AgeBand, AutoSufficiency, HouseholdAttributes, HouseholdComposition,
    IncomeSegment, PersonAttributes, PersonType,
};
use tdm_pattern::{Pattern, Tour};

// ── TermContext ───────────────────────────────────────────────────────────────

/// Everything a term predicate may look at.
pub struct TermContext<'a> {
    pub person:    &'a PersonAttributes,
    pub household: &'a HouseholdAttributes,
    pub pattern:   &'a Pattern,
    pub tours:     &'a [Tour],
    pub index:     usize,
}

impl TermContext<'_> {
    #[inline]
    pub fn tour(&self) -> &Tour {
        &self.tours[self.index]
    }

    /// Number of home-based tours in the day.
    pub fn home_based_tours(&self) -> usize {
        self.tours.iter().filter(|t| !t.is_work_based()).count()
    }

    /// 1-based chronological position among home-based tours, `None` for
    /// work-based sub-tours.
    pub fn position(&self) -> Option<usize> {
        let tour = self.tour();
        (!tour.is_work_based()).then_some(tour.order + 1)
    }

    fn is_position(&self, nth: usize, of: usize) -> bool {
        self.home_based_tours() == of && self.position() == Some(nth)
    }

    fn other_tour_has(&self, purpose: ActivityPurpose) -> bool {
        self.tours
            .iter()
            .enumerate()
            .any(|(i, t)| i != self.index && !t.is_work_based() && t.primary_purpose() == purpose)
    }

    fn has_sub_tours(&self) -> bool {
        self.tours.iter().any(|t| t.parent == Some(self.index))
    }
}

// ── Term table ────────────────────────────────────────────────────────────────

/// Which basis a coefficient multiplies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WeightBasis {
    Departure,
    Duration,
}

pub struct InteractionTerm {
    pub name:    &'static str,
    pub applies: fn(&TermContext<'_>) -> bool,
}

const fn term(name: &'static str, applies: fn(&TermContext<'_>) -> bool) -> InteractionTerm {
    InteractionTerm { name, applies }
}

/// The interaction terms, in coefficient-column order.
pub static INTERACTION_TERMS: &[InteractionTerm] = &[
    // person
    term("female", |c| c.person.female),
    term("full_time_worker", |c| c.person.person_type() == PersonType::FullTimeWorker),
    term("part_time_worker", |c| c.person.person_type() == PersonType::PartTimeWorker),
    term("college_student", |c| c.person.person_type() == PersonType::CollegeStudent),
    term("school_child", |c| c.person.person_type() == PersonType::SchoolChild),
    term("preschooler", |c| c.person.person_type() == PersonType::Preschooler),
    term("non_worker", |c| c.person.person_type() == PersonType::NonWorker),
    term("retired", |c| c.person.person_type() == PersonType::Retired),
    term("age_5_11", |c| c.person.age_band() == AgeBand::Age5To11),
    term("age_12_17", |c| c.person.age_band() == AgeBand::Age12To17),
    term("age_18_24", |c| c.person.age_band() == AgeBand::Age18To24),
    term("age_25_34", |c| c.person.age_band() == AgeBand::Age25To34),
    term("age_55_64", |c| c.person.age_band() == AgeBand::Age55To64),
    term("age_65_plus", |c| c.person.age_band() == AgeBand::Age65Plus),
    // household
    term("income_low", |c| c.household.income_segment() == IncomeSegment::Low),
    term("income_mid_low", |c| c.household.income_segment() == IncomeSegment::MidLow),
    term("income_high", |c| c.household.income_segment() == IncomeSegment::High),
    term("zero_autos", |c| c.household.auto_sufficiency() == AutoSufficiency::NoAutos),
    term("autos_fewer_than_workers", |c| {
        c.household.auto_sufficiency() == AutoSufficiency::FewerAutosThanWorkers
    }),
    term("single_adult", |c| c.household.composition() == HouseholdComposition::SingleAdult),
    term("single_parent", |c| {
        c.household.composition() == HouseholdComposition::SingleAdultWithChildren
    }),
    term("adults_with_children", |c| {
        c.household.composition() == HouseholdComposition::AdultsWithChildren
    }),
    // tour
    term("outbound_stop", |c| c.tour().intermediate_stop1.is_some()),
    term("inbound_stop", |c| c.tour().intermediate_stop2.is_some()),
    term("two_stops", |c| c.tour().stop_count() == 2),
    term("has_work_based_sub_tour", |c| c.has_sub_tours()),
    // pattern
    term("day_has_other_work_tour", |c| c.other_tour_has(ActivityPurpose::Work)),
    term("day_has_other_school_tour", |c| c.other_tour_has(ActivityPurpose::School)),
    term("day_has_work_based_tour", |c| c.pattern.has_work_based_tour()),
    term("day_has_stops_on_other_tours", |c| {
        c.pattern.tours_with_stops() > usize::from(c.tour().has_stops())
    }),
    // position among home-based tours
    term("first_of_two", |c| c.is_position(1, 2)),
    term("second_of_two", |c| c.is_position(2, 2)),
    term("first_of_three", |c| c.is_position(1, 3)),
    term("second_of_three", |c| c.is_position(2, 3)),
    term("third_of_three", |c| c.is_position(3, 3)),
    term("first_of_four", |c| c.is_position(1, 4)),
    term("second_of_four", |c| c.is_position(2, 4)),
    term("third_of_four", |c| c.is_position(3, 4)),
    term("fourth_of_four", |c| c.is_position(4, 4)),
    term("five_plus_tours", |c| c.home_based_tours() >= 5 && c.position().is_some()),
];

/// Index of the term called `name`.
pub fn term_index(name: &str) -> Option<usize> {
    INTERACTION_TERMS.iter().position(|t| t.name == name)
}

// ── TermLayout ────────────────────────────────────────────────────────────────

/// Column positions of each coefficient in a purpose row.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TermLayout {
    periods: usize,
    terms:   usize,
}

impl TermLayout {
    pub fn new(periods: usize) -> Self {
        Self { periods, terms: INTERACTION_TERMS.len() }
    }

    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Row width: `2·periods + 2·terms`.
    #[inline]
    pub fn term_count(&self) -> usize {
        2 * self.periods + 2 * self.terms
    }

    #[inline]
    pub fn departure_column(&self, period: usize) -> usize {
        period
    }

    #[inline]
    pub fn duration_column(&self, duration: usize) -> usize {
        self.periods + duration
    }

    #[inline]
    pub fn interaction_column(&self, term: usize, basis: WeightBasis) -> usize {
        let base = 2 * self.periods + 2 * term;
        match basis {
            WeightBasis::Departure => base,
            WeightBasis::Duration => base + 1,
        }
    }

    /// Header names matching the column order, for writing coefficient files.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.term_count());
        names.extend((0..self.periods).map(|p| format!("departure_{p}")));
        names.extend((0..self.periods).map(|d| format!("duration_{d}")));
        for term in INTERACTION_TERMS {
            names.push(format!("{}_departure", term.name));
            names.push(format!("{}_duration", term.name));
        }
        names
    }
}
