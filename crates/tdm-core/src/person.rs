//! Person and household attribute records.
//!
//! These are produced by an external population reader and passed to the
//! models by reference.  The segment enums (`PersonType`, `AgeBand`,
//! `IncomeSegment`, …) are derived on demand so the raw record stays the
//! single source of truth.

use crate::{HouseholdId, PersonId, ZoneId};

// ── Raw enums carried on the record ───────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Employment {
    FullTime,
    PartTime,
    #[default]
    NotEmployed,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StudentStatus {
    #[default]
    NotStudent,
    /// Pre-school through grade 12.
    GradeSchool,
    College,
}

// ── Derived segments ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PersonType {
    Preschooler,
    SchoolChild,
    CollegeStudent,
    FullTimeWorker,
    PartTimeWorker,
    NonWorker,
    Retired,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum AgeBand {
    Under5,
    Age5To11,
    Age12To17,
    Age18To24,
    Age25To34,
    Age35To54,
    Age55To64,
    Age65Plus,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum IncomeSegment {
    /// Under $15,000.
    Low,
    /// $15,000 – $29,999.
    MidLow,
    /// $30,000 – $59,999.
    Mid,
    /// $60,000 and above.
    High,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AutoSufficiency {
    NoAutos,
    FewerAutosThanWorkers,
    AutosAtLeastWorkers,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HouseholdComposition {
    SingleAdult,
    AdultsOnly,
    SingleAdultWithChildren,
    AdultsWithChildren,
}

// ── PersonAttributes ──────────────────────────────────────────────────────────

/// One synthetic person.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonAttributes {
    pub id:         PersonId,
    pub household:  HouseholdId,
    /// 1-based position within the household; part of the RNG seed.
    pub member:     u8,
    pub age:        u8,
    pub female:     bool,
    pub employment: Employment,
    pub student:    StudentStatus,
}

impl PersonAttributes {
    pub fn is_worker(&self) -> bool {
        self.employment != Employment::NotEmployed
    }

    pub fn is_student(&self) -> bool {
        self.student != StudentStatus::NotStudent
    }

    /// Classification used by the scheduling utility terms.
    ///
    /// Age dominates for children; students outrank workers for adults
    /// enrolled in college.
    pub fn person_type(&self) -> PersonType {
        match (self.age, self.student, self.employment) {
            (0..=4, _, _) => PersonType::Preschooler,
            (5..=17, _, _) => PersonType::SchoolChild,
            (_, StudentStatus::College, _) => PersonType::CollegeStudent,
            (_, _, Employment::FullTime) => PersonType::FullTimeWorker,
            (_, _, Employment::PartTime) => PersonType::PartTimeWorker,
            (65.., _, Employment::NotEmployed) => PersonType::Retired,
            _ => PersonType::NonWorker,
        }
    }

    pub fn age_band(&self) -> AgeBand {
        match self.age {
            0..=4   => AgeBand::Under5,
            5..=11  => AgeBand::Age5To11,
            12..=17 => AgeBand::Age12To17,
            18..=24 => AgeBand::Age18To24,
            25..=34 => AgeBand::Age25To34,
            35..=54 => AgeBand::Age35To54,
            55..=64 => AgeBand::Age55To64,
            _       => AgeBand::Age65Plus,
        }
    }
}

// ── HouseholdAttributes ───────────────────────────────────────────────────────

/// One synthetic household.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseholdAttributes {
    pub id:        HouseholdId,
    /// Annual income in dollars.
    pub income:    u32,
    pub autos:     u8,
    pub size:      u8,
    pub workers:   u8,
    /// Members under 18.
    pub children:  u8,
    pub home_zone: ZoneId,
}

impl HouseholdAttributes {
    pub fn income_segment(&self) -> IncomeSegment {
        match self.income {
            0..15_000      => IncomeSegment::Low,
            15_000..30_000 => IncomeSegment::MidLow,
            30_000..60_000 => IncomeSegment::Mid,
            _              => IncomeSegment::High,
        }
    }

    pub fn auto_sufficiency(&self) -> AutoSufficiency {
        if self.autos == 0 {
            AutoSufficiency::NoAutos
        } else if self.autos < self.workers {
            AutoSufficiency::FewerAutosThanWorkers
        } else {
            AutoSufficiency::AutosAtLeastWorkers
        }
    }

    pub fn adults(&self) -> u8 {
        self.size.saturating_sub(self.children)
    }

    pub fn composition(&self) -> HouseholdComposition {
        match (self.adults() <= 1, self.children > 0) {
            (true, false)  => HouseholdComposition::SingleAdult,
            (false, false) => HouseholdComposition::AdultsOnly,
            (true, true)   => HouseholdComposition::SingleAdultWithChildren,
            (false, true)  => HouseholdComposition::AdultsWithChildren,
        }
    }
}
