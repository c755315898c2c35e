//! `tdm-core`: foundational types for the `tdm` travel-demand microsimulation.
//!
//! This crate is a dependency of every other `tdm-*` crate.  It has no
//! `tdm-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `HouseholdId`, `ZoneId`                       |
//! | [`purpose`]     | `ActivityPurpose` (priority-ranked), `ActivityType`       |
//! | [`mode`]        | `TripMode` enum                                           |
//! | [`time`]        | `ClockTime` (hhmm encoding), `DayWindow` (period grid)    |
//! | [`person`]      | `PersonAttributes`, `HouseholdAttributes` and segments    |
//! | [`config`]      | `ModelConfig`, `FallbackPolicy`                           |
//! | [`rng`]         | `PersonRng` (per person-and-member)                       |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod mode;
pub mod person;
pub mod purpose;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FallbackPolicy, ModelConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{HouseholdId, PersonId, ZoneId};
pub use mode::TripMode;
pub use person::{
    AgeBand, AutoSufficiency, Employment, HouseholdAttributes, HouseholdComposition,
    IncomeSegment, PersonAttributes, PersonType, StudentStatus,
};
pub use purpose::{ActivityPurpose, ActivityType};
pub use rng::PersonRng;
pub use time::{ClockTime, DayWindow};
