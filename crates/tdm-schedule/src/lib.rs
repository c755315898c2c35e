//! `tdm-schedule`: tour time-of-day scheduling.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`scheduler`]    | `Scheduler`, `TimeWindow`, `WindowConstraint`             |
//! | [`coefficients`] | `CoefficientTable`, `load_coefficients_csv`/`_reader`     |
//! | [`terms`]        | `TermLayout`, `InteractionTerm`, `INTERACTION_TERMS`      |
//! | [`model`]        | `TourSchedulingModel`, `PersonContext`                    |
//! | [`error`]        | `ScheduleError`, `ScheduleResult<T>`, `TourContext`       |
//!
//! # Per-tour algorithm (summary)
//!
//! ```text
//! for tour in tours ordered by priority (parents before sub-tours):
//!   constraint  = bounds from already-committed chronological neighbours
//!   range       = scheduler.available_range(constraint)
//!   alternatives = every (start, end) with start <= end < periods
//!   utility(i,j) = dep_const[i] + dur_const[j-i]
//!                + Σ active terms (β_dep · i + β_dur · (j-i))
//!   draw one window by Monte Carlo, commit it, stamp activity times
//! ```

pub mod coefficients;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod terms;

#[cfg(test)]
mod tests;

pub use coefficients::{load_coefficients_csv, load_coefficients_reader, CoefficientTable};
pub use error::{ScheduleError, ScheduleResult, TourContext};
pub use model::{PersonContext, TourSchedulingModel};
pub use scheduler::{Commitment, Scheduler, TimeWindow, WindowConstraint};
pub use terms::{InteractionTerm, TermLayout, WeightBasis, INTERACTION_TERMS};
