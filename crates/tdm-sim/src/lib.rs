//! `tdm-sim`: runs the pattern → tours → time-window pipeline for many
//! persons.
//!
//! # Per-person pipeline
//!
//! ```text
//! for person in inputs (parallel with the `parallel` feature):
//!   ① Household: look up the person's household attributes.
//!   ② Pattern  : parse the day-pattern code and build its tours.
//!   ③ Priority : mandatory tours first, then discretionary, then
//!                 work-based sub-tours.
//!   ④ Schedule : one draw per tour from the person's RNG; recoverable
//!                 failures go through the configured FallbackPolicy.
//! ```
//!
//! Persons are isolated: one failing person never affects another, and a
//! person's result does not depend on which thread ran it.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs persons on Rayon's thread pool.                     |
//! | `fx-hash`  | FxHash for the household lookup table.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tdm_core::ModelConfig;
//! use tdm_schedule::load_coefficients_csv;
//! use tdm_sim::{DaySimulatorBuilder, NoopObserver, PersonDayInput};
//!
//! let table = Arc::new(load_coefficients_csv(path)?);
//! let sim = DaySimulatorBuilder::new(ModelConfig::default(), table)
//!     .households(households)
//!     .build()?;
//! let results = sim.run(&inputs, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod logging;
pub mod observer;
pub mod priority;
pub mod sim;


pub use builder::DaySimulatorBuilder;
pub use error::{SimError, SimResult};
pub use logging::LoggingConfig;
pub use observer::{NoopObserver, RunSummary, SimObserver};
pub use priority::assign_default_priorities;
pub use sim::{DaySimulator, PersonDay, PersonDayInput};
