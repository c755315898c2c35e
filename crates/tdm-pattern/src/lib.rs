//! `tdm-pattern`: day-pattern decoding and tour construction.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`pattern`] | `Pattern`: parsed day code, tour substrings, summary counts  |
//! | [`tour`]    | `Activity`, `Tour`, `TourKind`                                |
//! | [`builder`] | `build_tour`, `build_tours`, primary-destination rule         |
//! | [`error`]   | `PatternError`, `PatternResult<T>`                            |
//!
//! # Day-pattern alphabet
//!
//! ```text
//! h home   w work   c school   s shop   r recreate   o other   b work-based
//! ```
//!
//! A code always starts and ends with `h`.  Each stretch between two
//! consecutive `h` (both included) is one home-based tour, e.g.
//!
//! ```text
//! hwbhsh  →  "hwbh" (work tour with one work-based sub-tour), "hsh"
//! ```

pub mod builder;
pub mod error;
pub mod pattern;
pub mod tour;

#[cfg(test)]
mod tests;

pub use builder::{build_tour, build_tours, build_work_based_tour, primary_index};
pub use error::{PatternError, PatternResult};
pub use pattern::Pattern;
pub use tour::{Activity, Tour, TourKind};
