//! `tdm-choice`: discrete-choice evaluation shared by every tdm model.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`set`]    | `Alternative<T>`, `ChoiceSet<T>`: flat multinomial logit     |
//! | [`nested`] | `Nest<T>`, `NestedChoiceSet<T>`: one level of nesting        |
//! | [`model`]  | `ChoiceModel` trait implemented by both                       |
//! | [`error`]  | `ChoiceError`, `ChoiceResult<T>`                              |
//!
//! # Contract
//!
//! 1. Build the alternative set and give each alternative a utility and an
//!    availability flag.
//! 2. Probabilities are exponentiated utilities normalised over *available*
//!    alternatives only; unavailable alternatives get probability zero no
//!    matter what utility they carry.
//! 3. Selection is inverse-CDF sampling: the caller supplies one uniform
//!    `[0, 1)` draw and the first alternative whose cumulative probability
//!    exceeds it is chosen.  The engine never touches an RNG itself, which
//!    keeps replay determinism in the caller's hands.

pub mod error;
pub mod model;
pub mod nested;
pub mod set;


pub use error::{ChoiceError, ChoiceResult};
pub use model::ChoiceModel;
pub use nested::{Nest, NestedChoiceSet};
pub use set::{Alternative, ChoiceSet};
