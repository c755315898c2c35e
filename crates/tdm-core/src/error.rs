//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where a core operation can fail inside them.

use thiserror::Error;

/// The error type for `tdm-core` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid clock time {0}: expected hhmm with hh < 24 and mm < 60")]
    InvalidClockTime(u32),

    #[error("unknown activity purpose {0:?}")]
    UnknownPurpose(String),
}

/// Shorthand result type for `tdm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
