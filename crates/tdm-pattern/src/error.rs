use tdm_core::ClockTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("empty day-pattern code")]
    Empty,

    #[error("invalid character {character:?} at position {position} in pattern {code:?}")]
    InvalidCharacter {
        code:      String,
        character: char,
        position:  usize,
    },

    #[error("{0:?} must begin and end with home")]
    MissingHomeAnchor(String),

    #[error("pattern {code:?} has {available} tours; tour {requested} requested")]
    TourOutOfRange {
        code:      String,
        requested: usize,
        available: usize,
    },

    #[error("tour string {0:?} is shorter than home-activity-home")]
    TourTooShort(String),

    #[error("tour string {0:?} has more than three out-of-home activities")]
    TourTooLong(String),

    #[error("tour string {0:?} contains an interior home activity")]
    UnexpectedHome(String),

    #[error("tour string {0:?} has a work-based sub-tour but no work activity")]
    WorkBasedWithoutWork(String),

    #[error("activity ends at {end} before it starts at {start}")]
    TimeOrder { start: ClockTime, end: ClockTime },
}

pub type PatternResult<T> = Result<T, PatternError>;
