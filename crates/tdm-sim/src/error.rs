use tdm_core::{CoreError, HouseholdId, PersonId};
use tdm_pattern::PatternError;
use tdm_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("{person} belongs to household {household}, which was not supplied")]
    HouseholdNotFound {
        person:    PersonId,
        household: HouseholdId,
    },

    #[error("household {0} supplied twice")]
    DuplicateHousehold(HouseholdId),

    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SimError {
    /// `true` for a scheduling failure the `FullDaySpan` policy could have
    /// absorbed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::Schedule(e) if e.is_recoverable())
    }
}

pub type SimResult<T> = Result<T, SimError>;
