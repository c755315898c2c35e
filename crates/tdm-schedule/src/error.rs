use std::fmt;

use tdm_choice::ChoiceError;
use tdm_core::{ActivityPurpose, CoreError, PersonId};
use tdm_pattern::{PatternError, TourKind};
use thiserror::Error;

use crate::TimeWindow;

/// Who and what was being scheduled when an error occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourContext {
    pub person:   PersonId,
    pub tour:     usize,
    pub order:    usize,
    pub priority: usize,
    pub purpose:  ActivityPurpose,
    pub kind:     TourKind,
}

impl fmt::Display for TourContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tour {} ({:?}, purpose {}, order {}, priority {})",
            self.person, self.tour, self.kind, self.purpose, self.order, self.priority
        )
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("coefficient parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("coefficient row for {purpose} has {got} terms, expected {expected}")]
    CoefficientShape {
        purpose:  ActivityPurpose,
        expected: usize,
        got:      usize,
    },

    #[error("coefficient table has no row for {0}")]
    MissingPurpose(ActivityPurpose),

    #[error("coefficient table has two rows for {0}")]
    DuplicatePurpose(ActivityPurpose),

    #[error("window {window} for tour {tour} conflicts with a committed window")]
    WindowConflict { tour: usize, window: TimeWindow },

    #[error("window {window} lies outside a day of {periods} periods")]
    OutOfDay { window: TimeWindow, periods: usize },

    #[error("tour {0} is already committed")]
    AlreadyCommitted(usize),

    #[error("tour {tour} refers to parent {parent}, which is not a home-based tour")]
    InvalidParent { tour: usize, parent: usize },

    #[error("parent of {0} has no committed window")]
    ParentNotScheduled(TourContext),

    #[error("no feasible time window for {0}")]
    NoFeasibleWindow(TourContext),

    #[error("degenerate window probabilities for {context}: sum {sum}")]
    DegenerateProbabilities { context: TourContext, sum: f64 },

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ScheduleError {
    /// `true` for failures the caller may answer with a degraded window
    /// instead of dropping the person.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScheduleError::NoFeasibleWindow(_)
                | ScheduleError::DegenerateProbabilities { .. }
                | ScheduleError::ParentNotScheduled(_)
        )
    }

    /// The tour context, for errors raised while scheduling a specific tour.
    pub fn tour_context(&self) -> Option<&TourContext> {
        match self {
            ScheduleError::NoFeasibleWindow(c) | ScheduleError::ParentNotScheduled(c) => Some(c),
            ScheduleError::DegenerateProbabilities { context, .. } => Some(context),
            _ => None,
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
