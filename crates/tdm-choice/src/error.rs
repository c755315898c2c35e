use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChoiceError {
    #[error("no available alternatives among {total}")]
    NoAvailableAlternatives { total: usize },

    #[error("degenerate probabilities: exponentiated utilities sum to {sum}")]
    DegenerateProbabilities { sum: f64 },

    #[error("random draw {0} outside [0, 1)")]
    InvalidDraw(f64),

    #[error("nest {nest:?} has log-sum scale {scale}; expected 0 < scale <= 1")]
    InvalidScale { nest: String, scale: f64 },

    #[error("alternative index {index} out of range for {len} alternatives")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type ChoiceResult<T> = Result<T, ChoiceError>;
