use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Too many counts: read {count}, at most {capacity} allowed")]
    TooManyCounts { count: usize, capacity: usize },

    #[error("Count table has {count} values, which is not a multiple of 4")]
    RaggedCounts { count: usize },

    #[error("Degenerate matrix: maximum and minimum score are both {max}")]
    DegenerateMatrix { max: f64 },

    #[error("Sequence {id}: more than {capacity} hits, {dropped} dropped")]
    HitCapacityExceeded {
        id: String,
        capacity: usize,
        dropped: usize,
    },

    #[error("Sequence {id} is longer than {limit} bases")]
    SequenceTooLong { id: String, limit: usize },

    #[error("Invalid sequence at position {position}: {message}")]
    InvalidSequence { position: usize, message: String },

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Create a new InvalidSequence error
    pub fn invalid_sequence(position: usize, message: impl Into<String>) -> Self {
        MotifError::InvalidSequence {
            position,
            message: message.into(),
        }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        MotifError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Whether the run can continue with the next sequence after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MotifError::SequenceTooLong { .. }
                | MotifError::HitCapacityExceeded { .. }
                | MotifError::DegenerateMatrix { .. }
        )
    }
}
