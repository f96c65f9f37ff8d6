use thiserror::Error as ThisError;

use crate::PointId;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown point id {0}")]
    UnknownPoint(PointId),
    #[error("malformed tour: {0}")]
    MalformedTour(String),
    #[error("point {point} has degree {degree} in {context}")]
    DegreeViolation {
        point: PointId,
        degree: usize,
        context: &'static str,
    },
    #[error("tour difference is unbalanced: deleted={deleted} added={added}")]
    UnequalDifference { deleted: usize, added: usize },
    #[error("spanning tree covers {covered} of {expected} points")]
    SpanningFailure { covered: usize, expected: usize },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn malformed_tour(message: impl Into<String>) -> Self {
        Self::MalformedTour(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
