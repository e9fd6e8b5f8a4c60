//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = MatchError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum MatchError {
    /// Contains [`InputError`].
    Input(InputError),
    /// Contains [`DimensionError`].
    Dimension(DimensionError),
    /// Contains [`AlgorithmError`].
    Algorithm(AlgorithmError),
    /// Contains [`TaskError`].
    Task(TaskError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
            Self::Dimension(e) => e.fmt(f),
            Self::Algorithm(e) => e.fmt(f),
            Self::Task(e) => e.fmt(f),
        }
    }
}

impl Error for MatchError {}

impl MatchError {
    pub(crate) fn input<S: Into<String>>(msg: S) -> Self {
        Self::Input(InputError { msg: msg.into() })
    }

    pub(crate) const fn dimension(expected: usize, actual: usize, side: &'static str) -> Self {
        Self::Dimension(DimensionError {
            expected,
            actual,
            side,
        })
    }

    pub(crate) fn algorithm<S: Into<String>>(msg: S) -> Self {
        Self::Algorithm(AlgorithmError { msg: msg.into() })
    }

    pub(crate) fn task<S: Into<String>>(query_index: usize, msg: S) -> Self {
        Self::Task(TaskError {
            query_index,
            msg: msg.into(),
        })
    }
}

impl From<csv::Error> for MatchError {
    fn from(e: csv::Error) -> Self {
        Self::input(e.to_string())
    }
}

impl From<std::io::Error> for MatchError {
    fn from(e: std::io::Error) -> Self {
        Self::input(e.to_string())
    }
}

/// Error used when the input argument is invalid.
#[derive(Debug)]
pub struct InputError {
    msg: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputError: {}", self.msg)
    }
}

/// Error used when a vector does not agree with the vocabulary it was built from.
#[derive(Debug)]
pub struct DimensionError {
    expected: usize,
    actual: usize,
    side: &'static str,
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DimensionError: {} vector has {} dimensions, but the vocabulary has {}",
            self.side, self.actual, self.expected
        )
    }
}

/// Error used when an algorithm cannot be selected or run with the given setup.
#[derive(Debug)]
pub struct AlgorithmError {
    msg: String,
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AlgorithmError: {}", self.msg)
    }
}

/// Error raised inside the search task of a single query.
#[derive(Debug)]
pub struct TaskError {
    query_index: usize,
    msg: String,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TaskError: query {}: {}", self.query_index, self.msg)
    }
}
