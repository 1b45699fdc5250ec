//! Errors raised by the engine.
//!
//! Every failure is scoped to the query or load that triggered it; nothing
//! here is retried and no partial result is ever returned alongside an error.

use thiserror::Error;

/// Top-level error surfaced to callers of the orchestrator and the store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SalesError {
    #[error("unknown region `{0}`")]
    InvalidRegion(String),
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("malformed record at row {row}: `{field}` {problem}")]
    MalformedInput {
        row: usize,
        field: &'static str,
        problem: FieldProblem,
    },
}

/// Query parameters that cannot be answered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("year range inverted (min {min} > max {max})")]
    YearRangeInverted { min: i32, max: i32 },
    #[error("no genres selected")]
    EmptyGenreSelection,
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

/// What was wrong with a required record field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    #[error("is missing")]
    Missing,
    #[error("must be a finite, non-negative number")]
    NotASalesFigure,
}
