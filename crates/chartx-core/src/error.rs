use thiserror::Error;

use crate::{EntityId, TradingDate};

/// Field and record level validation errors exposed by `chartx-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("entity id cannot be empty")]
    EmptyEntityId,
    #[error("entity id length {len} exceeds max {max}")]
    EntityIdTooLong { len: usize, max: usize },
    #[error("entity id contains invalid character {ch:?} at index {index}")]
    InvalidEntityIdChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date {date} appears more than once")]
    DuplicateDate { date: TradingDate },

    #[error("field '{field}' could not be parsed as a number: '{value}'")]
    UnparsableField { field: &'static str, value: String },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must not be below low")]
    OpenCloseBelowLow,
    #[error("bar open/close must not be above high")]
    OpenCloseAboveHigh,

    #[error("invalid timespan '{value}', expected one of all, 3y, 1y, 3m, 1m, 1w")]
    InvalidTimespan { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bar of `entity` violated the OHLC invariants; the whole entity is rejected.
    #[error("data integrity violation in '{entity}': {source}")]
    DataIntegrity {
        entity: EntityId,
        #[source]
        source: ValidationError,
    },

    /// Correlation inputs of unequal length. Indicates a bug in the caller's join.
    #[error("correlation inputs differ in length: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("unknown entity '{id}'")]
    UnknownEntity { id: EntityId },

    #[error("entity '{id}' is already loaded")]
    DuplicateEntity { id: EntityId },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for errors that can only be produced by a bug inside the engine.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. })
    }
}
