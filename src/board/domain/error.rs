//! Error types for board validation.

use thiserror::Error;

/// Errors returned while constructing board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyBoardName,

    /// The column name is empty after trimming.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// Column positions start at zero.
    #[error("column position must not be negative, got {0}")]
    NegativePosition(i32),
}
