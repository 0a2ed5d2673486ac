//! Error types for workspace validation and parsing.

use thiserror::Error;

/// Errors returned while constructing workspace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyName,

    /// The workspace name exceeds the storage limit.
    #[error("workspace name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The invite code is not eight hexadecimal characters.
    #[error("invalid invite code '{0}'")]
    InvalidInviteCode(String),

    /// A column template entry is blank.
    #[error("default column names must not be empty")]
    EmptyColumnName,

    /// A working day is outside ISO weekday numbering.
    #[error("invalid working day {0}, expected 1 (Monday) to 7 (Sunday)")]
    InvalidWorkingDay(i16),

    /// The reminder offset is negative.
    #[error("default reminder offset must not be negative, got {0}")]
    NegativeReminderOffset(i32),
}

/// Error returned while parsing workspace roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workspace role: {0}")]
pub struct ParseWorkspaceRoleError(pub String);
