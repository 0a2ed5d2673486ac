//! Error types for project validation and parsing.

use thiserror::Error;

/// Errors returned while constructing project values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,
}

/// Error returned while parsing project visibility from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project visibility: {0}")]
pub struct ParseProjectVisibilityError(pub String);
