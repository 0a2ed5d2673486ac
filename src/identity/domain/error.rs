//! Error types for identity validation and init-data verification.

use thiserror::Error;

/// Errors returned while constructing identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The handle contains characters outside `[A-Za-z0-9_]` or has the wrong length.
    #[error("invalid handle '{0}', expected 1-32 word characters")]
    InvalidHandle(String),

    /// The first name is empty after trimming.
    #[error("first name must not be empty")]
    EmptyFirstName,
}

/// Errors returned while verifying signed init data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitDataError {
    /// The payload carries no `hash` parameter.
    #[error("init data is missing the hash parameter")]
    MissingHash,

    /// A required parameter is absent.
    #[error("init data is missing the '{0}' parameter")]
    MissingField(&'static str),

    /// A parameter could not be percent-decoded.
    #[error("init data is not valid form encoding")]
    InvalidEncoding,

    /// The signature does not match the payload.
    #[error("init data signature mismatch")]
    SignatureMismatch,

    /// `auth_date` is older than the accepted window.
    #[error("init data expired")]
    Expired,

    /// The embedded user object is malformed.
    #[error("malformed init data user: {0}")]
    MalformedUser(String),
}
