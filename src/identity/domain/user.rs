//! User aggregate and externally supplied identity.

use super::IdentityDomainError;
use crate::ids::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mentionable user handle.
///
/// Handles use the same character class as `@mention` tokens so every stored
/// handle can be referenced from text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    const MAX_LEN: usize = 32;

    /// Creates a validated handle.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidHandle`] when the value is empty,
    /// longer than 32 characters, or contains non-word characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim().trim_start_matches('@');
        let valid = !trimmed.is_empty()
            && trimmed.len() <= Self::MAX_LEN
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if !valid {
            return Err(IdentityDomainError::InvalidHandle(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the handle without the leading `@`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = IdentityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity asserted by the external provider after signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    external_id: i64,
    first_name: String,
    last_name: Option<String>,
    handle: Option<Handle>,
    avatar_url: Option<String>,
    language_code: Option<String>,
}

impl ExternalIdentity {
    /// Creates an identity with the required fields.
    #[must_use]
    pub fn new(external_id: i64, first_name: impl Into<String>) -> Self {
        Self {
            external_id,
            first_name: first_name.into(),
            last_name: None,
            handle: None,
            avatar_url: None,
            language_code: None,
        }
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the handle.
    #[must_use]
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Sets the preferred language code.
    #[must_use]
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    /// Returns the provider-assigned identifier.
    #[must_use]
    pub const fn external_id(&self) -> i64 {
        self.external_id
    }

    /// Returns the asserted handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    /// Returns the asserted first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
}

/// Display-field changes requested by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name; `Some(None)` clears it.
    pub last_name: Option<Option<String>>,
    /// New language code; `Some(None)` clears it.
    pub language_code: Option<Option<String>>,
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    external_id: i64,
    handle: Option<Handle>,
    first_name: String,
    last_name: Option<String>,
    avatar_url: Option<String>,
    language_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Provider-assigned identifier.
    pub external_id: i64,
    /// Persisted handle.
    pub handle: Option<Handle>,
    /// Persisted first name.
    pub first_name: String,
    /// Persisted last name.
    pub last_name: Option<String>,
    /// Persisted avatar URL.
    pub avatar_url: Option<String>,
    /// Persisted language code.
    pub language_code: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Registers a user from a first successful authentication.
    #[must_use]
    pub fn register(identity: ExternalIdentity, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            external_id: identity.external_id,
            handle: identity.handle,
            first_name: identity.first_name,
            last_name: identity.last_name,
            avatar_url: identity.avatar_url,
            language_code: identity.language_code,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            external_id: data.external_id,
            handle: data.handle,
            first_name: data.first_name,
            last_name: data.last_name,
            avatar_url: data.avatar_url,
            language_code: data.language_code,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Refreshes profile fields from a later authentication.
    ///
    /// Fields the provider omits keep their previous value.
    pub fn refresh_from(&mut self, identity: ExternalIdentity, clock: &impl Clock) {
        if !identity.first_name.trim().is_empty() {
            self.first_name = identity.first_name;
        }
        self.last_name = identity.last_name.or_else(|| self.last_name.take());
        self.handle = identity.handle.or_else(|| self.handle.take());
        self.avatar_url = identity.avatar_url.or_else(|| self.avatar_url.take());
        self.language_code = identity
            .language_code
            .or_else(|| self.language_code.take());
        self.updated_at = clock.utc();
    }

    /// Gives up the handle after another user was asserted to hold it.
    pub fn release_handle(&mut self, at: DateTime<Utc>) {
        self.handle = None;
        self.updated_at = at;
    }

    /// Applies user-initiated display changes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyFirstName`] when the new first name
    /// is blank.
    pub fn apply_profile_update(
        &mut self,
        update: ProfileUpdate,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        if let Some(first_name) = update.first_name {
            let trimmed = first_name.trim();
            if trimmed.is_empty() {
                return Err(IdentityDomainError::EmptyFirstName);
            }
            self.first_name = trimmed.to_owned();
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(language_code) = update.language_code {
            self.language_code = language_code;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the provider-assigned identifier.
    #[must_use]
    pub const fn external_id(&self) -> i64 {
        self.external_id
    }

    /// Returns the handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name, if any.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    /// Returns the avatar URL, if any.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the language code, if any.
    #[must_use]
    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
