//! Workspace aggregate, invite codes, and workspace settings.

use super::WorkspaceDomainError;
use crate::ids::{UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated workspace display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceName(String);

impl WorkspaceName {
    const MAX_LEN: usize = 255;

    /// Creates a validated workspace name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyName`] for a blank name or
    /// [`WorkspaceDomainError::NameTooLong`] past 255 characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, WorkspaceDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WorkspaceDomainError::EmptyName);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(WorkspaceDomainError::NameTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unguessable join token: four random bytes rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    const BYTES: usize = 4;

    /// Generates a fresh random invite code.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; Self::BYTES] = rand::thread_rng().r#gen();
        Self(hex::encode(bytes))
    }

    /// Parses a user-supplied invite code.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidInviteCode`] unless the input is
    /// eight hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self, WorkspaceDomainError> {
        let normalized = value.trim().to_ascii_lowercase();
        let valid = normalized.len() == Self::BYTES * 2
            && normalized.chars().all(|ch| ch.is_ascii_hexdigit());
        if !valid {
            return Err(WorkspaceDomainError::InvalidInviteCode(value.to_owned()));
        }
        Ok(Self(normalized))
    }

    /// Returns the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column names seeded into new boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnTemplate(Vec<String>);

impl ColumnTemplate {
    /// Creates a validated template.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyColumnName`] when an entry is blank.
    pub fn new(names: impl IntoIterator<Item = String>) -> Result<Self, WorkspaceDomainError> {
        names
            .into_iter()
            .map(|name| {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    Err(WorkspaceDomainError::EmptyColumnName)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Returns the column names in board order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Default for ColumnTemplate {
    fn default() -> Self {
        Self(vec![
            "To Do".to_owned(),
            "In Progress".to_owned(),
            "Done".to_owned(),
        ])
    }
}

/// ISO weekday numbers (1 = Monday) the team works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingDays(Vec<i16>);

impl WorkingDays {
    /// Creates a validated, sorted and deduplicated set of working days.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidWorkingDay`] for values outside
    /// `1..=7`.
    pub fn new(days: impl IntoIterator<Item = i16>) -> Result<Self, WorkspaceDomainError> {
        let mut collected = Vec::new();
        for day in days {
            if !(1..=7).contains(&day) {
                return Err(WorkspaceDomainError::InvalidWorkingDay(day));
            }
            collected.push(day);
        }
        collected.sort_unstable();
        collected.dedup();
        Ok(Self(collected))
    }

    /// Returns the weekday numbers in ascending order.
    #[must_use]
    pub fn days(&self) -> &[i16] {
        &self.0
    }
}

impl Default for WorkingDays {
    fn default() -> Self {
        Self(vec![1, 2, 3, 4, 5])
    }
}

/// Team preferences stored on the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Free-form description.
    pub description: Option<String>,
    /// Columns seeded into new boards.
    pub default_columns: ColumnTemplate,
    /// Working weekdays.
    pub working_days: WorkingDays,
    /// Minutes before a due date that reminders default to.
    pub default_reminder_offset_minutes: i32,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            description: None,
            default_columns: ColumnTemplate::default(),
            working_days: WorkingDays::default(),
            default_reminder_offset_minutes: 30,
        }
    }
}

impl WorkspaceSettings {
    /// Validates the reminder offset.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NegativeReminderOffset`] when negative.
    pub const fn validate(&self) -> Result<(), WorkspaceDomainError> {
        if self.default_reminder_offset_minutes < 0 {
            return Err(WorkspaceDomainError::NegativeReminderOffset(
                self.default_reminder_offset_minutes,
            ));
        }
        Ok(())
    }
}

/// Field-wise changes to a workspace. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceChanges {
    /// New name.
    pub name: Option<WorkspaceName>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New column template.
    pub default_columns: Option<ColumnTemplate>,
    /// New working days.
    pub working_days: Option<WorkingDays>,
    /// New reminder offset.
    pub default_reminder_offset_minutes: Option<i32>,
}

/// Workspace aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: WorkspaceName,
    owner_id: UserId,
    invite_code: InviteCode,
    #[serde(flatten)]
    settings: WorkspaceSettings,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkspaceData {
    /// Persisted identifier.
    pub id: WorkspaceId,
    /// Persisted name.
    pub name: WorkspaceName,
    /// Creating user.
    pub owner_id: UserId,
    /// Current invite code.
    pub invite_code: InviteCode,
    /// Persisted settings.
    pub settings: WorkspaceSettings,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a workspace owned by `owner_id` with a fresh invite code.
    #[must_use]
    pub fn new(
        name: WorkspaceName,
        owner_id: UserId,
        settings: WorkspaceSettings,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkspaceId::new(),
            name,
            owner_id,
            invite_code: InviteCode::generate(),
            settings,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a workspace from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkspaceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            owner_id: data.owner_id,
            invite_code: data.invite_code,
            settings: data.settings,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Applies field-wise changes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NegativeReminderOffset`] when the new
    /// offset is negative; the workspace is left unchanged.
    pub fn apply_changes(
        &mut self,
        changes: WorkspaceChanges,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        let mut settings = self.settings.clone();
        if let Some(description) = changes.description {
            settings.description = description;
        }
        if let Some(columns) = changes.default_columns {
            settings.default_columns = columns;
        }
        if let Some(days) = changes.working_days {
            settings.working_days = days;
        }
        if let Some(offset) = changes.default_reminder_offset_minutes {
            settings.default_reminder_offset_minutes = offset;
        }
        settings.validate()?;

        if let Some(name) = changes.name {
            self.name = name;
        }
        self.settings = settings;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Replaces the invite code; the previous code stops working at once.
    pub fn regenerate_invite_code(&mut self, clock: &impl Clock) {
        self.invite_code = InviteCode::generate();
        self.updated_at = clock.utc();
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &WorkspaceName {
        &self.name
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the current invite code.
    #[must_use]
    pub const fn invite_code(&self) -> &InviteCode {
        &self.invite_code
    }

    /// Returns the workspace settings.
    #[must_use]
    pub const fn settings(&self) -> &WorkspaceSettings {
        &self.settings
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
