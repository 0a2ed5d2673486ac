//! Board and column aggregates.

use super::BoardDomainError;
use crate::ids::{BoardId, ColumnId, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated board name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardName(String);

impl BoardName {
    /// Creates a validated board name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyBoardName`] for a blank name.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BoardDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyBoardName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a validated column name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] for a blank name.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BoardDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Board aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    project_id: ProjectId,
    name: BoardName,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted identifier.
    pub id: BoardId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: BoardName,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board inside `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, name: BoardName, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: BoardId::new(),
            project_id,
            name,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Renames the board.
    pub fn rename(&mut self, name: BoardName, clock: &impl Clock) {
        self.name = name;
        self.updated_at = clock.utc();
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the board name.
    #[must_use]
    pub const fn name(&self) -> &BoardName {
        &self.name
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

/// Ordered column inside a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    id: ColumnId,
    board_id: BoardId,
    name: ColumnName,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted identifier.
    pub id: ColumnId,
    /// Owning board.
    pub board_id: BoardId,
    /// Persisted name.
    pub name: ColumnName,
    /// Position within the board.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BoardColumn {
    /// Creates a column at `position` inside `board_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NegativePosition`] for negative positions.
    pub fn new(
        board_id: BoardId,
        name: ColumnName,
        position: i32,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        if position < 0 {
            return Err(BoardDomainError::NegativePosition(position));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ColumnId::new(),
            board_id,
            name,
            position,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            name: data.name,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Applies a rename and/or reposition.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NegativePosition`] for negative positions;
    /// the column is left unchanged.
    pub fn apply_changes(
        &mut self,
        name: Option<ColumnName>,
        position: Option<i32>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if let Some(position) = position {
            if position < 0 {
                return Err(BoardDomainError::NegativePosition(position));
            }
            self.position = position;
        }
        if let Some(name) = name {
            self.name = name;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
    }

    /// Returns the position within the board.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
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
