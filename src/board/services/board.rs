//! Board and column coordinator.

use crate::access::{AccessGuard, OwnershipStore, Resource};
use crate::board::domain::{Board, BoardColumn, BoardName, ColumnName};
use crate::error::{ConflictReason, EntityKind, TrackerError, TrackerResult, UniqueConstraint};
use crate::ids::{BoardId, ColumnId, ProjectId, UserId};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardRequest {
    /// Board name.
    pub name: String,
    /// Seed columns from the workspace template.
    pub seed_columns: bool,
}

impl CreateBoardRequest {
    /// Creates a request for an empty board.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed_columns: false,
        }
    }

    /// Seeds the board with the workspace's default columns.
    #[must_use]
    pub const fn seeded(mut self) -> Self {
        self.seed_columns = true;
        self
    }
}

/// A board with its columns ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardWithColumns {
    /// The board.
    #[serde(flatten)]
    pub board: Board,
    /// Columns, by position.
    pub columns: Vec<BoardColumn>,
}

/// Board and column coordinator.
#[derive(Clone)]
pub struct BoardService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
}

impl<S, C> BoardService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
        }
    }

    /// Creates a board, optionally seeded from the workspace column
    /// template at positions `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Forbidden`] or
    /// [`TrackerError::BadRequest`] for a blank name.
    pub async fn create(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        request: CreateBoardRequest,
    ) -> TrackerResult<BoardWithColumns> {
        let scope = self
            .guard
            .authorize_write(user_id, Resource::Project(project_id))
            .await?;
        let name = BoardName::new(&request.name).map_err(TrackerError::bad_request)?;
        let board = Board::new(project_id, name, &*self.clock);

        let mut columns = Vec::new();
        if request.seed_columns {
            let workspace = self
                .store
                .find_workspace(scope.workspace_id)
                .await?
                .ok_or_else(|| TrackerError::not_found(EntityKind::Workspace, scope.workspace_id))?;
            for (position, name) in (0..).zip(workspace.settings().default_columns.names()) {
                let name = ColumnName::new(name).map_err(TrackerError::bad_request)?;
                columns.push(
                    BoardColumn::new(board.id(), name, position, &*self.clock)
                        .map_err(TrackerError::bad_request)?,
                );
            }
        }

        self.store.store_board(&board, &columns).await?;
        info!(
            board_id = %board.id(),
            %project_id,
            columns = columns.len(),
            "created board"
        );
        Ok(BoardWithColumns { board, columns })
    }

    /// Returns a readable board with its columns.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn get(&self, user_id: UserId, board_id: BoardId) -> TrackerResult<BoardWithColumns> {
        self.guard
            .authorize_read(user_id, Resource::Board(board_id))
            .await?;
        let board = self.load(board_id).await?;
        let columns = self.store.list_columns(board_id).await?;
        Ok(BoardWithColumns { board, columns })
    }

    /// Lists the boards of a readable project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn list(&self, user_id: UserId, project_id: ProjectId) -> TrackerResult<Vec<Board>> {
        self.guard
            .authorize_read(user_id, Resource::Project(project_id))
            .await?;
        Ok(self.store.list_boards(project_id).await?)
    }

    /// Renames a board.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Forbidden`] or
    /// [`TrackerError::BadRequest`] for a blank name.
    pub async fn rename(
        &self,
        user_id: UserId,
        board_id: BoardId,
        name: &str,
    ) -> TrackerResult<Board> {
        self.guard
            .authorize_write(user_id, Resource::Board(board_id))
            .await?;
        let name = BoardName::new(name).map_err(TrackerError::bad_request)?;
        let mut board = self.load(board_id).await?;
        board.rename(name, &*self.clock);
        self.store.update_board(&board).await?;
        Ok(board)
    }

    /// Deletes a board and its columns; its tasks become unfiled.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn delete(&self, user_id: UserId, board_id: BoardId) -> TrackerResult<()> {
        self.guard
            .authorize_write(user_id, Resource::Board(board_id))
            .await?;
        self.store.delete_board(board_id).await?;
        info!(%board_id, %user_id, "deleted board");
        Ok(())
    }

    /// Adds a column. Without an explicit position the column goes last.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Conflict`] when the position is taken and
    /// [`TrackerError::BadRequest`] for a blank name, a negative position, or
    /// when the last column already sits at the highest position.
    pub async fn create_column(
        &self,
        user_id: UserId,
        board_id: BoardId,
        name: &str,
        position: Option<i32>,
    ) -> TrackerResult<BoardColumn> {
        self.guard
            .authorize_write(user_id, Resource::Board(board_id))
            .await?;
        let name = ColumnName::new(name).map_err(TrackerError::bad_request)?;
        let existing = self.store.list_columns(board_id).await?;
        let position = match position {
            Some(position) => {
                ensure_position_free(&existing, position, None)?;
                position
            }
            None => match existing.iter().map(BoardColumn::position).max() {
                None => 0,
                Some(last) => last.checked_add(1).ok_or_else(|| {
                    TrackerError::bad_request("no position left after the last column")
                })?,
            },
        };
        let column = BoardColumn::new(board_id, name, position, &*self.clock)
            .map_err(TrackerError::bad_request)?;
        self.store.store_column(&column).await?;
        Ok(column)
    }

    /// Renames and/or repositions a column.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Conflict`] when the new position is taken.
    pub async fn update_column(
        &self,
        user_id: UserId,
        column_id: ColumnId,
        name: Option<&str>,
        position: Option<i32>,
    ) -> TrackerResult<BoardColumn> {
        self.guard
            .authorize_write(user_id, Resource::Column(column_id))
            .await?;
        let mut column = self.load_column(column_id).await?;
        let name = name
            .map(ColumnName::new)
            .transpose()
            .map_err(TrackerError::bad_request)?;
        if let Some(position) = position {
            let siblings = self.store.list_columns(column.board_id()).await?;
            ensure_position_free(&siblings, position, Some(column_id))?;
        }
        column
            .apply_changes(name, position, &*self.clock)
            .map_err(TrackerError::bad_request)?;
        self.store.update_column(&column).await?;
        Ok(column)
    }

    /// Deletes a column; its tasks become unfiled.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn delete_column(&self, user_id: UserId, column_id: ColumnId) -> TrackerResult<()> {
        self.guard
            .authorize_write(user_id, Resource::Column(column_id))
            .await?;
        self.store.delete_column(column_id).await?;
        Ok(())
    }

    async fn load(&self, board_id: BoardId) -> TrackerResult<Board> {
        self.store
            .find_board(board_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Board, board_id))
    }

    async fn load_column(&self, column_id: ColumnId) -> TrackerResult<BoardColumn> {
        self.store
            .find_column(column_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Column, column_id))
    }
}

fn ensure_position_free(
    columns: &[BoardColumn],
    position: i32,
    except: Option<ColumnId>,
) -> TrackerResult<()> {
    let taken = columns
        .iter()
        .any(|column| column.position() == position && Some(column.id()) != except);
    if taken {
        return Err(TrackerError::Conflict(ConflictReason::Unique(
            UniqueConstraint::ColumnPosition,
        )));
    }
    Ok(())
}
