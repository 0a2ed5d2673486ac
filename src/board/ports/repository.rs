//! Repository port for boards and columns.

use crate::board::domain::{Board, BoardColumn};
use crate::error::RepositoryResult;
use crate::ids::{BoardId, ColumnId, ProjectId};
use async_trait::async_trait;

/// Board and column persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Stores a new board with its initial columns in one write.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Duplicate`] with
    /// [`crate::error::UniqueConstraint::ColumnPosition`] when two initial
    /// columns share a position.
    async fn store_board(&self, board: &Board, columns: &[BoardColumn]) -> RepositoryResult<()>;

    /// Persists changes to an existing board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the board
    /// does not exist.
    async fn update_board(&self, board: &Board) -> RepositoryResult<()>;

    /// Deletes a board and its columns; tasks filed there become unfiled.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the board
    /// does not exist.
    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()>;

    /// Finds a board by identifier.
    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>>;

    /// Lists the boards of a project in creation order.
    async fn list_boards(&self, project_id: ProjectId) -> RepositoryResult<Vec<Board>>;

    /// Stores a new column.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Duplicate`] with
    /// [`crate::error::UniqueConstraint::ColumnPosition`] when the position
    /// is taken.
    async fn store_column(&self, column: &BoardColumn) -> RepositoryResult<()>;

    /// Persists changes to an existing column.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the column does not exist or `Duplicate` when
    /// the new position is taken.
    async fn update_column(&self, column: &BoardColumn) -> RepositoryResult<()>;

    /// Deletes a column; tasks filed there become unfiled.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the column
    /// does not exist.
    async fn delete_column(&self, id: ColumnId) -> RepositoryResult<()>;

    /// Finds a column by identifier.
    async fn find_column(&self, id: ColumnId) -> RepositoryResult<Option<BoardColumn>>;

    /// Lists the columns of a board ordered by position.
    async fn list_columns(&self, board_id: BoardId) -> RepositoryResult<Vec<BoardColumn>>;
}
