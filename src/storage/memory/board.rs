//! In-memory board and column tables.

use super::{InMemoryStore, replace};
use crate::board::{
    domain::{Board, BoardColumn},
    ports::BoardRepository,
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{BoardId, ColumnId, ProjectId};
use async_trait::async_trait;

fn position_taken(columns: &[BoardColumn], column: &BoardColumn) -> bool {
    columns.iter().any(|other| {
        other.id() != column.id()
            && other.board_id() == column.board_id()
            && other.position() == column.position()
    })
}

#[async_trait]
impl BoardRepository for InMemoryStore {
    async fn store_board(&self, board: &Board, columns: &[BoardColumn]) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_project(board.project_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Project,
                board.project_id(),
            ));
        }
        if state.has_board(board.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        for (index, column) in columns.iter().enumerate() {
            let earlier = columns.get(..index).unwrap_or_default();
            if position_taken(earlier, column) {
                return Err(RepositoryError::Duplicate(UniqueConstraint::ColumnPosition));
            }
        }
        state.boards.push(board.clone());
        state.columns.extend_from_slice(columns);
        Ok(())
    }

    async fn update_board(&self, board: &Board) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !replace(&mut state.boards, board, |other| other.id() == board.id()) {
            return Err(RepositoryError::not_found(EntityKind::Board, board.id()));
        }
        Ok(())
    }

    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_board(id) {
            return Err(RepositoryError::not_found(EntityKind::Board, id));
        }
        state.remove_board(id);
        Ok(())
    }

    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>> {
        let state = self.read()?;
        Ok(state.boards.iter().find(|board| board.id() == id).cloned())
    }

    async fn list_boards(&self, project_id: ProjectId) -> RepositoryResult<Vec<Board>> {
        let state = self.read()?;
        Ok(state
            .boards
            .iter()
            .filter(|board| board.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn store_column(&self, column: &BoardColumn) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_board(column.board_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Board,
                column.board_id(),
            ));
        }
        if position_taken(&state.columns, column) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::ColumnPosition));
        }
        state.columns.push(column.clone());
        Ok(())
    }

    async fn update_column(&self, column: &BoardColumn) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if position_taken(&state.columns, column) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::ColumnPosition));
        }
        if !replace(&mut state.columns, column, |other| other.id() == column.id()) {
            return Err(RepositoryError::not_found(EntityKind::Column, column.id()));
        }
        Ok(())
    }

    async fn delete_column(&self, id: ColumnId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.columns.iter().any(|column| column.id() == id) {
            return Err(RepositoryError::not_found(EntityKind::Column, id));
        }
        state.remove_column(id);
        Ok(())
    }

    async fn find_column(&self, id: ColumnId) -> RepositoryResult<Option<BoardColumn>> {
        let state = self.read()?;
        Ok(state.columns.iter().find(|column| column.id() == id).cloned())
    }

    async fn list_columns(&self, board_id: BoardId) -> RepositoryResult<Vec<BoardColumn>> {
        let state = self.read()?;
        let mut columns: Vec<BoardColumn> = state
            .columns
            .iter()
            .filter(|column| column.board_id() == board_id)
            .cloned()
            .collect();
        columns.sort_by_key(BoardColumn::position);
        Ok(columns)
    }
}
