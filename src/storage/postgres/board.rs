//! Board and column tables.

use super::{
    PostgresStore, expect_affected, missing_parent,
    models::{BoardRow, ColumnRow},
    schema::{board_columns, boards},
};
use crate::board::{
    domain::{Board, BoardColumn},
    ports::BoardRepository,
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::{BoardId, ColumnId, ProjectId};
use async_trait::async_trait;
use diesel::prelude::*;

#[async_trait]
impl BoardRepository for PostgresStore {
    async fn store_board(&self, board: &Board, columns: &[BoardColumn]) -> RepositoryResult<()> {
        let board_row = BoardRow::from(board);
        let column_rows: Vec<ColumnRow> = columns.iter().map(ColumnRow::from).collect();
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                diesel::insert_into(boards::table)
                    .values(&board_row)
                    .execute(tx)
                    .map_err(missing_parent(EntityKind::Project, board_row.project_id))?;
                if !column_rows.is_empty() {
                    diesel::insert_into(board_columns::table)
                        .values(&column_rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn update_board(&self, board: &Board) -> RepositoryResult<()> {
        let row = BoardRow::from(board);
        self.run(move |connection| {
            let affected = diesel::update(boards::table.find(row.id))
                .set(&row)
                .execute(connection)?;
            expect_affected(affected, EntityKind::Board, row.id)
        })
        .await
    }

    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::delete(boards::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Board, id)
        })
        .await
    }

    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>> {
        self.run(move |connection| {
            boards::table
                .find(id.into_inner())
                .select(BoardRow::as_select())
                .first(connection)
                .optional()?
                .map(BoardRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_boards(&self, project_id: ProjectId) -> RepositoryResult<Vec<Board>> {
        self.run(move |connection| {
            let rows = boards::table
                .filter(boards::project_id.eq(project_id.into_inner()))
                .order(boards::created_at.asc())
                .select(BoardRow::as_select())
                .load(connection)?;
            rows.into_iter().map(BoardRow::into_domain).collect()
        })
        .await
    }

    async fn store_column(&self, column: &BoardColumn) -> RepositoryResult<()> {
        let row = ColumnRow::from(column);
        self.run(move |connection| {
            diesel::insert_into(board_columns::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(EntityKind::Board, row.board_id))?;
            Ok(())
        })
        .await
    }

    async fn update_column(&self, column: &BoardColumn) -> RepositoryResult<()> {
        let row = ColumnRow::from(column);
        self.run(move |connection| {
            let affected = diesel::update(board_columns::table.find(row.id))
                .set(&row)
                .execute(connection)?;
            expect_affected(affected, EntityKind::Column, row.id)
        })
        .await
    }

    async fn delete_column(&self, id: ColumnId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected =
                diesel::delete(board_columns::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Column, id)
        })
        .await
    }

    async fn find_column(&self, id: ColumnId) -> RepositoryResult<Option<BoardColumn>> {
        self.run(move |connection| {
            board_columns::table
                .find(id.into_inner())
                .select(ColumnRow::as_select())
                .first(connection)
                .optional()?
                .map(ColumnRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_columns(&self, board_id: BoardId) -> RepositoryResult<Vec<BoardColumn>> {
        self.run(move |connection| {
            let rows = board_columns::table
                .filter(board_columns::board_id.eq(board_id.into_inner()))
                .order(board_columns::position.asc())
                .select(ColumnRow::as_select())
                .load(connection)?;
            rows.into_iter().map(ColumnRow::into_domain).collect()
        })
        .await
    }
}
