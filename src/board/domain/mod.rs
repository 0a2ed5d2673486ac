//! Domain model for boards and their ordered columns.

mod board;
mod error;

pub use board::{Board, BoardColumn, BoardName, ColumnName, PersistedBoardData, PersistedColumnData};
pub use error::BoardDomainError;
