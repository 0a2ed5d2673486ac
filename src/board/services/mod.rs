//! Board and column orchestration services.

mod board;

pub use board::{BoardService, BoardWithColumns, CreateBoardRequest};
