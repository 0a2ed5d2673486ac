//! Port contracts for board and column persistence.

pub mod repository;

pub use repository::BoardRepository;
