//! Port contracts for task and activity persistence.

pub mod repository;

pub use repository::TaskRepository;
