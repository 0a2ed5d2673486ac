//! Port contracts for mention persistence.

pub mod repository;

pub use repository::MentionRepository;
