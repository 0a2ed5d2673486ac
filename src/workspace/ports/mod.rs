//! Port contracts for workspace and membership persistence.

pub mod repository;

pub use repository::{MembershipRepository, WorkspaceRepository};
