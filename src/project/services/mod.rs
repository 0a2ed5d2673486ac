//! Project orchestration services.

mod project;

pub use project::{CreateProjectRequest, ProjectService};
