//! Tasks, their audit trail, and date-based views.
//!
//! Task writes run through [`services::TaskService`], which checks access,
//! validates cross-entity references (column in the same project, assignee
//! in the same workspace), writes the task together with its activity entry,
//! and finally hands the committed change to the post-commit hook chain.

pub mod domain;
pub mod ports;
pub mod services;
