//! `@handle` mentions in task descriptions and comment bodies.
//!
//! Mentions are recorded by the post-commit hook chain; unresolved handles
//! are dropped silently.

pub mod domain;
pub mod ports;
