//! Threaded comments on tasks.
//!
//! A reply's parent must belong to the same task, and only the author may
//! edit or delete a comment whatever their workspace role.

pub mod domain;
pub mod ports;
pub mod services;
