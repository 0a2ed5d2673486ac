//! Workspaces: the tenant boundary of the tracker.
//!
//! A workspace owns projects and members. Its creator becomes the `OWNER`
//! member; others join through an invite code or are added by an admin.

pub mod domain;
pub mod ports;
pub mod services;
