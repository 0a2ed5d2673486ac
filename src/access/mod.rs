//! Workspace-scoped authorization.
//!
//! Every resource is owned, directly or transitively, by one workspace:
//!
//! ```text
//! reminder ─┐
//! comment ──┴─> task ─┐
//! column ──> board ───┴─> project ──> workspace
//! ```
//!
//! [`AccessGuard`] walks that chain for a [`Resource`], failing `NotFound`
//! at the first missing link, then asks the [`MembershipResolver`] whether
//! the acting user holds a sufficient role in the owning workspace.

mod guard;
mod resolver;
mod resource;

pub use guard::{AccessGuard, MANAGE_ROLES, OWNER_ROLES, OwnershipStore, WRITE_ROLES};
pub use resolver::MembershipResolver;
pub use resource::{AccessScope, Resource};
