//! Post-commit side effects.
//!
//! Services commit their primary write first and then hand a
//! [`CommitEvent`] to the [`HookChain`]. Hooks run in order; a failing hook
//! is logged and skipped, and never rolls back or fails the primary write.

mod assignment;
mod chain;
mod mention;

pub use assignment::AssignmentHook;
pub use chain::{CommitEvent, HookChain, PostCommitHook};
pub use mention::MentionHook;

#[cfg(test)]
mod tests;
