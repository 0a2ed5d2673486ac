//! Domain model for `@handle` mentions.

mod extract;
mod mention;

pub use extract::extract_handles;
pub use mention::{Mention, MentionContext, MentionTarget, ParseMentionContextError};
