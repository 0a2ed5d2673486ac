//! Domain model for threaded task comments.

mod comment;

pub use comment::{Comment, CommentBody, CommentDomainError, PersistedCommentData};
