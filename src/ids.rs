//! UUID-backed identifiers shared by every bounded context.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Internal identifier of a user.
    UserId
);
entity_id!(
    /// Identifier of a workspace tenant.
    WorkspaceId
);
entity_id!(
    /// Identifier of a project.
    ProjectId
);
entity_id!(
    /// Identifier of a board.
    BoardId
);
entity_id!(
    /// Identifier of a board column.
    ColumnId
);
entity_id!(
    /// Identifier of a task.
    TaskId
);
entity_id!(
    /// Identifier of a comment.
    CommentId
);
entity_id!(
    /// Identifier of a mention record.
    MentionId
);
entity_id!(
    /// Identifier of a notification.
    NotificationId
);
entity_id!(
    /// Identifier of a reminder.
    ReminderId
);
entity_id!(
    /// Identifier of an activity log entry.
    ActivityId
);
