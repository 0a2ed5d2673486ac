//! Shared error taxonomy for storage ports and application services.
//!
//! Storage adapters report [`RepositoryError`]; services report
//! [`TrackerError`], whose [`ErrorKind`] is the stable classification the
//! HTTP layer maps onto status codes.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::workspace::domain::WorkspaceRole;

/// Entity families that can be referenced by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An authenticated user.
    User,
    /// A workspace tenant.
    Workspace,
    /// A workspace membership.
    Membership,
    /// A project inside a workspace.
    Project,
    /// A board inside a project.
    Board,
    /// A board column.
    Column,
    /// A task.
    Task,
    /// A task comment.
    Comment,
    /// A mention record.
    Mention,
    /// A user notification.
    Notification,
    /// A task reminder.
    Reminder,
    /// A workspace invite code.
    InviteCode,
}

impl EntityKind {
    /// Returns the lowercase entity name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Workspace => "workspace",
            Self::Membership => "membership",
            Self::Project => "project",
            Self::Board => "board",
            Self::Column => "column",
            Self::Task => "task",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::Notification => "notification",
            Self::Reminder => "reminder",
            Self::InviteCode => "invite code",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage-level uniqueness guarantees.
///
/// Each variant names one unique index in the relational schema. Adapters
/// translate constraint violations into [`RepositoryError::Duplicate`] so a
/// race lost at write time looks the same as a failed pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueConstraint {
    /// One membership per `(workspace, user)`.
    MembershipPair,
    /// Invite codes are globally unique.
    InviteCode,
    /// One column per `(board, position)`.
    ColumnPosition,
    /// One user per external identity.
    ExternalId,
    /// Handles are unique when present.
    Handle,
    /// Primary key collision.
    PrimaryKey,
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MembershipPair => "user is already a member of this workspace",
            Self::InviteCode => "invite code is already in use",
            Self::ColumnPosition => "a column with this position already exists in the board",
            Self::ExternalId => "external identity is already registered",
            Self::Handle => "handle is already taken",
            Self::PrimaryKey => "identifier already exists",
        };
        f.write_str(text)
    }
}

/// Result type for storage port operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors returned by storage adapters.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate entry: {0}")]
    Duplicate(UniqueConstraint),

    /// The row addressed by an update or delete does not exist.
    #[error("{0} not found: {1}")]
    NotFound(EntityKind, String),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Builds a not-found error for the given entity and identifier.
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound(kind, id.to_string())
    }
}

/// Stable classification of service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// The caller is authenticated but not authorized.
    Forbidden,
    /// Malformed input or a structural violation.
    BadRequest,
    /// A uniqueness or state conflict.
    Conflict,
    /// Storage or infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the snake-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::BadRequest => "bad_request",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

/// Reasons an authenticated caller is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// The caller holds no membership in the owning workspace.
    NotAMember,
    /// The caller's role is outside the allowed set.
    InsufficientRole {
        /// Role the caller holds.
        actual: WorkspaceRole,
    },
    /// Only the comment author may change the comment.
    NotCommentAuthor,
    /// The resource belongs to another user.
    NotResourceOwner,
    /// The workspace owner's membership cannot be removed or demoted.
    OwnerMembershipImmutable,
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAMember => f.write_str("you do not have access to this workspace"),
            Self::InsufficientRole { actual } => write!(
                f,
                "role '{}' does not permit this action",
                actual.as_str()
            ),
            Self::NotCommentAuthor => f.write_str("you can only change your own comments"),
            Self::NotResourceOwner => f.write_str("this resource belongs to another user"),
            Self::OwnerMembershipImmutable => {
                f.write_str("the workspace owner's membership cannot be changed")
            }
        }
    }
}

/// Reasons a write conflicts with existing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// A storage uniqueness guarantee was violated.
    Unique(UniqueConstraint),
    /// The reminder already left the pending state.
    ReminderNotPending,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique(constraint) => constraint.fmt(f),
            Self::ReminderNotPending => f.write_str("reminder is no longer pending"),
        }
    }
}

/// Service-level error returned by every coordinator operation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity family.
        kind: EntityKind,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// The caller is not allowed to perform the action.
    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    /// Malformed input or a cross-entity structural violation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A uniqueness or state conflict.
    #[error("conflict: {0}")]
    Conflict(ConflictReason),

    /// Storage failure that is not attributable to the caller.
    #[error(transparent)]
    Storage(RepositoryError),
}

impl TrackerError {
    /// Builds a not-found error.
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Builds a bad-request error from any displayable reason.
    pub fn bad_request(reason: impl fmt::Display) -> Self {
        Self::BadRequest(reason.to_string())
    }

    /// Returns the stable error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for TrackerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(constraint) => {
                Self::Conflict(ConflictReason::Unique(constraint))
            }
            RepositoryError::NotFound(kind, id) => Self::NotFound { kind, id },
            other => Self::Storage(other),
        }
    }
}

/// Result type for service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
