//! Storage backends implementing every repository port.
//!
//! - [`memory::InMemoryStore`]: one lock over all tables; used by tests.
//! - [`postgres::PostgresStore`]: Diesel over an r2d2 connection pool.

pub mod memory;
pub mod postgres;

use crate::access::OwnershipStore;
use crate::identity::ports::UserRepository;
use crate::mention::ports::MentionRepository;
use crate::notification::ports::NotificationRepository;

/// Every port the tracker services need, implemented by one backend.
pub trait TrackerStore:
    OwnershipStore + UserRepository + MentionRepository + NotificationRepository + 'static
{
}

impl<T> TrackerStore for T where
    T: OwnershipStore + UserRepository + MentionRepository + NotificationRepository + 'static
{
}
