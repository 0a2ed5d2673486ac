//! Domain model for users and externally verified identities.

mod error;
mod init_data;
mod user;

pub use error::{IdentityDomainError, InitDataError};
pub use init_data::InitDataVerifier;
pub use user::{ExternalIdentity, Handle, PersistedUserData, ProfileUpdate, User};
