//! Service layer for authentication and profile management.

mod identity;

pub use identity::IdentityService;
