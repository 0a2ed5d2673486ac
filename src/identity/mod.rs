//! User identity for the tracker.
//!
//! Users are created on their first successful external authentication and
//! refreshed on every later one. Signature checking of Telegram init data
//! lives in [`domain::InitDataVerifier`]; services receive an already
//! verified [`domain::ExternalIdentity`].

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
