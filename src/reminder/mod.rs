//! Task reminders and the periodic sweep that fires them.
//!
//! The sweep is safe to run concurrently with itself: each firing is a
//! conditional `PENDING -> SENT` update, so overlapping sweeps fire every
//! reminder exactly once.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
