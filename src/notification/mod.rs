//! Per-user notifications raised by post-commit hooks and the reminder sweep.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
