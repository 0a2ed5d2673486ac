//! Boards and their ordered columns.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
