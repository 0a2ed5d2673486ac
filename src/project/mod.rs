//! Projects group boards and tasks inside a workspace.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
