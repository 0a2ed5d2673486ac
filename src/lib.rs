//! Minitracker: workspace-scoped task tracking for a Telegram Mini App.
//!
//! Users authenticate with signed Mini App init data, collaborate inside
//! workspaces, and organise work as projects, boards, columns and tasks with
//! threaded comments, `@handle` mentions, notifications and reminders.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: entities and value objects with no infrastructure
//!   dependencies
//! - **Ports**: repository traits the services depend on
//! - **Services**: coordinators that authorize through [`access`], commit the
//!   primary write, then dispatch [`hooks`]
//! - **Adapters**: [`storage`] backends and the [`http`] surface
//!
//! Every resource belongs, directly or transitively, to exactly one
//! workspace, and every read or write is authorized against the caller's
//! membership in that workspace.

pub mod access;
pub mod board;
pub mod comment;
pub mod config;
pub mod error;
pub mod hooks;
pub mod http;
pub mod identity;
pub mod ids;
pub mod mention;
pub mod notification;
pub mod project;
pub mod reminder;
pub mod storage;
pub mod task;
pub mod workspace;
