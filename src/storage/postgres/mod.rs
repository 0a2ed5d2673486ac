//! `PostgreSQL` storage backend built on Diesel and an r2d2 pool.
//!
//! Every port is implemented on [`PostgresStore`]. Diesel is synchronous, so
//! each call checks out a pooled connection inside
//! [`tokio::task::spawn_blocking`]. Writes that must land together (a task
//! and its activity row, a workspace and its owner membership, a board and
//! its seeded columns) share one database transaction.

mod board;
mod comment;
mod identity;
mod mention;
pub mod models;
mod notification;
mod project;
mod reminder;
pub mod schema;
mod task;
mod workspace;

use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use diesel::connection::SimpleConnection;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use schema::{projects, workspace_members};
use std::fmt;
use uuid::Uuid;

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied by [`PostgresStore::apply_migrations`].
const SCHEMA_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_tracker_tables/up.sql");

/// `PostgreSQL`-backed implementation of every storage port.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` with at most `max_size` connections.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when the pool cannot open its
    /// initial connections.
    pub fn connect(database_url: &str, max_size: u32) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(RepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Creates any missing tables and indexes.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when the schema script fails.
    pub async fn apply_migrations(&self) -> RepositoryResult<()> {
        self.run(|connection| {
            connection
                .batch_execute(SCHEMA_SQL)
                .map_err(RepositoryError::persistence)
        })
        .await
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

/// Maps a unique index name onto the guarantee it enforces.
fn unique_constraint(info: &dyn DatabaseErrorInformation) -> UniqueConstraint {
    match info.constraint_name() {
        Some("workspace_members_pkey") => UniqueConstraint::MembershipPair,
        Some("idx_workspaces_invite_code_unique") => UniqueConstraint::InviteCode,
        Some("idx_board_columns_position_unique") => UniqueConstraint::ColumnPosition,
        Some("idx_users_external_id_unique") => UniqueConstraint::ExternalId,
        Some("idx_users_handle_unique") => UniqueConstraint::Handle,
        _ => UniqueConstraint::PrimaryKey,
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                Self::Duplicate(unique_constraint(info.as_ref()))
            }
            other => Self::persistence(other),
        }
    }
}

/// Returns a mapper that reports a foreign-key violation as a missing parent.
fn missing_parent(
    kind: EntityKind,
    id: impl fmt::Display,
) -> impl FnOnce(DieselError) -> RepositoryError {
    let id = id.to_string();
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RepositoryError::NotFound(kind, id)
        }
        other => RepositoryError::from(other),
    }
}

/// Projects in every workspace `user_id` belongs to.
fn visible_projects(user_id: Uuid) -> projects::BoxedQuery<'static, Pg, diesel::sql_types::Uuid> {
    let member_of = workspace_members::table
        .filter(workspace_members::user_id.eq(user_id))
        .select(workspace_members::workspace_id);
    projects::table
        .filter(projects::workspace_id.eq_any(member_of))
        .select(projects::id)
        .into_boxed()
}

/// Fails with `NotFound` when an update or delete touched no rows.
fn expect_affected(
    affected: usize,
    kind: EntityKind,
    id: impl fmt::Display,
) -> RepositoryResult<()> {
    if affected == 0 {
        return Err(RepositoryError::not_found(kind, id));
    }
    Ok(())
}
