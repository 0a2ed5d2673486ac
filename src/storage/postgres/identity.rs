//! User table access.

use super::{PostgresStore, expect_affected, models::UserRow, schema::users};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::identity::{
    domain::{Handle, User},
    ports::UserRepository,
};
use crate::ids::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Clears `row`'s handle from every other user still holding it.
fn release_handle(connection: &mut PgConnection, row: &UserRow) -> QueryResult<usize> {
    let Some(handle) = &row.handle else {
        return Ok(0);
    };
    diesel::update(
        users::table
            .filter(users::handle.eq(handle))
            .filter(users::id.ne(row.id)),
    )
    .set((
        users::handle.eq(None::<String>),
        users::updated_at.eq(row.updated_at),
    ))
    .execute(connection)
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn store_user(&self, user: &User) -> RepositoryResult<()> {
        let row = UserRow::from(user);
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                release_handle(tx, &row)?;
                diesel::insert_into(users::table).values(&row).execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<()> {
        let row = UserRow::from(user);
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                release_handle(tx, &row)?;
                let affected = diesel::update(users::table.find(row.id))
                    .set(&row)
                    .execute(tx)?;
                expect_affected(affected, EntityKind::User, row.id)
            })
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.run(move |connection| {
            users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first(connection)
                .optional()?
                .map(UserRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn find_user_by_external_id(&self, external_id: i64) -> RepositoryResult<Option<User>> {
        self.run(move |connection| {
            users::table
                .filter(users::external_id.eq(external_id))
                .select(UserRow::as_select())
                .first(connection)
                .optional()?
                .map(UserRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn find_users_by_handles(&self, handles: &[Handle]) -> RepositoryResult<Vec<User>> {
        let names: Vec<String> = handles
            .iter()
            .map(|handle| handle.as_str().to_owned())
            .collect();
        self.run(move |connection| {
            let rows = users::table
                .filter(users::handle.eq_any(names))
                .select(UserRow::as_select())
                .load(connection)?;
            rows.into_iter().map(UserRow::into_domain).collect()
        })
        .await
    }
}
