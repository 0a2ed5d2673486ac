//! Notification table access.

use super::{
    PostgresStore, expect_affected, missing_parent, models::NotificationRow,
    schema::notifications,
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::{NotificationId, UserId};
use crate::notification::{domain::Notification, ports::NotificationRepository};
use async_trait::async_trait;
use diesel::prelude::*;

#[async_trait]
impl NotificationRepository for PostgresStore {
    async fn store_notification(&self, notification: &Notification) -> RepositoryResult<()> {
        let row = NotificationRow::from(notification);
        let parent = row
            .task_id
            .map_or_else(|| row.user_id.to_string(), |task_id| task_id.to_string());
        let kind = if row.task_id.is_some() {
            EntityKind::Task
        } else {
            EntityKind::User
        };
        self.run(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(kind, parent))?;
            Ok(())
        })
        .await
    }

    async fn find_notification(
        &self,
        id: NotificationId,
    ) -> RepositoryResult<Option<Notification>> {
        self.run(move |connection| {
            notifications::table
                .find(id.into_inner())
                .select(NotificationRow::as_select())
                .first(connection)
                .optional()?
                .map(NotificationRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn mark_notification_read(&self, id: NotificationId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::update(notifications::table.find(id.into_inner()))
                .set(notifications::is_read.eq(true))
                .execute(connection)?;
            expect_affected(affected, EntityKind::Notification, id)
        })
        .await
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> RepositoryResult<u64> {
        self.run(move |connection| {
            let affected = diesel::update(
                notifications::table
                    .filter(notifications::user_id.eq(user_id.into_inner()))
                    .filter(notifications::is_read.eq(false)),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)?;
            u64::try_from(affected).map_err(RepositoryError::persistence)
        })
        .await
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> RepositoryResult<Vec<Notification>> {
        self.run(move |connection| {
            let mut query = notifications::table
                .filter(notifications::user_id.eq(user_id.into_inner()))
                .into_boxed();
            if unread_only {
                query = query.filter(notifications::is_read.eq(false));
            }
            let rows = query
                .order(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .load(connection)?;
            rows.into_iter().map(NotificationRow::into_domain).collect()
        })
        .await
    }
}
