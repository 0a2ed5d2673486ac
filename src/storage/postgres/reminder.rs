//! Reminder table access.
//!
//! Status transitions are conditional updates so a sweep and a concurrent
//! cancel cannot both leave `pending`.

use super::{
    PostgresStore, missing_parent,
    models::ReminderRow,
    schema::{reminders, tasks},
    visible_projects,
};
use crate::error::{EntityKind, RepositoryResult};
use crate::ids::{ReminderId, UserId};
use crate::reminder::{
    domain::{Reminder, ReminderStatus},
    ports::ReminderRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[async_trait]
impl ReminderRepository for PostgresStore {
    async fn store_reminder(&self, reminder: &Reminder) -> RepositoryResult<()> {
        let row = ReminderRow::from(reminder);
        self.run(move |connection| {
            diesel::insert_into(reminders::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(EntityKind::Task, row.task_id))?;
            Ok(())
        })
        .await
    }

    async fn find_reminder(&self, id: ReminderId) -> RepositoryResult<Option<Reminder>> {
        self.run(move |connection| {
            reminders::table
                .find(id.into_inner())
                .select(ReminderRow::as_select())
                .first(connection)
                .optional()?
                .map(ReminderRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_reminders(&self, user_id: UserId) -> RepositoryResult<Vec<Reminder>> {
        let user = user_id.into_inner();
        self.run(move |connection| {
            let visible_tasks = tasks::table
                .filter(tasks::project_id.eq_any(visible_projects(user)))
                .select(tasks::id);
            let rows = reminders::table
                .filter(reminders::user_id.eq(user))
                .filter(reminders::task_id.eq_any(visible_tasks))
                .order(reminders::remind_at.asc())
                .select(ReminderRow::as_select())
                .load(connection)?;
            rows.into_iter().map(ReminderRow::into_domain).collect()
        })
        .await
    }

    async fn list_due_reminders(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Reminder>> {
        self.run(move |connection| {
            let rows = reminders::table
                .filter(reminders::status.eq(ReminderStatus::Pending.as_str()))
                .filter(reminders::remind_at.le(now))
                .order(reminders::remind_at.asc())
                .select(ReminderRow::as_select())
                .load(connection)?;
            rows.into_iter().map(ReminderRow::into_domain).collect()
        })
        .await
    }

    async fn transition_if_pending(
        &self,
        id: ReminderId,
        target: ReminderStatus,
        at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        self.run(move |connection| {
            let affected = diesel::update(
                reminders::table
                    .find(id.into_inner())
                    .filter(reminders::status.eq(ReminderStatus::Pending.as_str())),
            )
            .set((
                reminders::status.eq(target.as_str()),
                reminders::updated_at.eq(at),
            ))
            .execute(connection)?;
            Ok(affected == 1)
        })
        .await
    }
}
