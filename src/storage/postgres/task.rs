//! Task and activity log tables.

use super::{
    PostgresStore, expect_affected,
    models::{ActivityRow, TaskRow},
    schema::{activity_logs, tasks},
    visible_projects,
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::{ProjectId, TaskId, UserId};
use crate::task::{
    domain::{ActivityEntry, DueWindow, Task, TaskFilter},
    ports::TaskRepository,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// Names the row a task references through the violated foreign key.
fn broken_reference(constraint: Option<&str>, row: &TaskRow) -> (EntityKind, Option<Uuid>) {
    match constraint {
        Some("tasks_column_id_fkey") => (EntityKind::Column, row.column_id),
        Some("tasks_assignee_id_fkey") => (EntityKind::User, row.assignee_id),
        Some("tasks_reporter_id_fkey") => (EntityKind::User, Some(row.reporter_id)),
        _ => (EntityKind::Project, Some(row.project_id)),
    }
}

/// Reports a foreign-key violation on a task write as the missing row it names.
fn missing_reference(row: &TaskRow) -> impl FnOnce(DieselError) -> RepositoryError + '_ {
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
            let (kind, id) = broken_reference(info.constraint_name(), row);
            RepositoryError::NotFound(kind, id.map(|id| id.to_string()).unwrap_or_default())
        }
        other => RepositoryError::from(other),
    }
}

#[async_trait]
impl TaskRepository for PostgresStore {
    async fn create_task(&self, task: &Task, entry: &ActivityEntry) -> RepositoryResult<()> {
        let task_row = TaskRow::from(task);
        let entry_row = ActivityRow::from(entry);
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                diesel::insert_into(tasks::table)
                    .values(&task_row)
                    .execute(tx)
                    .map_err(missing_reference(&task_row))?;
                diesel::insert_into(activity_logs::table)
                    .values(&entry_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_task(
        &self,
        task: &Task,
        entry: Option<&ActivityEntry>,
    ) -> RepositoryResult<()> {
        let task_row = TaskRow::from(task);
        let entry_row = entry.map(ActivityRow::from);
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                let affected = diesel::update(tasks::table.find(task_row.id))
                    .set(&task_row)
                    .execute(tx)
                    .map_err(missing_reference(&task_row))?;
                expect_affected(affected, EntityKind::Task, task_row.id)?;
                if let Some(entry_row) = &entry_row {
                    diesel::insert_into(activity_logs::table)
                        .values(entry_row)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Task, id)
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        self.run(move |connection| {
            tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first(connection)
                .optional()?
                .map(TaskRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<Task>> {
        let filter = *filter;
        self.run(move |connection| {
            let mut query = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .into_boxed();
            if let Some(assignee) = filter.assignee_id {
                query = query.filter(tasks::assignee_id.eq(assignee.into_inner()));
            }
            if let Some(status) = filter.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = filter.priority {
                query = query.filter(tasks::priority.eq(priority.as_str()));
            }
            if let Some(task_type) = filter.task_type {
                query = query.filter(tasks::task_type.eq(task_type.as_str()));
            }
            let rows = query
                .order((tasks::position.asc(), tasks::created_at.desc()))
                .select(TaskRow::as_select())
                .load(connection)?;
            rows.into_iter().map(TaskRow::into_domain).collect()
        })
        .await
    }

    async fn list_tasks_assigned_to(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        let user = user_id.into_inner();
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::assignee_id.eq(user))
                .filter(tasks::project_id.eq_any(visible_projects(user)))
                .order((tasks::due_date.asc().nulls_last(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load(connection)?;
            rows.into_iter().map(TaskRow::into_domain).collect()
        })
        .await
    }

    async fn list_tasks_due(
        &self,
        user_id: UserId,
        window: &DueWindow,
    ) -> RepositoryResult<Vec<Task>> {
        let user = user_id.into_inner();
        let window = *window;
        self.run(move |connection| {
            let mut query = tasks::table
                .filter(tasks::due_date.ge(window.start()))
                .filter(tasks::due_date.le(window.end()))
                .filter(tasks::project_id.eq_any(visible_projects(user)))
                .into_boxed();
            if let Some(project_id) = window.project_id() {
                query = query.filter(tasks::project_id.eq(project_id.into_inner()));
            }
            let rows = query
                .order((tasks::due_date.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load(connection)?;
            rows.into_iter().map(TaskRow::into_domain).collect()
        })
        .await
    }

    async fn list_activity(&self, task_id: TaskId) -> RepositoryResult<Vec<ActivityEntry>> {
        self.run(move |connection| {
            let rows = activity_logs::table
                .filter(activity_logs::task_id.eq(task_id.into_inner()))
                .order(activity_logs::created_at.desc())
                .select(ActivityRow::as_select())
                .load(connection)?;
            rows.into_iter().map(ActivityRow::into_domain).collect()
        })
        .await
    }
}
