//! In-memory task and activity tables.

use super::{InMemoryStore, replace};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{ProjectId, TaskId, UserId};
use crate::task::{
    domain::{ActivityEntry, DueWindow, Task, TaskFilter},
    ports::TaskRepository,
};
use async_trait::async_trait;
use std::cmp::Ordering;

fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    filter
        .assignee_id
        .is_none_or(|assignee| task.assignee_id() == Some(assignee))
        && filter.status.is_none_or(|status| task.status() == status)
        && filter
            .priority
            .is_none_or(|priority| task.priority() == priority)
        && filter
            .task_type
            .is_none_or(|task_type| task.task_type() == task_type)
}

/// Orders by due date ascending with undated tasks last.
fn by_due_date(a: &Task, b: &Task) -> Ordering {
    match (a.due_date(), b.due_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create_task(&self, task: &Task, entry: &ActivityEntry) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_project(task.project_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Project,
                task.project_id(),
            ));
        }
        if state.has_task(task.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        state.tasks.push(task.clone());
        state.activity.push(entry.clone());
        Ok(())
    }

    async fn update_task(
        &self,
        task: &Task,
        entry: Option<&ActivityEntry>,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !replace(&mut state.tasks, task, |other| other.id() == task.id()) {
            return Err(RepositoryError::not_found(EntityKind::Task, task.id()));
        }
        if let Some(entry) = entry {
            state.activity.push(entry.clone());
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_task(id) {
            return Err(RepositoryError::not_found(EntityKind::Task, id));
        }
        state.remove_task(id);
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .rev()
            .filter(|task| task.project_id() == project_id && matches_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.position()
                .cmp(&b.position())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });
        Ok(tasks)
    }

    async fn list_tasks_assigned_to(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.assignee_id() == Some(user_id) && state.can_see_task(user_id, task))
            .cloned()
            .collect();
        tasks.sort_by(by_due_date);
        Ok(tasks)
    }

    async fn list_tasks_due(
        &self,
        user_id: UserId,
        window: &DueWindow,
    ) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.due_date().is_some_and(|due| window.contains(due)))
            .filter(|task| {
                window
                    .project_id()
                    .is_none_or(|project_id| task.project_id() == project_id)
            })
            .filter(|task| state.can_see_task(user_id, task))
            .cloned()
            .collect();
        tasks.sort_by(by_due_date);
        Ok(tasks)
    }

    async fn list_activity(&self, task_id: TaskId) -> RepositoryResult<Vec<ActivityEntry>> {
        let state = self.read()?;
        let mut entries: Vec<ActivityEntry> = state
            .activity
            .iter()
            .rev()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(entries)
    }
}
