//! Due-date calendar queries.

use crate::access::{AccessGuard, OwnershipStore, Resource};
use crate::error::{TrackerError, TrackerResult};
use crate::ids::{ProjectId, UserId};
use crate::task::domain::{DueWindow, Task};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Lists tasks due inside a window across the user's workspaces.
#[derive(Clone)]
pub struct CalendarService<S>
where
    S: OwnershipStore,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> CalendarService<S>
where
    S: OwnershipStore,
{
    /// Creates a new calendar service.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self { store, guard }
    }

    /// Returns tasks due in `[start, end]`, ordered by due date.
    ///
    /// With `project_id` the result is restricted to that project and the
    /// user must be a member of its workspace.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BadRequest`] when `end < start`, and
    /// [`TrackerError::NotFound`] or [`TrackerError::Forbidden`] for the
    /// project restriction.
    pub async fn due_between(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        project_id: Option<ProjectId>,
    ) -> TrackerResult<Vec<Task>> {
        let mut window = DueWindow::new(start, end).map_err(TrackerError::bad_request)?;
        if let Some(project_id) = project_id {
            self.guard
                .authorize_member(user_id, Resource::Project(project_id))
                .await?;
            window = window.in_project(project_id);
        }
        Ok(self.store.list_tasks_due(user_id, &window).await?)
    }
}
