//! REST surface under `/api/v1`.
//!
//! Handlers authenticate through [`auth::CurrentUser`], translate JSON
//! payloads into service requests and map [`crate::error::TrackerError`]
//! onto status codes via [`error::ApiError`].

pub mod auth;
pub mod error;
mod extract;

mod boards;
mod calendar;
mod comments;
mod notifications;
mod projects;
mod reminders;
mod tasks;
mod users;
mod workspaces;

use crate::board::services::BoardService;
use crate::comment::services::CommentService;
use crate::hooks::HookChain;
use crate::identity::{domain::InitDataVerifier, services::IdentityService};
use crate::notification::services::NotificationService;
use crate::project::services::ProjectService;
use crate::reminder::services::ReminderService;
use crate::storage::TrackerStore;
use crate::task::services::{CalendarService, TaskService};
use crate::workspace::services::WorkspaceService;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use mockable::DefaultClock;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};

/// Services shared by every handler.
pub struct AppState<S>
where
    S: TrackerStore,
{
    /// Authentication and profiles.
    pub identity: Arc<IdentityService<S, DefaultClock>>,
    /// Workspaces, members and invites.
    pub workspaces: Arc<WorkspaceService<S, DefaultClock>>,
    /// Projects.
    pub projects: Arc<ProjectService<S, DefaultClock>>,
    /// Boards and columns.
    pub boards: Arc<BoardService<S, DefaultClock>>,
    /// Tasks and activity.
    pub tasks: Arc<TaskService<S, DefaultClock>>,
    /// Calendar views.
    pub calendar: Arc<CalendarService<S>>,
    /// Comments.
    pub comments: Arc<CommentService<S, DefaultClock>>,
    /// Notifications.
    pub notifications: Arc<NotificationService<S>>,
    /// Reminders.
    pub reminders: Arc<ReminderService<S, DefaultClock>>,
    /// Init-data verifier.
    pub verifier: Arc<InitDataVerifier>,
    clock: Arc<DefaultClock>,
}

impl<S> Clone for AppState<S>
where
    S: TrackerStore,
{
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            workspaces: Arc::clone(&self.workspaces),
            projects: Arc::clone(&self.projects),
            boards: Arc::clone(&self.boards),
            tasks: Arc::clone(&self.tasks),
            calendar: Arc::clone(&self.calendar),
            comments: Arc::clone(&self.comments),
            notifications: Arc::clone(&self.notifications),
            reminders: Arc::clone(&self.reminders),
            verifier: Arc::clone(&self.verifier),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S> AppState<S>
where
    S: TrackerStore,
{
    /// Wires every service over `store` with the system clock and the
    /// standard post-commit hooks.
    #[must_use]
    pub fn new(store: Arc<S>, verifier: InitDataVerifier) -> Self {
        let clock = Arc::new(DefaultClock);
        let hooks = HookChain::standard(Arc::clone(&store), Arc::clone(&clock));
        Self {
            identity: Arc::new(IdentityService::new(Arc::clone(&store), Arc::clone(&clock))),
            workspaces: Arc::new(WorkspaceService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
            )),
            projects: Arc::new(ProjectService::new(Arc::clone(&store), Arc::clone(&clock))),
            boards: Arc::new(BoardService::new(Arc::clone(&store), Arc::clone(&clock))),
            tasks: Arc::new(TaskService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                hooks.clone(),
            )),
            calendar: Arc::new(CalendarService::new(Arc::clone(&store))),
            comments: Arc::new(CommentService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                hooks,
            )),
            notifications: Arc::new(NotificationService::new(Arc::clone(&store))),
            reminders: Arc::new(ReminderService::new(store, Arc::clone(&clock))),
            verifier: Arc::new(verifier),
            clock,
        }
    }
}

/// Builds the application router.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TrackerStore,
{
    let api = Router::new()
        .route("/users/me", get(users::me).patch(users::update_me::<S>))
        .route(
            "/workspaces",
            get(workspaces::list::<S>).post(workspaces::create::<S>),
        )
        .route("/workspaces/join", post(workspaces::join::<S>))
        .route(
            "/workspaces/:workspace_id",
            get(workspaces::get::<S>)
                .patch(workspaces::update::<S>)
                .delete(workspaces::delete::<S>),
        )
        .route(
            "/workspaces/:workspace_id/members",
            get(workspaces::list_members::<S>).post(workspaces::add_member::<S>),
        )
        .route(
            "/workspaces/:workspace_id/members/:user_id",
            patch(workspaces::change_role::<S>).delete(workspaces::remove_member::<S>),
        )
        .route(
            "/workspaces/:workspace_id/invite",
            post(workspaces::regenerate_invite::<S>),
        )
        .route("/workspaces/:workspace_id/leave", post(workspaces::leave::<S>))
        .route(
            "/workspaces/:workspace_id/projects",
            get(projects::list::<S>).post(projects::create::<S>),
        )
        .route(
            "/projects/:project_id",
            get(projects::get::<S>)
                .patch(projects::update::<S>)
                .delete(projects::delete::<S>),
        )
        .route(
            "/projects/:project_id/boards",
            get(boards::list::<S>).post(boards::create::<S>),
        )
        .route(
            "/boards/:board_id",
            get(boards::get::<S>)
                .patch(boards::rename::<S>)
                .delete(boards::delete::<S>),
        )
        .route("/boards/:board_id/columns", post(boards::create_column::<S>))
        .route(
            "/columns/:column_id",
            patch(boards::update_column::<S>).delete(boards::delete_column::<S>),
        )
        .route(
            "/projects/:project_id/tasks",
            get(tasks::list::<S>).post(tasks::create::<S>),
        )
        .route("/tasks/mine", get(tasks::mine::<S>))
        .route(
            "/tasks/:task_id",
            get(tasks::get::<S>)
                .patch(tasks::update::<S>)
                .delete(tasks::delete::<S>),
        )
        .route("/tasks/:task_id/move", patch(tasks::move_task::<S>))
        .route("/tasks/:task_id/activity", get(tasks::activity::<S>))
        .route(
            "/tasks/:task_id/comments",
            get(comments::list::<S>).post(comments::create::<S>),
        )
        .route(
            "/comments/:comment_id",
            patch(comments::update::<S>).delete(comments::delete::<S>),
        )
        .route(
            "/reminders",
            get(reminders::list::<S>).post(reminders::create::<S>),
        )
        .route("/reminders/:reminder_id", get(reminders::get::<S>))
        .route(
            "/reminders/:reminder_id/cancel",
            post(reminders::cancel::<S>),
        )
        .route("/notifications", get(notifications::list::<S>))
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_read::<S>),
        )
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_read::<S>),
        )
        .route("/calendar", get(calendar::due::<S>));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Wraps each request in a span and logs its outcome.
async fn trace_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = info_span!("http.request", %method, %path);
    let started = Instant::now();
    async move {
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );
        response
    }
    .instrument(span)
    .await
}

/// Deserializes a present field as `Some(value)`, so that an explicit
/// `null` becomes `Some(None)` while an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
