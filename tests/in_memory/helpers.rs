//! Shared test helpers for in-memory integration tests.

use minitracker::board::services::{BoardWithColumns, CreateBoardRequest};
use minitracker::error::{ErrorKind, TrackerResult};
use minitracker::http::AppState;
use minitracker::identity::domain::{ExternalIdentity, Handle, InitDataVerifier, User};
use minitracker::project::domain::Project;
use minitracker::project::services::CreateProjectRequest;
use minitracker::storage::memory::InMemoryStore;
use minitracker::task::domain::{NewTask, Task, TaskTitle};
use minitracker::workspace::domain::{Workspace, WorkspaceRole};
use minitracker::workspace::services::CreateWorkspaceRequest;
use rstest::fixture;
use std::sync::Arc;

/// Every service wired over one in-memory store.
pub type Services = AppState<InMemoryStore>;

/// Provides a fresh set of services for each test.
#[fixture]
pub fn services() -> Services {
    AppState::new(
        Arc::new(InMemoryStore::new()),
        InitDataVerifier::new("1:integration", None),
    )
}

/// Returns the error classification of a failed result.
pub fn kind<T>(result: TrackerResult<T>) -> Option<ErrorKind> {
    result.err().map(|err| err.kind())
}

/// A workspace with one project and a board seeded from the default
/// template.
pub struct Team {
    /// Workspace owner, `@alice`.
    pub owner: User,
    /// The workspace.
    pub workspace: Workspace,
    /// Its only project.
    pub project: Project,
    /// Seeded board with `To Do`, `In Progress` and `Done`.
    pub board: BoardWithColumns,
}

/// Registers a user with `handle` as both first name and handle.
///
/// # Errors
///
/// Returns an error when the handle is invalid or registration fails.
pub async fn register(services: &Services, external_id: i64, handle: &str) -> eyre::Result<User> {
    let identity = ExternalIdentity::new(external_id, handle).with_handle(Handle::new(handle)?);
    Ok(services.identity.authenticate(identity).await?)
}

/// Registers a user and adds them to the team's workspace as `role`.
///
/// # Errors
///
/// Returns an error when registration or the membership grant fails.
pub async fn recruit(
    services: &Services,
    team: &Team,
    external_id: i64,
    handle: &str,
    role: WorkspaceRole,
) -> eyre::Result<User> {
    let user = register(services, external_id, handle).await?;
    services
        .workspaces
        .add_member(team.owner.id(), team.workspace.id(), user.id(), role)
        .await?;
    Ok(user)
}

/// Builds a [`Team`] owned by a fresh `@alice`.
///
/// # Errors
///
/// Returns an error when any of the creation calls fails.
pub async fn team(services: &Services) -> eyre::Result<Team> {
    team_named(services, 1, "alice", "Acme").await
}

/// Builds a [`Team`] owned by a fresh user with the given identity.
///
/// # Errors
///
/// Returns an error when any of the creation calls fails.
pub async fn team_named(
    services: &Services,
    external_id: i64,
    handle: &str,
    workspace: &str,
) -> eyre::Result<Team> {
    let owner = register(services, external_id, handle).await?;
    let workspace = services
        .workspaces
        .create(owner.id(), CreateWorkspaceRequest::new(workspace))
        .await?;
    let project = services
        .projects
        .create(
            owner.id(),
            workspace.id(),
            CreateProjectRequest::new("Launch"),
        )
        .await?;
    let board = services
        .boards
        .create(
            owner.id(),
            project.id(),
            CreateBoardRequest::new("Sprint").seeded(),
        )
        .await?;
    Ok(Team {
        owner,
        workspace,
        project,
        board,
    })
}

/// Creates a task titled `title` in the team's project as the owner.
///
/// # Errors
///
/// Returns an error when the title is invalid or creation fails.
pub async fn file_task(services: &Services, team: &Team, title: &str) -> eyre::Result<Task> {
    Ok(services
        .tasks
        .create(
            team.owner.id(),
            team.project.id(),
            NewTask::new(TaskTitle::new(title)?),
        )
        .await?)
}
