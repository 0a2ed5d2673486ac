//! Constraint mapping and column round-trips against a real database.

use super::helpers::TestSchema;
use chrono::DateTime;
use minitracker::board::domain::{Board, BoardName};
use minitracker::board::ports::BoardRepository;
use minitracker::board::services::CreateBoardRequest;
use minitracker::error::{
    ConflictReason, EntityKind, RepositoryError, TrackerError, UniqueConstraint,
};
use minitracker::identity::domain::{ExternalIdentity, Handle};
use minitracker::ids::{ColumnId, ProjectId, UserId};
use minitracker::project::services::CreateProjectRequest;
use minitracker::task::domain::{
    ActivityAction, ActivityEntry, NewTask, Task, TaskPatch, TaskStatus, TaskTitle,
};
use minitracker::task::ports::TaskRepository;
use minitracker::workspace::domain::WorkspaceRole;
use minitracker::workspace::services::CreateWorkspaceRequest;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn migrations_can_be_reapplied() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };

    schema.store.apply_migrations().await?;
    schema.store.apply_migrations().await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_key_violations_surface_as_missing_parents() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let orphan = Board::new(ProjectId::new(), BoardName::new("Adrift")?, &DefaultClock);

    let result = schema.store.store_board(&orphan, &[]).await;

    assert!(matches!(
        result,
        Err(RepositoryError::NotFound(EntityKind::Project, _))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_writes_name_the_missing_reference() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = services
        .identity
        .authenticate(ExternalIdentity::new(1, "Alice"))
        .await?;
    let workspace = services
        .workspaces
        .create(alice.id(), CreateWorkspaceRequest::new("Acme"))
        .await?;
    let project = services
        .projects
        .create(alice.id(), workspace.id(), CreateProjectRequest::new("Launch"))
        .await?;
    let filed_nowhere = Task::new(
        project.id(),
        alice.id(),
        NewTask {
            column_id: Some(ColumnId::new()),
            ..NewTask::new(TaskTitle::new("Lost column")?)
        },
        &DefaultClock,
    );
    let assigned_to_nobody = Task::new(
        project.id(),
        alice.id(),
        NewTask {
            assignee_id: Some(UserId::new()),
            ..NewTask::new(TaskTitle::new("Lost assignee")?)
        },
        &DefaultClock,
    );

    let column = schema
        .store
        .create_task(&filed_nowhere, &created_entry(&filed_nowhere))
        .await;
    let assignee = schema
        .store
        .create_task(&assigned_to_nobody, &created_entry(&assigned_to_nobody))
        .await;

    assert!(matches!(
        column,
        Err(RepositoryError::NotFound(EntityKind::Column, _))
    ));
    assert!(matches!(
        assignee,
        Err(RepositoryError::NotFound(EntityKind::User, _))
    ));
    Ok(())
}

fn created_entry(task: &Task) -> ActivityEntry {
    ActivityEntry::record(
        task.id(),
        task.reporter_id(),
        ActivityAction::TaskCreated,
        task.creation_details(),
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unique_indexes_map_to_conflicts() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = services
        .identity
        .authenticate(ExternalIdentity::new(1, "Alice").with_handle(Handle::new("alice")?))
        .await?;
    let bob = services
        .identity
        .authenticate(ExternalIdentity::new(2, "Bob"))
        .await?;
    let workspace = services
        .workspaces
        .create(alice.id(), CreateWorkspaceRequest::new("Acme"))
        .await?;
    let project = services
        .projects
        .create(alice.id(), workspace.id(), CreateProjectRequest::new("Launch"))
        .await?;
    let board = services
        .boards
        .create(alice.id(), project.id(), CreateBoardRequest::new("Sprint").seeded())
        .await?;
    services
        .workspaces
        .add_member(alice.id(), workspace.id(), bob.id(), WorkspaceRole::Member)
        .await?;

    let member_again = services
        .workspaces
        .add_member(alice.id(), workspace.id(), bob.id(), WorkspaceRole::Viewer)
        .await;
    let taken_position = services
        .boards
        .create_column(alice.id(), board.board.id(), "Blocked", Some(1))
        .await;

    assert!(matches!(
        member_again,
        Err(TrackerError::Conflict(ConflictReason::Unique(
            UniqueConstraint::MembershipPair
        )))
    ));
    assert!(matches!(
        taken_position,
        Err(TrackerError::Conflict(ConflictReason::Unique(
            UniqueConstraint::ColumnPosition
        )))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_and_activity_round_trip() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = services
        .identity
        .authenticate(ExternalIdentity::new(1, "Alice"))
        .await?;
    let workspace = services
        .workspaces
        .create(
            alice.id(),
            CreateWorkspaceRequest::new("Acme")
                .with_working_days(vec![5, 1, 3])
                .with_default_columns(vec!["Inbox".to_owned(), "Shipped".to_owned()]),
        )
        .await?;
    let project = services
        .projects
        .create(alice.id(), workspace.id(), CreateProjectRequest::new("Launch"))
        .await?;
    let due = DateTime::from_timestamp(1_900_000_000, 0)
        .ok_or_else(|| eyre::eyre!("timestamp out of range"))?;
    let task = services
        .tasks
        .create(
            alice.id(),
            project.id(),
            NewTask {
                description: Some("Ship it".to_owned()),
                due_date: Some(due),
                tags: vec!["release".to_owned(), "urgent".to_owned()],
                position: 3,
                ..NewTask::new(TaskTitle::new("Cut the release")?)
            },
        )
        .await?;
    services
        .tasks
        .update(
            alice.id(),
            task.id(),
            TaskPatch {
                status: Some(TaskStatus::InProgress),
                ..TaskPatch::default()
            },
        )
        .await?;

    let stored = schema
        .store
        .find_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task was not persisted"))?;
    assert_eq!(stored.title().as_str(), "Cut the release");
    assert_eq!(stored.description(), Some("Ship it"));
    assert_eq!(stored.due_date(), Some(due));
    assert_eq!(stored.tags(), ["release", "urgent"]);
    assert_eq!(stored.position(), 3);
    assert_eq!(stored.status(), TaskStatus::InProgress);

    let trail = schema.store.list_activity(task.id()).await?;
    let latest = trail.first().ok_or_else(|| eyre::eyre!("no activity"))?;
    assert_eq!(trail.len(), 2);
    assert_eq!(
        latest.details(),
        &json!({"status": {"from": "todo", "to": "in_progress"}})
    );

    let reloaded = services.workspaces.get(alice.id(), workspace.id()).await?;
    assert_eq!(reloaded.settings().working_days.days(), [1, 3, 5]);
    assert_eq!(reloaded.settings().default_columns.names(), ["Inbox", "Shipped"]);
    assert_eq!(reloaded.invite_code(), workspace.invite_code());
    Ok(())
}
