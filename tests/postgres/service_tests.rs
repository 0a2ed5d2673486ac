//! Service workflows over the real database.

use super::helpers::{Services, TestSchema};
use chrono::{Duration, Utc};
use minitracker::board::services::CreateBoardRequest;
use minitracker::error::ErrorKind;
use minitracker::identity::domain::{ExternalIdentity, Handle, User};
use minitracker::notification::domain::NotificationType;
use minitracker::project::domain::Project;
use minitracker::project::services::CreateProjectRequest;
use minitracker::task::domain::{NewTask, Task, TaskTitle};
use minitracker::workspace::domain::{Workspace, WorkspaceRole};
use minitracker::workspace::services::CreateWorkspaceRequest;
use rstest::rstest;

async fn user(services: &Services, external_id: i64, handle: &str) -> eyre::Result<User> {
    let identity = ExternalIdentity::new(external_id, handle).with_handle(Handle::new(handle)?);
    Ok(services.identity.authenticate(identity).await?)
}

async fn workspace_with_project(
    services: &Services,
    owner: &User,
) -> eyre::Result<(Workspace, Project)> {
    let workspace = services
        .workspaces
        .create(owner.id(), CreateWorkspaceRequest::new("Acme"))
        .await?;
    let project = services
        .projects
        .create(owner.id(), workspace.id(), CreateProjectRequest::new("Launch"))
        .await?;
    Ok((workspace, project))
}

async fn task(
    services: &Services,
    owner: &User,
    project: &Project,
    title: &str,
) -> eyre::Result<Task> {
    Ok(services
        .tasks
        .create(owner.id(), project.id(), NewTask::new(TaskTitle::new(title)?))
        .await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_boards_persist_their_columns() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;
    let (_, project) = workspace_with_project(&services, &alice).await?;

    let created = services
        .boards
        .create(alice.id(), project.id(), CreateBoardRequest::new("Sprint").seeded())
        .await?;
    let loaded = services.boards.get(alice.id(), created.board.id()).await?;

    let positions: Vec<(String, i32)> = loaded
        .columns
        .iter()
        .map(|column| (column.name().as_str().to_owned(), column.position()))
        .collect();
    assert_eq!(
        positions,
        [
            ("To Do".to_owned(), 0),
            ("In Progress".to_owned(), 1),
            ("Done".to_owned(), 2)
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_sweeps_deliver_each_reminder_once() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;
    let (_, project) = workspace_with_project(&services, &alice).await?;
    let task = task(&services, &alice, &project, "Renew domain").await?;
    let pause = Duration::milliseconds(50);
    for _ in 0..4 {
        services
            .reminders
            .create(alice.id(), task.id(), Utc::now() + pause)
            .await?;
    }
    tokio::time::sleep(pause.to_std()? * 2).await;

    let (left, right) = tokio::join!(services.reminders.sweep(), services.reminders.sweep());

    assert_eq!(left?.sent + right?.sent, 4);
    let inbox = services.notifications.list(alice.id(), false).await?;
    assert_eq!(inbox.len(), 4);
    assert!(
        inbox
            .iter()
            .all(|item| item.notification_type() == NotificationType::TaskDueSoon)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mentions_resolve_handles_in_the_database() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;
    let bob = user(&services, 2, "bob").await?;
    let (workspace, project) = workspace_with_project(&services, &alice).await?;
    services
        .workspaces
        .add_member(alice.id(), workspace.id(), bob.id(), WorkspaceRole::Member)
        .await?;
    let task = task(&services, &alice, &project, "Review copy").await?;

    services
        .comments
        .create(alice.id(), task.id(), "@bob thoughts? @ghost too", None)
        .await?;

    let inbox = services.notifications.list(bob.id(), true).await?;
    let notification = inbox.first().ok_or_else(|| eyre::eyre!("no notification"))?;
    assert_eq!(inbox.len(), 1);
    assert_eq!(
        notification.notification_type(),
        NotificationType::CommentMentioned
    );
    assert_eq!(services.notifications.mark_all_read(bob.id()).await?, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workspace_deletion_cascades_through_foreign_keys() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;
    let (workspace, project) = workspace_with_project(&services, &alice).await?;
    let doomed = task(&services, &alice, &project, "Doomed").await?;
    services
        .comments
        .create(alice.id(), doomed.id(), "last words", None)
        .await?;

    services.workspaces.delete(alice.id(), workspace.id()).await?;

    let task = services.tasks.get(alice.id(), doomed.id()).await;
    let project = services.projects.get(alice.id(), project.id()).await;
    assert_eq!(task.err().map(|err| err.kind()), Some(ErrorKind::NotFound));
    assert_eq!(project.err().map(|err| err.kind()), Some(ErrorKind::NotFound));
    assert!(services.workspaces.list(alice.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn former_members_lose_their_reminders() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;
    let bob = user(&services, 2, "bob").await?;
    let (workspace, project) = workspace_with_project(&services, &alice).await?;
    services
        .workspaces
        .add_member(alice.id(), workspace.id(), bob.id(), WorkspaceRole::Member)
        .await?;
    let task = task(&services, &alice, &project, "Handover").await?;
    let reminder = services
        .reminders
        .create(bob.id(), task.id(), Utc::now() + Duration::hours(1))
        .await?;

    services
        .workspaces
        .remove_member(alice.id(), workspace.id(), bob.id())
        .await?;

    let get = services.reminders.get(bob.id(), reminder.id()).await;
    let cancel = services.reminders.cancel(bob.id(), reminder.id()).await;
    assert_eq!(get.err().map(|err| err.kind()), Some(ErrorKind::Forbidden));
    assert_eq!(cancel.err().map(|err| err.kind()), Some(ErrorKind::Forbidden));
    assert!(services.reminders.list(bob.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_recycled_handle_moves_to_its_new_holder() -> eyre::Result<()> {
    let Some(schema) = TestSchema::create().await? else {
        return Ok(());
    };
    let services = schema.services();
    let alice = user(&services, 1, "alice").await?;

    let carol = user(&services, 2, "alice").await?;

    assert_eq!(carol.handle().map(Handle::as_str), Some("alice"));
    assert_eq!(services.identity.me(alice.id()).await?.handle(), None);
    Ok(())
}
