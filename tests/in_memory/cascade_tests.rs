//! Deletes propagating down the ownership chain.

use super::helpers::{Services, file_task, kind, recruit, services, team};
use chrono::{Duration, Utc};
use minitracker::error::ErrorKind;
use minitracker::task::domain::TaskPatch;
use minitracker::workspace::domain::WorkspaceRole;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_workspace_removes_everything_below_it(
    services: Services,
) -> eyre::Result<()> {
    let team = team(&services).await?;
    let owner = team.owner.id();
    let bob = recruit(&services, &team, 2, "bob", WorkspaceRole::Member).await?;
    let task = file_task(&services, &team, "Doomed").await?;
    services
        .tasks
        .update(
            owner,
            task.id(),
            TaskPatch {
                assignee_id: Some(Some(bob.id())),
                ..TaskPatch::default()
            },
        )
        .await?;
    let comment = services
        .comments
        .create(bob.id(), task.id(), "on it", None)
        .await?;
    let reminder = services
        .reminders
        .create(bob.id(), task.id(), Utc::now() + Duration::hours(1))
        .await?;

    services.workspaces.delete(owner, team.workspace.id()).await?;

    assert_eq!(
        kind(services.workspaces.get(owner, team.workspace.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.projects.get(owner, team.project.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.boards.get(owner, team.board.board.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.tasks.get(bob.id(), task.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.comments.update(bob.id(), comment.id(), "late").await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.reminders.get(bob.id(), reminder.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert!(services.tasks.mine(bob.id()).await?.is_empty());
    assert!(services.workspaces.list(bob.id()).await?.is_empty());
    assert!(services.notifications.list(bob.id(), false).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_board_keeps_its_tasks_unfiled(services: Services) -> eyre::Result<()> {
    let team = team(&services).await?;
    let owner = team.owner.id();
    let column = team
        .board
        .columns
        .first()
        .ok_or_else(|| eyre::eyre!("seeded board has no columns"))?;
    let task = file_task(&services, &team, "Filed").await?;
    services
        .tasks
        .update(
            owner,
            task.id(),
            TaskPatch {
                column_id: Some(Some(column.id())),
                ..TaskPatch::default()
            },
        )
        .await?;

    services.boards.delete(owner, team.board.board.id()).await?;

    let survivor = services.tasks.get(owner, task.id()).await?;
    assert_eq!(survivor.column_id(), None);
    assert!(services.boards.list(owner, team.project.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_takes_its_thread_with_it(services: Services) -> eyre::Result<()> {
    let team = team(&services).await?;
    let owner = team.owner.id();
    let bob = recruit(&services, &team, 2, "bob", WorkspaceRole::Member).await?;
    let task = file_task(&services, &team, "Short lived").await?;
    let kept = file_task(&services, &team, "Long lived").await?;
    services
        .comments
        .create(owner, task.id(), "@bob look", None)
        .await?;
    services
        .comments
        .create(owner, kept.id(), "@bob this one stays", None)
        .await?;

    services.tasks.delete(owner, task.id()).await?;

    assert_eq!(
        kind(services.comments.list(owner, task.id()).await),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(
        kind(services.tasks.activity(owner, task.id()).await),
        Some(ErrorKind::NotFound)
    );
    let inbox = services.notifications.list(bob.id(), false).await?;
    assert_eq!(inbox.len(), 1);
    assert!(inbox.iter().all(|item| item.task_id() == Some(kept.id())));
    Ok(())
}
