//! A task's life from the seeded board through comments and reminders.

use super::helpers::{Services, Team, recruit, services, team};
use chrono::{Duration, Utc};
use minitracker::board::domain::BoardColumn;
use minitracker::ids::ColumnId;
use minitracker::notification::domain::{Notification, NotificationType};
use minitracker::task::domain::{
    ActivityAction, ActivityEntry, NewTask, TaskPatch, TaskStatus, TaskTitle,
};
use minitracker::task::services::MoveTaskRequest;
use minitracker::workspace::domain::WorkspaceRole;
use rstest::rstest;

fn column(team: &Team, name: &str) -> eyre::Result<ColumnId> {
    team.board
        .columns
        .iter()
        .find(|column| column.name().as_str() == name)
        .map(BoardColumn::id)
        .ok_or_else(|| eyre::eyre!("no column named {name}"))
}

fn kinds(inbox: &[Notification]) -> Vec<NotificationType> {
    inbox.iter().map(Notification::notification_type).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_task_crosses_the_seeded_board(services: Services) -> eyre::Result<()> {
    let team = team(&services).await?;
    let bob = recruit(&services, &team, 2, "bob", WorkspaceRole::Member).await?;
    let owner = team.owner.id();
    let names: Vec<&str> = team
        .board
        .columns
        .iter()
        .map(|column| column.name().as_str())
        .collect();
    assert_eq!(names, ["To Do", "In Progress", "Done"]);

    let task = services
        .tasks
        .create(
            owner,
            team.project.id(),
            NewTask {
                column_id: Some(column(&team, "To Do")?),
                assignee_id: Some(bob.id()),
                ..NewTask::new(TaskTitle::new("Ship the beta")?)
            },
        )
        .await?;
    let done = column(&team, "Done")?;
    services
        .tasks
        .move_task(
            bob.id(),
            task.id(),
            MoveTaskRequest {
                column_id: done,
                position: 0,
            },
        )
        .await?;
    let finished = services
        .tasks
        .update(
            bob.id(),
            task.id(),
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..TaskPatch::default()
            },
        )
        .await?;

    assert_eq!(finished.column_id(), Some(done));
    assert_eq!(finished.status(), TaskStatus::Done);
    let trail: Vec<ActivityAction> = services
        .tasks
        .activity(owner, task.id())
        .await?
        .iter()
        .map(ActivityEntry::action)
        .collect();
    assert_eq!(
        trail,
        [
            ActivityAction::TaskUpdated,
            ActivityAction::TaskMoved,
            ActivityAction::TaskCreated
        ]
    );
    assert_eq!(services.tasks.mine(bob.id()).await?, vec![finished]);
    let inbox = services.notifications.list(bob.id(), false).await?;
    assert_eq!(kinds(&inbox), [NotificationType::TaskAssigned]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_comment_mention_lands_in_the_inbox(services: Services) -> eyre::Result<()> {
    let team = team(&services).await?;
    let bob = recruit(&services, &team, 2, "bob", WorkspaceRole::Member).await?;
    let task = services
        .tasks
        .create(
            team.owner.id(),
            team.project.id(),
            NewTask::new(TaskTitle::new("Write release notes")?),
        )
        .await?;

    services
        .comments
        .create(bob.id(), task.id(), "@alice draft is ready", None)
        .await?;
    services
        .comments
        .create(bob.id(), task.id(), "@alice and the changelog too, @Alice", None)
        .await?;

    let unread = services.notifications.list(team.owner.id(), true).await?;
    assert_eq!(
        kinds(&unread),
        [NotificationType::CommentMentioned, NotificationType::CommentMentioned]
    );
    assert!(unread.iter().all(|item| item.task_id() == Some(task.id())));
    assert_eq!(services.notifications.mark_all_read(team.owner.id()).await?, 2);
    assert!(
        services
            .notifications
            .list(team.owner.id(), true)
            .await?
            .is_empty()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_due_reminder_is_delivered_once(services: Services) -> eyre::Result<()> {
    let team = team(&services).await?;
    let bob = recruit(&services, &team, 2, "bob", WorkspaceRole::Viewer).await?;
    let task = services
        .tasks
        .create(
            team.owner.id(),
            team.project.id(),
            NewTask {
                due_date: Some(Utc::now() + Duration::hours(4)),
                ..NewTask::new(TaskTitle::new("Renew certificates")?)
            },
        )
        .await?;
    let pause = Duration::milliseconds(20);
    services
        .reminders
        .create(bob.id(), task.id(), Utc::now() + pause)
        .await?;
    tokio::time::sleep(pause.to_std()? * 2).await;

    let first = services.reminders.sweep().await?;
    let second = services.reminders.sweep().await?;

    assert_eq!(first.sent, 1);
    assert_eq!(second.sent, 0);
    let inbox = services.notifications.list(bob.id(), false).await?;
    assert_eq!(kinds(&inbox), [NotificationType::TaskDueSoon]);
    let window = services
        .calendar
        .due_between(
            team.owner.id(),
            Utc::now(),
            Utc::now() + Duration::days(1),
            Some(team.project.id()),
        )
        .await?;
    assert_eq!(window, vec![task]);
    Ok(())
}
