//! Unit tests for reminder scheduling, cancellation and the sweep.

use crate::error::{ConflictReason, ErrorKind, ForbiddenReason, TrackerError};
use crate::notification::domain::NotificationType;
use crate::reminder::domain::ReminderStatus;
use crate::reminder::services::SweepReport;
use crate::test_support::{Tracker, failure, tracker};
use crate::workspace::domain::WorkspaceRole;
use chrono::{Duration, Utc};
use rstest::rstest;

/// Far enough ahead that scheduling succeeds, close enough to sleep past.
fn soon() -> Duration {
    Duration::milliseconds(20)
}

async fn let_it_fall_due() -> eyre::Result<()> {
    tokio::time::sleep(soon().to_std()? * 2).await;
    Ok(())
}

#[rstest]
#[case(Duration::zero())]
#[case(Duration::minutes(-5))]
#[tokio::test(flavor = "multi_thread")]
async fn reminders_must_lie_in_the_future(
    tracker: Tracker,
    #[case] offset: Duration,
) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let task = tracker.task(&scene, "Timely").await?;

    let result = tracker
        .reminders
        .create(scene.owner.id(), task.id(), Utc::now() + offset)
        .await;

    assert_eq!(failure(result), Some(ErrorKind::BadRequest));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_may_set_reminders_but_outsiders_may_not(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let viewer = tracker
        .member(&scene.owner, scene.workspace.id(), 2, "vera", WorkspaceRole::Viewer)
        .await?;
    let outsider = tracker.user(9, "mallory").await?;
    let task = tracker.task(&scene, "Watched").await?;
    let at = Utc::now() + Duration::hours(1);

    let reminder = tracker.reminders.create(viewer.id(), task.id(), at).await?;
    let denied = tracker.reminders.create(outsider.id(), task.id(), at).await;

    assert_eq!(reminder.status(), ReminderStatus::Pending);
    assert_eq!(reminder.user_id(), viewer.id());
    assert_eq!(tracker.reminders.list(viewer.id()).await?, vec![reminder]);
    assert_eq!(failure(denied), Some(ErrorKind::Forbidden));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminders_are_private_to_their_owner(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let bob = tracker
        .member(&scene.owner, scene.workspace.id(), 2, "bob", WorkspaceRole::Admin)
        .await?;
    let task = tracker.task(&scene, "Personal").await?;
    let reminder = tracker
        .reminders
        .create(scene.owner.id(), task.id(), Utc::now() + Duration::hours(2))
        .await?;

    let get = tracker.reminders.get(bob.id(), reminder.id()).await;
    let cancel = tracker.reminders.cancel(bob.id(), reminder.id()).await;

    assert_eq!(failure(get), Some(ErrorKind::Forbidden));
    assert_eq!(failure(cancel), Some(ErrorKind::Forbidden));
    assert!(tracker.reminders.list(bob.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leaving_the_workspace_revokes_access_to_own_reminders(
    tracker: Tracker,
) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let ws = scene.workspace.id();
    let bob = tracker
        .member(&scene.owner, ws, 2, "bob", WorkspaceRole::Member)
        .await?;
    let task = tracker.task(&scene, "Handover").await?;
    let reminder = tracker
        .reminders
        .create(bob.id(), task.id(), Utc::now() + Duration::hours(1))
        .await?;
    assert_eq!(tracker.reminders.list(bob.id()).await?.len(), 1);

    tracker.workspaces.remove_member(scene.owner.id(), ws, bob.id()).await?;

    let get = tracker.reminders.get(bob.id(), reminder.id()).await;
    let cancel = tracker.reminders.cancel(bob.id(), reminder.id()).await;
    assert!(matches!(
        get,
        Err(TrackerError::Forbidden(ForbiddenReason::NotAMember))
    ));
    assert_eq!(failure(cancel), Some(ErrorKind::Forbidden));
    assert!(tracker.reminders.list(bob.id()).await?.is_empty());

    tracker
        .workspaces
        .add_member(scene.owner.id(), ws, bob.id(), WorkspaceRole::Member)
        .await?;
    let restored = tracker.reminders.get(bob.id(), reminder.id()).await?;
    assert_eq!(restored.status(), ReminderStatus::Pending);
    assert_eq!(tracker.reminders.list(bob.id()).await?, vec![restored]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_twice_conflicts(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let task = tracker.task(&scene, "Called off").await?;
    let owner = scene.owner.id();
    let reminder = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + Duration::hours(1))
        .await?;

    let cancelled = tracker.reminders.cancel(owner, reminder.id()).await?;
    let again = tracker.reminders.cancel(owner, reminder.id()).await;

    assert_eq!(cancelled.status(), ReminderStatus::Cancelled);
    assert_eq!(
        tracker.reminders.get(owner, reminder.id()).await?.status(),
        ReminderStatus::Cancelled
    );
    assert!(matches!(
        again,
        Err(TrackerError::Conflict(ConflictReason::ReminderNotPending))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_sends_each_due_reminder_once(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let task = tracker.task(&scene, "Deadline").await?;
    let due = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + soon())
        .await?;
    let later = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + Duration::hours(1))
        .await?;
    let_it_fall_due().await?;

    let first = tracker.reminders.sweep().await?;
    let second = tracker.reminders.sweep().await?;

    assert_eq!(first, SweepReport { examined: 1, sent: 1 });
    assert_eq!(second, SweepReport::default());
    assert_eq!(
        tracker.reminders.get(owner, due.id()).await?.status(),
        ReminderStatus::Sent
    );
    assert_eq!(
        tracker.reminders.get(owner, later.id()).await?.status(),
        ReminderStatus::Pending
    );
    let inbox = tracker.notifications.list(owner, false).await?;
    assert_eq!(inbox.len(), 1);
    let notification = inbox.first().ok_or_else(|| eyre::eyre!("no notification"))?;
    assert_eq!(notification.notification_type(), NotificationType::TaskDueSoon);
    assert_eq!(notification.task_id(), Some(task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sent_and_cancelled_reminders_are_terminal(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let task = tracker.task(&scene, "Fired").await?;
    let fired = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + soon())
        .await?;
    let dropped = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + soon())
        .await?;
    tracker.reminders.cancel(owner, dropped.id()).await?;
    let_it_fall_due().await?;

    let report = tracker.reminders.sweep().await?;
    let cancel_sent = tracker.reminders.cancel(owner, fired.id()).await;

    assert_eq!(report.sent, 1);
    assert_eq!(failure(cancel_sent), Some(ErrorKind::Conflict));
    assert_eq!(
        tracker.reminders.get(owner, dropped.id()).await?.status(),
        ReminderStatus::Cancelled
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_sweeps_send_once(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let task = tracker.task(&scene, "Raced").await?;
    for _ in 0..5 {
        tracker
            .reminders
            .create(owner, task.id(), Utc::now() + soon())
            .await?;
    }
    let_it_fall_due().await?;

    let (left, right) = tokio::join!(tracker.reminders.sweep(), tracker.reminders.sweep());

    assert_eq!(left?.sent + right?.sent, 5);
    assert_eq!(tracker.notifications.list(owner, false).await?.len(), 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_task_drops_its_reminders(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let task = tracker.task(&scene, "Gone").await?;
    let reminder = tracker
        .reminders
        .create(owner, task.id(), Utc::now() + Duration::hours(1))
        .await?;

    tracker.tasks.delete(owner, task.id()).await?;

    let get = tracker.reminders.get(owner, reminder.id()).await;
    assert_eq!(failure(get), Some(ErrorKind::NotFound));
    Ok(())
}
