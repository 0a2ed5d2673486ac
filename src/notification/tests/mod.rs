//! Unit tests for the notification inbox.

use crate::error::{ErrorKind, ForbiddenReason, TrackerError};
use crate::identity::domain::User;
use crate::ids::NotificationId;
use crate::notification::domain::{Notification, NotificationType};
use crate::notification::ports::NotificationRepository;
use crate::test_support::{Tracker, failure, tracker};
use mockable::DefaultClock;
use rstest::rstest;

async fn deliver(tracker: &Tracker, user: &User, message: &str) -> eyre::Result<Notification> {
    let notification = Notification::new(
        user.id(),
        NotificationType::TaskUpdated,
        message,
        None,
        &DefaultClock,
    );
    tracker.store.store_notification(&notification).await?;
    Ok(notification)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inbox_lists_newest_first_and_filters_unread(tracker: Tracker) -> eyre::Result<()> {
    let user = tracker.user(1, "alice").await?;
    let older = deliver(&tracker, &user, "older").await?;
    let newer = deliver(&tracker, &user, "newer").await?;

    tracker.notifications.mark_read(user.id(), older.id()).await?;

    let all = tracker.notifications.list(user.id(), false).await?;
    let unread = tracker.notifications.list(user.id(), true).await?;
    let messages: Vec<&str> = all.iter().map(Notification::message).collect();
    assert_eq!(messages, ["newer", "older"]);
    assert_eq!(unread, vec![newer]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_is_idempotent(tracker: Tracker) -> eyre::Result<()> {
    let user = tracker.user(1, "alice").await?;
    let notification = deliver(&tracker, &user, "hello").await?;

    let first = tracker.notifications.mark_read(user.id(), notification.id()).await?;
    let second = tracker.notifications.mark_read(user.id(), notification.id()).await?;

    assert!(first.is_read());
    assert_eq!(first, second);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_notifications_cannot_be_marked(tracker: Tracker) -> eyre::Result<()> {
    let alice = tracker.user(1, "alice").await?;
    let bob = tracker.user(2, "bob").await?;
    let notification = deliver(&tracker, &alice, "private").await?;

    let foreign = tracker.notifications.mark_read(bob.id(), notification.id()).await;
    let missing = tracker
        .notifications
        .mark_read(bob.id(), NotificationId::new())
        .await;

    assert!(matches!(
        foreign,
        Err(TrackerError::Forbidden(ForbiddenReason::NotResourceOwner))
    ));
    assert_eq!(failure(missing), Some(ErrorKind::NotFound));
    assert_eq!(tracker.notifications.list(alice.id(), true).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_all_read_counts_only_the_users_unread(tracker: Tracker) -> eyre::Result<()> {
    let alice = tracker.user(1, "alice").await?;
    let bob = tracker.user(2, "bob").await?;
    let read = deliver(&tracker, &alice, "one").await?;
    deliver(&tracker, &alice, "two").await?;
    deliver(&tracker, &alice, "three").await?;
    deliver(&tracker, &bob, "other").await?;
    tracker.notifications.mark_read(alice.id(), read.id()).await?;

    let updated = tracker.notifications.mark_all_read(alice.id()).await?;
    let again = tracker.notifications.mark_all_read(alice.id()).await?;

    assert_eq!(updated, 2);
    assert_eq!(again, 0);
    assert!(tracker.notifications.list(alice.id(), true).await?.is_empty());
    assert_eq!(tracker.notifications.list(bob.id(), true).await?.len(), 1);
    Ok(())
}
