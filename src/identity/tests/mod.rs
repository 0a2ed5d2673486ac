//! Unit tests for authentication and profile updates.

use crate::error::{ErrorKind, TrackerError};
use crate::identity::domain::{ExternalIdentity, Handle, ProfileUpdate};
use crate::identity::ports::UserRepository;
use crate::ids::UserId;
use crate::test_support::{Tracker, failure, tracker};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_authentication_registers_the_user(tracker: Tracker) -> eyre::Result<()> {
    let identity = ExternalIdentity::new(42, "Ada")
        .with_last_name("Lovelace")
        .with_handle(Handle::new("@ada")?)
        .with_language_code("en");

    let user = tracker.identity.authenticate(identity).await?;

    assert_eq!(user.external_id(), 42);
    assert_eq!(user.handle().map(Handle::as_str), Some("ada"));
    assert_eq!(user.display_name(), "Ada Lovelace");
    assert_eq!(tracker.identity.me(user.id()).await?, user);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_authentication_keeps_fields_the_provider_omits(
    tracker: Tracker,
) -> eyre::Result<()> {
    let first = tracker
        .identity
        .authenticate(
            ExternalIdentity::new(7, "Grace")
                .with_last_name("Hopper")
                .with_handle(Handle::new("grace")?)
                .with_avatar_url("https://example.test/grace.png"),
        )
        .await?;

    let refreshed = tracker
        .identity
        .authenticate(ExternalIdentity::new(7, "Amazing Grace"))
        .await?;

    assert_eq!(refreshed.id(), first.id());
    assert_eq!(refreshed.first_name(), "Amazing Grace");
    assert_eq!(refreshed.last_name(), Some("Hopper"));
    assert_eq!(refreshed.handle().map(Handle::as_str), Some("grace"));
    assert_eq!(
        refreshed.avatar_url(),
        Some("https://example.test/grace.png")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_recycled_handle_moves_to_its_new_holder(tracker: Tracker) -> eyre::Result<()> {
    let handle = Handle::new("alice")?;
    let alice = tracker
        .identity
        .authenticate(ExternalIdentity::new(1, "Alice").with_handle(handle.clone()))
        .await?;

    let carol = tracker
        .identity
        .authenticate(ExternalIdentity::new(2, "Carol").with_handle(handle.clone()))
        .await?;

    assert_eq!(carol.handle(), Some(&handle));
    assert_eq!(tracker.identity.me(alice.id()).await?.handle(), None);
    let holders = tracker
        .store
        .find_users_by_handles(std::slice::from_ref(&handle))
        .await?;
    assert_eq!(holders, vec![carol.clone()]);

    let alice_again = tracker
        .identity
        .authenticate(ExternalIdentity::new(1, "Alice"))
        .await?;
    let carol_again = tracker
        .identity
        .authenticate(ExternalIdentity::new(2, "Carol").with_handle(handle.clone()))
        .await?;
    assert_eq!(alice_again.handle(), None);
    assert_eq!(carol_again.id(), carol.id());
    assert_eq!(carol_again.handle(), Some(&handle));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_update_clears_and_replaces_fields(tracker: Tracker) -> eyre::Result<()> {
    let user = tracker.user(3, "linus").await?;

    let updated = tracker
        .identity
        .update_profile(
            user.id(),
            ProfileUpdate {
                first_name: Some("  Linus ".to_owned()),
                last_name: Some(Some("Torvalds".to_owned())),
                language_code: Some(None),
            },
        )
        .await?;

    assert_eq!(updated.first_name(), "Linus");
    assert_eq!(updated.last_name(), Some("Torvalds"));
    assert_eq!(updated.language_code(), None);
    assert_eq!(tracker.identity.me(user.id()).await?, updated);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_first_name_is_rejected(tracker: Tracker) -> eyre::Result<()> {
    let user = tracker.user(4, "blank").await?;

    let result = tracker
        .identity
        .update_profile(
            user.id(),
            ProfileUpdate {
                first_name: Some("   ".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await;

    assert!(matches!(result, Err(TrackerError::BadRequest(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_is_not_found(tracker: Tracker) {
    let result = tracker.identity.me(UserId::new()).await;

    assert_eq!(failure(result), Some(ErrorKind::NotFound));
}

#[rstest]
#[case("ada")]
#[case("@dev_ops")]
#[case("A1")]
fn valid_handles_are_accepted(#[case] raw: &str) {
    assert!(Handle::new(raw).is_ok(), "expected '{raw}' to be valid");
}

#[rstest]
#[case("")]
#[case("@")]
#[case("has space")]
#[case("dash-ed")]
#[case("this_handle_is_far_too_long_to_be_valid")]
fn invalid_handles_are_rejected(#[case] raw: &str) {
    assert!(Handle::new(raw).is_err(), "expected '{raw}' to be invalid");
}
