//! Unit tests for project lifecycle and visibility.

use crate::error::ErrorKind;
use crate::project::domain::{ProjectChanges, ProjectName, ProjectVisibility};
use crate::project::services::CreateProjectRequest;
use crate::test_support::{Tracker, failure, tracker};
use crate::workspace::domain::WorkspaceRole;
use rstest::rstest;

#[rstest]
#[case("private", Some(ProjectVisibility::Private))]
#[case(" TEAM ", Some(ProjectVisibility::Team))]
#[case("public_readonly", Some(ProjectVisibility::PublicReadonly))]
#[case("public", None)]
fn visibility_parses_from_storage(
    #[case] raw: &str,
    #[case] expected: Option<ProjectVisibility>,
) {
    assert_eq!(ProjectVisibility::try_from(raw).ok(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_default_to_team_visibility(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let listed = tracker
        .projects
        .list(scene.owner.id(), scene.workspace.id())
        .await?;

    assert_eq!(scene.project.visibility(), ProjectVisibility::Team);
    assert_eq!(scene.project.workspace_id(), scene.workspace.id());
    assert_eq!(listed, vec![scene.project]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_project_names_are_rejected(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let result = tracker
        .projects
        .create(
            scene.owner.id(),
            scene.workspace.id(),
            CreateProjectRequest::new("  "),
        )
        .await;

    assert_eq!(failure(result), Some(ErrorKind::BadRequest));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_update_and_clear_project_fields(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let bob = tracker
        .member(&scene.owner, scene.workspace.id(), 2, "bob", WorkspaceRole::Member)
        .await?;
    let project = tracker
        .projects
        .update(
            bob.id(),
            scene.project.id(),
            ProjectChanges {
                description: Some(Some("Ship it".to_owned())),
                ..ProjectChanges::default()
            },
        )
        .await?;
    assert_eq!(project.description(), Some("Ship it"));

    let cleared = tracker
        .projects
        .update(
            bob.id(),
            scene.project.id(),
            ProjectChanges {
                name: Some(ProjectName::new("Orbit")?),
                description: Some(None),
                visibility: Some(ProjectVisibility::Private),
            },
        )
        .await?;

    assert_eq!(cleared.name().as_str(), "Orbit");
    assert_eq!(cleared.description(), None);
    assert_eq!(cleared.visibility(), ProjectVisibility::Private);
    assert_eq!(
        tracker.projects.get(bob.id(), scene.project.id()).await?,
        cleared
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_read_but_cannot_write_projects(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let ws = scene.workspace.id();
    let viewer = tracker
        .member(&scene.owner, ws, 2, "vera", WorkspaceRole::Viewer)
        .await?;

    let read = tracker.projects.get(viewer.id(), scene.project.id()).await;
    let create = tracker
        .projects
        .create(viewer.id(), ws, CreateProjectRequest::new("Side quest"))
        .await;
    let update = tracker
        .projects
        .update(viewer.id(), scene.project.id(), ProjectChanges::default())
        .await;
    let delete = tracker.projects.delete(viewer.id(), scene.project.id()).await;

    assert!(read.is_ok());
    assert_eq!(failure(create), Some(ErrorKind::Forbidden));
    assert_eq!(failure(update), Some(ErrorKind::Forbidden));
    assert_eq!(failure(delete), Some(ErrorKind::Forbidden));
    Ok(())
}

#[rstest]
#[case(ProjectVisibility::Private, Some(ErrorKind::Forbidden))]
#[case(ProjectVisibility::Team, Some(ErrorKind::Forbidden))]
#[case(ProjectVisibility::PublicReadonly, None)]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_read_only_public_projects(
    tracker: Tracker,
    #[case] visibility: ProjectVisibility,
    #[case] expected: Option<ErrorKind>,
) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let outsider = tracker.user(9, "mallory").await?;
    let project = tracker
        .projects
        .create(
            scene.owner.id(),
            scene.workspace.id(),
            CreateProjectRequest::new("Open").with_visibility(visibility),
        )
        .await?;

    let read = tracker.projects.get(outsider.id(), project.id()).await;
    let write = tracker
        .projects
        .update(outsider.id(), project.id(), ProjectChanges::default())
        .await;

    assert_eq!(failure(read), expected);
    assert_eq!(failure(write), Some(ErrorKind::Forbidden));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_boards_and_tasks(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let task = tracker.task(&scene, "Doomed").await?;

    tracker
        .projects
        .delete(scene.owner.id(), scene.project.id())
        .await?;

    let project = tracker
        .projects
        .get(scene.owner.id(), scene.project.id())
        .await;
    let board = tracker.boards.get(scene.owner.id(), scene.board.id()).await;
    let task = tracker.tasks.get(scene.owner.id(), task.id()).await;
    assert_eq!(failure(project), Some(ErrorKind::NotFound));
    assert_eq!(failure(board), Some(ErrorKind::NotFound));
    assert_eq!(failure(task), Some(ErrorKind::NotFound));
    assert!(
        tracker
            .projects
            .list(scene.owner.id(), scene.workspace.id())
            .await?
            .is_empty()
    );
    Ok(())
}
