//! Unit tests for boards and column ordering.

use crate::board::domain::BoardColumn;
use crate::board::services::CreateBoardRequest;
use crate::error::{ConflictReason, ErrorKind, TrackerError, UniqueConstraint};
use crate::project::services::CreateProjectRequest;
use crate::task::domain::{NewTask, TaskTitle};
use crate::test_support::{Tracker, failure, tracker};
use crate::workspace::domain::WorkspaceRole;
use crate::workspace::services::CreateWorkspaceRequest;
use rstest::rstest;

fn names(columns: &[BoardColumn]) -> Vec<(&str, i32)> {
    columns
        .iter()
        .map(|column| (column.name().as_str(), column.position()))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_boards_copy_the_workspace_template(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let seeded = tracker
        .boards
        .create(
            scene.owner.id(),
            scene.project.id(),
            CreateBoardRequest::new("Roadmap").seeded(),
        )
        .await?;
    let fetched = tracker.boards.get(scene.owner.id(), seeded.board.id()).await?;

    assert_eq!(
        names(&fetched.columns),
        [("To Do", 0), ("In Progress", 1), ("Done", 2)]
    );
    assert_eq!(fetched, seeded);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_follows_a_custom_template(tracker: Tracker) -> eyre::Result<()> {
    let owner = tracker.user(1, "alice").await?;
    let workspace = tracker
        .workspaces
        .create(
            owner.id(),
            CreateWorkspaceRequest::new("Lab")
                .with_default_columns(["Backlog".to_owned(), "Shipped".to_owned()]),
        )
        .await?;
    let project = tracker
        .projects
        .create(
            owner.id(),
            workspace.id(),
            CreateProjectRequest::new("Probe"),
        )
        .await?;

    let board = tracker
        .boards
        .create(owner.id(), project.id(), CreateBoardRequest::new("Main").seeded())
        .await?;

    assert_eq!(names(&board.columns), [("Backlog", 0), ("Shipped", 1)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unseeded_boards_start_empty(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let board = tracker
        .boards
        .create(scene.owner.id(), scene.project.id(), CreateBoardRequest::new("Bare"))
        .await?;

    assert!(board.columns.is_empty());
    assert_eq!(
        tracker
            .boards
            .list(scene.owner.id(), scene.project.id())
            .await?
            .len(),
        2
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn columns_without_position_are_appended(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    tracker
        .boards
        .create_column(owner, scene.board.id(), "Review", Some(5))
        .await?;

    let appended = tracker
        .boards
        .create_column(owner, scene.board.id(), "Done", None)
        .await?;

    assert_eq!(appended.position(), 6);
    let board = tracker.boards.get(owner, scene.board.id()).await?;
    assert_eq!(
        names(&board.columns),
        [("Todo", 0), ("Review", 5), ("Done", 6)]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appending_after_the_highest_position_is_refused(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    tracker
        .boards
        .create_column(owner, scene.board.id(), "Icebox", Some(i32::MAX))
        .await?;

    let appended = tracker
        .boards
        .create_column(owner, scene.board.id(), "Overflow", None)
        .await;

    assert_eq!(failure(appended), Some(ErrorKind::BadRequest));
    let board = tracker.boards.get(owner, scene.board.id()).await?;
    assert_eq!(names(&board.columns), [("Todo", 0), ("Icebox", i32::MAX)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_column_positions_conflict(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let review = tracker
        .boards
        .create_column(owner, scene.board.id(), "Review", Some(1))
        .await?;

    let created = tracker
        .boards
        .create_column(owner, scene.board.id(), "Clash", Some(0))
        .await;
    let moved = tracker
        .boards
        .update_column(owner, review.id(), None, Some(0))
        .await;
    let unchanged = tracker
        .boards
        .update_column(owner, review.id(), Some("Checks"), Some(1))
        .await?;

    assert!(matches!(
        created,
        Err(TrackerError::Conflict(ConflictReason::Unique(
            UniqueConstraint::ColumnPosition
        )))
    ));
    assert_eq!(failure(moved), Some(ErrorKind::Conflict));
    assert_eq!(unchanged.name().as_str(), "Checks");
    assert_eq!(unchanged.position(), 1);
    Ok(())
}

#[rstest]
#[case(Some(-1), "Late")]
#[case(None, "  ")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_columns_are_bad_requests(
    tracker: Tracker,
    #[case] position: Option<i32>,
    #[case] name: &str,
) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let result = tracker
        .boards
        .create_column(scene.owner.id(), scene.board.id(), name, position)
        .await;

    assert_eq!(failure(result), Some(ErrorKind::BadRequest));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_column_unfiles_its_tasks(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let owner = scene.owner.id();
    let task = tracker
        .tasks
        .create(
            owner,
            scene.project.id(),
            NewTask {
                column_id: Some(scene.column.id()),
                ..NewTask::new(TaskTitle::new("Filed")?)
            },
        )
        .await?;
    assert_eq!(task.column_id(), Some(scene.column.id()));

    tracker.boards.delete_column(owner, scene.column.id()).await?;

    let reloaded = tracker.tasks.get(owner, task.id()).await?;
    assert_eq!(reloaded.column_id(), None);
    assert!(tracker.boards.get(owner, scene.board.id()).await?.columns.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_cannot_change_boards(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;
    let viewer = tracker
        .member(&scene.owner, scene.workspace.id(), 2, "vera", WorkspaceRole::Viewer)
        .await?;

    let read = tracker.boards.get(viewer.id(), scene.board.id()).await;
    let rename = tracker
        .boards
        .rename(viewer.id(), scene.board.id(), "Mine now")
        .await;
    let delete = tracker.boards.delete(viewer.id(), scene.board.id()).await;

    assert!(read.is_ok());
    assert_eq!(failure(rename), Some(ErrorKind::Forbidden));
    assert_eq!(failure(delete), Some(ErrorKind::Forbidden));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renaming_a_board_keeps_its_columns(tracker: Tracker) -> eyre::Result<()> {
    let scene = tracker.scene().await?;

    let renamed = tracker
        .boards
        .rename(scene.owner.id(), scene.board.id(), " Sprint 2 ")
        .await?;
    let fetched = tracker.boards.get(scene.owner.id(), scene.board.id()).await?;

    assert_eq!(renamed.name().as_str(), "Sprint 2");
    assert_eq!(fetched.board, renamed);
    assert_eq!(fetched.columns, vec![scene.column]);
    Ok(())
}
