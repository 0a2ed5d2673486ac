//! Given steps for task activity BDD scenarios.

use super::world::{ActivityWorld, run_async};
use eyre::WrapErr;
use minitracker::board::services::CreateBoardRequest;
use minitracker::project::services::CreateProjectRequest;
use minitracker::task::domain::{NewTask, TaskTitle};
use minitracker::workspace::domain::WorkspaceRole;
use minitracker::workspace::services::CreateWorkspaceRequest;
use rstest_bdd_macros::given;

/// Alice owns the workspace; Bob and Carol are members.
#[given(r#"a task "{title}" assigned to "{assignee}""#)]
fn task_assigned_to(
    world: &mut ActivityWorld,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let alice = world.register("alice")?;
    let workspace = run_async(
        world
            .services
            .workspaces
            .create(alice.id(), CreateWorkspaceRequest::new("Acme")),
    )
    .wrap_err("create scenario workspace")?;
    for handle in ["bob", "carol"] {
        let member = world.register(handle)?;
        run_async(world.services.workspaces.add_member(
            alice.id(),
            workspace.id(),
            member.id(),
            WorkspaceRole::Member,
        ))
        .wrap_err("add scenario member")?;
    }
    let project = run_async(world.services.projects.create(
        alice.id(),
        workspace.id(),
        CreateProjectRequest::new("Launch"),
    ))
    .wrap_err("create scenario project")?;
    let board = run_async(world.services.boards.create(
        alice.id(),
        project.id(),
        CreateBoardRequest::new("Sprint").seeded(),
    ))
    .wrap_err("create scenario board")?;
    world.board = Some(board);

    let assignee_id = world.user(&assignee)?.id();
    let attributes = NewTask {
        column_id: Some(world.column("To Do")?),
        assignee_id: Some(assignee_id),
        ..NewTask::new(TaskTitle::new(&title)?)
    };
    let task = run_async(world.services.tasks.create(alice.id(), project.id(), attributes))
        .wrap_err("create scenario task")?;
    world.task = Some(task);
    Ok(())
}
