//! Given steps for workspace access BDD scenarios.

use super::world::{AccessWorld, run_async};
use eyre::WrapErr;
use minitracker::project::services::CreateProjectRequest;
use minitracker::workspace::domain::WorkspaceRole;
use minitracker::workspace::services::CreateWorkspaceRequest;
use rstest_bdd_macros::given;

#[given(r#"a workspace owned by "{owner}" with a project"#)]
fn workspace_with_project(world: &mut AccessWorld, owner: String) -> Result<(), eyre::Report> {
    let owner = world.user(&owner)?;
    let workspace = run_async(
        world
            .services
            .workspaces
            .create(owner.id(), CreateWorkspaceRequest::new("Acme")),
    )
    .wrap_err("create scenario workspace")?;
    let project = run_async(world.services.projects.create(
        owner.id(),
        workspace.id(),
        CreateProjectRequest::new("Launch"),
    ))
    .wrap_err("create scenario project")?;
    world.workspace = Some(workspace);
    world.project = Some(project);
    Ok(())
}

#[given(r#""{handle}" has joined the workspace as a "{role}""#)]
fn has_joined_as(
    world: &mut AccessWorld,
    handle: String,
    role: String,
) -> Result<(), eyre::Report> {
    let role = WorkspaceRole::try_from(role.as_str())?;
    let member = world.user(&handle)?;
    let workspace = world.workspace()?;
    let (workspace_id, owner_id) = (workspace.id(), workspace.owner_id());
    run_async(
        world
            .services
            .workspaces
            .add_member(owner_id, workspace_id, member.id(), role),
    )
    .wrap_err("add scenario member")?;
    Ok(())
}
