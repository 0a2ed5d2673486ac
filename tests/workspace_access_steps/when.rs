//! When steps for workspace access BDD scenarios.

use super::world::{AccessWorld, run_async};
use minitracker::task::domain::{NewTask, TaskTitle};
use rstest_bdd_macros::when;

#[when(r#""{handle}" tries to create a task titled "{title}""#)]
fn tries_to_create_task(
    world: &mut AccessWorld,
    handle: String,
    title: String,
) -> Result<(), eyre::Report> {
    let user = world.user(&handle)?;
    let project_id = world.project()?.id();
    let attributes = NewTask::new(TaskTitle::new(&title)?);
    let outcome = run_async(world.services.tasks.create(user.id(), project_id, attributes));
    world.last_attempt = Some(outcome.map(|_| ()));
    Ok(())
}

#[when(r#""{owner}" removes "{handle}" from the workspace"#)]
fn removes_member(
    world: &mut AccessWorld,
    owner: String,
    handle: String,
) -> Result<(), eyre::Report> {
    let owner = world.user(&owner)?;
    let member = world.user(&handle)?;
    let workspace_id = world.workspace()?.id();
    run_async(
        world
            .services
            .workspaces
            .remove_member(owner.id(), workspace_id, member.id()),
    )
    .map_err(|err| eyre::eyre!("remove_member failed: {err}"))?;
    Ok(())
}

#[when(r#""{handle}" joins with the current invite code"#)]
fn joins_with_current_code(world: &mut AccessWorld, handle: String) -> Result<(), eyre::Report> {
    let user = world.user(&handle)?;
    let code = world.workspace()?.invite_code().as_str().to_owned();
    let outcome = run_async(world.services.workspaces.join_by_invite_code(user.id(), &code));
    world.last_attempt = Some(outcome.map(|_| ()));
    Ok(())
}

#[when(r#""{handle}" regenerates the invite code"#)]
fn regenerates_code(world: &mut AccessWorld, handle: String) -> Result<(), eyre::Report> {
    let user = world.user(&handle)?;
    let workspace = world.workspace()?;
    let previous = workspace.invite_code().as_str().to_owned();
    let workspace_id = workspace.id();
    let refreshed = run_async(
        world
            .services
            .workspaces
            .regenerate_invite_code(user.id(), workspace_id),
    )
    .map_err(|err| eyre::eyre!("regenerate_invite_code failed: {err}"))?;
    world.previous_code = Some(previous);
    world.workspace = Some(refreshed);
    Ok(())
}

#[when(r#""{handle}" joins with the previous invite code"#)]
fn joins_with_previous_code(world: &mut AccessWorld, handle: String) -> Result<(), eyre::Report> {
    let user = world.user(&handle)?;
    let code = world
        .previous_code
        .clone()
        .ok_or_else(|| eyre::eyre!("no previous invite code in scenario world"))?;
    let outcome = run_async(world.services.workspaces.join_by_invite_code(user.id(), &code));
    world.last_attempt = Some(outcome.map(|_| ()));
    Ok(())
}
