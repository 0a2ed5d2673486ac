//! Then steps for task activity BDD scenarios.

use super::world::{ActivityWorld, run_async};
use rstest_bdd_macros::then;
use serde_json::json;

#[then(r#"the latest activity is "{action}""#)]
fn latest_activity_is(world: &ActivityWorld, action: String) -> Result<(), eyre::Report> {
    let trail = world.activity()?;
    let latest = trail
        .first()
        .ok_or_else(|| eyre::eyre!("activity trail is empty"))?;
    eyre::ensure!(
        latest.action().as_str() == action,
        "expected {action}, found {}",
        latest.action().as_str()
    );
    Ok(())
}

#[then(r#"the activity records "{field}" changing from "{from}" to "{to}""#)]
fn activity_records_change(
    world: &ActivityWorld,
    field: String,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let trail = world.activity()?;
    let latest = trail
        .first()
        .ok_or_else(|| eyre::eyre!("activity trail is empty"))?;
    let recorded = latest.details().get(&field);
    eyre::ensure!(
        recorded == Some(&json!({"from": from, "to": to})),
        "unexpected {field} diff: {recorded:?}"
    );
    Ok(())
}

#[then("the activity records {count:usize} changed fields")]
fn activity_records_count(world: &ActivityWorld, count: usize) -> Result<(), eyre::Report> {
    let trail = world.activity()?;
    let latest = trail
        .first()
        .ok_or_else(|| eyre::eyre!("activity trail is empty"))?;
    let fields = latest.details().as_object().map_or(0, serde_json::Map::len);
    eyre::ensure!(fields == count, "expected {count} fields, found {fields}");
    Ok(())
}

#[then("the task has {count:usize} activity entries")]
fn task_has_entries(world: &ActivityWorld, count: usize) -> Result<(), eyre::Report> {
    let entries = world.activity()?.len();
    eyre::ensure!(entries == count, "expected {count} entries, found {entries}");
    Ok(())
}

#[then(r#""{handle}" has {count:usize} unread notification"#)]
fn has_unread(world: &ActivityWorld, handle: String, count: usize) -> Result<(), eyre::Report> {
    let user_id = world.user(&handle)?.id();
    let unread = run_async(world.services.notifications.list(user_id, true))
        .map_err(|err| eyre::eyre!("list notifications failed: {err}"))?;
    eyre::ensure!(
        unread.len() == count,
        "expected {count} unread, found {}",
        unread.len()
    );
    Ok(())
}

#[then(r#"the task sits in column "{column}""#)]
fn task_sits_in(world: &ActivityWorld, column: String) -> Result<(), eyre::Report> {
    let expected = world.column(&column)?;
    let task = world.task()?;
    eyre::ensure!(
        task.column_id() == Some(expected),
        "task is in {:?}, not {column}",
        task.column_id()
    );
    Ok(())
}
