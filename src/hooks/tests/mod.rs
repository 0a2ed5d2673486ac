//! Unit tests for post-commit dispatch.

use super::{CommitEvent, HookChain, PostCommitHook};
use crate::error::{TrackerError, TrackerResult};
use crate::ids::{ProjectId, UserId};
use crate::task::domain::{NewTask, Task, TaskTitle};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::{Arc, Mutex};

struct Recorder {
    name: &'static str,
    fail: bool,
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PostCommitHook for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn on_commit(&self, event: &CommitEvent) -> TrackerResult<()> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(format!("{}:{}", self.name, event.label()));
        }
        if self.fail {
            return Err(TrackerError::bad_request("hook exploded"));
        }
        Ok(())
    }
}

fn created() -> eyre::Result<CommitEvent> {
    let actor = UserId::new();
    let task = Task::new(
        ProjectId::new(),
        actor,
        NewTask::new(TaskTitle::new("Hooked")?),
        &DefaultClock,
    );
    Ok(CommitEvent::TaskCreated { actor, task })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_failing_hook_does_not_stop_the_chain() -> eyre::Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let chain = HookChain::new()
        .with_hook(Recorder {
            name: "first",
            fail: true,
            seen: Arc::clone(&seen),
        })
        .with_hook(Recorder {
            name: "second",
            fail: false,
            seen: Arc::clone(&seen),
        });

    chain.dispatch(&created()?).await;

    let seen = seen.lock().map_err(|err| eyre::eyre!(err.to_string()))?;
    assert_eq!(*seen, ["first:task_created", "second:task_created"]);
    assert_eq!(chain.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_empty_chain_is_a_no_op() -> eyre::Result<()> {
    let chain = HookChain::new();

    chain.dispatch(&created()?).await;

    assert!(chain.is_empty());
    Ok(())
}
