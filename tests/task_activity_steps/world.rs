//! Shared world state for task activity BDD scenarios.

use minitracker::board::services::BoardWithColumns;
use minitracker::http::AppState;
use minitracker::identity::domain::{ExternalIdentity, Handle, InitDataVerifier, User};
use minitracker::ids::ColumnId;
use minitracker::storage::memory::InMemoryStore;
use minitracker::task::domain::{ActivityEntry, Task};
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;

/// Services used by the BDD world.
pub type Services = AppState<InMemoryStore>;

/// Scenario world for task activity behaviour tests.
pub struct ActivityWorld {
    /// Services under test.
    pub services: Services,
    /// Users registered so far, by handle.
    pub users: HashMap<String, User>,
    /// Seeded board holding the task.
    pub board: Option<BoardWithColumns>,
    /// The task under test, as last returned by the service.
    pub task: Option<Task>,
}

impl ActivityWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: AppState::new(
                Arc::new(InMemoryStore::new()),
                InitDataVerifier::new("1:scenarios", None),
            ),
            users: HashMap::new(),
            board: None,
            task: None,
        }
    }

    /// Returns the user registered as `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error when no such user was registered.
    pub fn user(&self, handle: &str) -> eyre::Result<&User> {
        self.users
            .get(handle)
            .ok_or_else(|| eyre::eyre!("no user {handle} in scenario world"))
    }

    /// Registers `handle` as a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or registration fails.
    pub fn register(&mut self, handle: &str) -> eyre::Result<User> {
        let external_id = i64::try_from(self.users.len())? + 1;
        let identity =
            ExternalIdentity::new(external_id, handle).with_handle(Handle::new(handle)?);
        let user = run_async(self.services.identity.authenticate(identity))?;
        self.users.insert(handle.to_owned(), user.clone());
        Ok(user)
    }

    /// Returns the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created.
    pub fn task(&self) -> eyre::Result<&Task> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no task in scenario world"))
    }

    /// Returns the id of the board column called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the board or the column is missing.
    pub fn column(&self, name: &str) -> eyre::Result<ColumnId> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no board in scenario world"))?
            .columns
            .iter()
            .find(|column| column.name().as_str() == name)
            .map(|column| column.id())
            .ok_or_else(|| eyre::eyre!("no column named {name}"))
    }

    /// Loads the task's activity trail as its owner sees it.
    ///
    /// # Errors
    ///
    /// Returns an error when the task is missing or the read fails.
    pub fn activity(&self) -> eyre::Result<Vec<ActivityEntry>> {
        let task = self.task()?;
        let reader = task.reporter_id();
        run_async(self.services.tasks.activity(reader, task.id()))
            .map_err(|err| eyre::eyre!("activity failed: {err}"))
    }
}

impl Default for ActivityWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ActivityWorld {
    ActivityWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
