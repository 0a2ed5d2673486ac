//! Shared world state for workspace access BDD scenarios.

use minitracker::error::TrackerError;
use minitracker::http::AppState;
use minitracker::identity::domain::{ExternalIdentity, Handle, InitDataVerifier, User};
use minitracker::project::domain::Project;
use minitracker::storage::memory::InMemoryStore;
use minitracker::workspace::domain::Workspace;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;

/// Services used by the BDD world.
pub type Services = AppState<InMemoryStore>;

/// Scenario world for workspace access behaviour tests.
pub struct AccessWorld {
    /// Services under test.
    pub services: Services,
    /// Users registered so far, by handle.
    pub users: HashMap<String, User>,
    /// The scenario's workspace.
    pub workspace: Option<Workspace>,
    /// The workspace's project.
    pub project: Option<Project>,
    /// Invite code in effect before the last regeneration.
    pub previous_code: Option<String>,
    /// Outcome of the last attempted action.
    pub last_attempt: Option<Result<(), TrackerError>>,
}

impl AccessWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: AppState::new(
                Arc::new(InMemoryStore::new()),
                InitDataVerifier::new("1:scenarios", None),
            ),
            users: HashMap::new(),
            workspace: None,
            project: None,
            previous_code: None,
            last_attempt: None,
        }
    }

    /// Returns the user registered as `handle`, registering them first if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or registration fails.
    pub fn user(&mut self, handle: &str) -> eyre::Result<User> {
        if let Some(user) = self.users.get(handle) {
            return Ok(user.clone());
        }
        let external_id = i64::try_from(self.users.len())? + 1;
        let identity =
            ExternalIdentity::new(external_id, handle).with_handle(Handle::new(handle)?);
        let user = run_async(self.services.identity.authenticate(identity))?;
        self.users.insert(handle.to_owned(), user.clone());
        Ok(user)
    }

    /// Returns the scenario's workspace.
    ///
    /// # Errors
    ///
    /// Returns an error when no workspace was created.
    pub fn workspace(&self) -> eyre::Result<&Workspace> {
        self.workspace
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no workspace in scenario world"))
    }

    /// Returns the scenario's project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was created.
    pub fn project(&self) -> eyre::Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no project in scenario world"))
    }
}

impl Default for AccessWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AccessWorld {
    AccessWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
