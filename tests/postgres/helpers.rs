//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use minitracker::http::AppState;
use minitracker::identity::domain::InitDataVerifier;
use minitracker::storage::postgres::PostgresStore;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Environment variable naming the database the tests run against.
pub const TEST_DATABASE_URL: &str = "MINITRACKER_TEST_DATABASE_URL";

/// Every service wired over one `PostgreSQL` store.
pub type Services = AppState<PostgresStore>;

/// A migrated schema private to one test.
///
/// The schema is dropped when the value goes out of scope.
pub struct TestSchema {
    admin_url: String,
    name: String,
    /// Store whose connections resolve tables in the private schema.
    pub store: Arc<PostgresStore>,
}

impl TestSchema {
    /// Creates and migrates a fresh schema.
    ///
    /// Returns `Ok(None)` when [`TEST_DATABASE_URL`] is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or migrated.
    pub async fn create() -> eyre::Result<Option<Self>> {
        let Ok(admin_url) = std::env::var(TEST_DATABASE_URL) else {
            return Ok(None);
        };
        let name = format!("minitracker_test_{}", Uuid::new_v4().simple());
        let create_sql = format!("CREATE SCHEMA {name}");
        let url = admin_url.clone();
        tokio::task::spawn_blocking(move || -> eyre::Result<()> {
            let mut connection = PgConnection::establish(&url)?;
            connection.batch_execute(&create_sql)?;
            Ok(())
        })
        .await??;

        let store = Arc::new(PostgresStore::connect(&scoped_url(&admin_url, &name), 4)?);
        store.apply_migrations().await?;
        Ok(Some(Self {
            admin_url,
            name,
            store,
        }))
    }

    /// Wires every service over this schema's store.
    #[must_use]
    pub fn services(&self) -> Services {
        AppState::new(
            Arc::clone(&self.store),
            InitDataVerifier::new("1:integration", None),
        )
    }
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        let drop_sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name);
        let outcome = PgConnection::establish(&self.admin_url)
            .map_err(eyre::Report::from)
            .and_then(|mut connection| {
                connection
                    .batch_execute(&drop_sql)
                    .map_err(eyre::Report::from)
            });
        if let Err(err) = outcome {
            warn!(schema = %self.name, error = %err, "failed to drop test schema");
        }
    }
}

/// Appends a `search_path` option so every pooled connection lands in
/// `schema`.
fn scoped_url(base: &str, schema: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}options=-csearch_path%3D{schema}")
}
