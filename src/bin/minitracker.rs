//! Minitracker HTTP server.
//!
//! Reads [`TrackerConfig`] from the environment, prepares the `PostgreSQL`
//! schema, serves the REST API and runs the reminder sweep on a fixed
//! interval until SIGINT or SIGTERM arrives.

use minitracker::config::{ConfigError, TrackerConfig};
use minitracker::error::RepositoryError;
use minitracker::http::{AppState, build_router};
use minitracker::identity::domain::InitDataVerifier;
use minitracker::reminder::services::ReminderService;
use minitracker::storage::postgres::PostgresStore;
use mockable::DefaultClock;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Errors that stop the server.
#[derive(Debug, Error)]
enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("init data max age is out of range: {0}")]
    MaxAge(#[from] chrono::OutOfRangeError),
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = TrackerConfig::from_env()?;
    init_tracing(config.log_json);
    info!(?config, "starting minitracker");

    let store = Arc::new(PostgresStore::connect(
        &config.database_url,
        config.pool_size,
    )?);
    store.apply_migrations().await?;

    let max_age = config
        .init_data_max_age
        .map(chrono::Duration::from_std)
        .transpose()?;
    let verifier = InitDataVerifier::new(&config.bot_token, max_age);
    let state = AppState::new(Arc::clone(&store), verifier);

    let (stop_tx, stop_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_reminder_sweep(
        ReminderService::new(store, Arc::new(DefaultClock)),
        config.reminder_sweep_interval,
        stop_rx,
    ));

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    stop_tx.send_replace(true);
    if let Err(err) = sweeper.await {
        error!(error = %err, "reminder sweep task failed");
    }
    info!("minitracker stopped");
    Ok(())
}

async fn run_reminder_sweep(
    reminders: ReminderService<PostgresStore, DefaultClock>,
    every: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop.changed() => break,
        }
        match reminders.sweep().await {
            Ok(report) if report.sent > 0 => {
                info!(examined = report.examined, sent = report.sent, "reminder sweep");
            }
            Ok(_) => {}
            Err(err) => error!(error = %err, "reminder sweep failed"),
        }
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                error!(error = %err, "cannot register SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
    info!("shutdown signal received");
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
