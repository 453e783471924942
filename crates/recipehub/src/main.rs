mod app;
mod cache;
mod channel;
mod config;
mod consumer;
mod handlers;
mod logsink;
mod service;
mod state;
mod storage;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipehub_core::events::{EventChannel, EventHandler, LOGS_TOPIC, MUTATIONS_TOPIC};
use recipehub_core::storage::RecipeRepository;

use crate::{
    app::create_app,
    config::Config,
    consumer::MutationConsumer,
    logsink::{LogSink, LOG_SINK_SUBSCRIBER},
    state::AppState,
};

/// Boot retry policy for schema migrations: exponential backoff.
const MIGRATION_ATTEMPTS: u32 = 5;
const MIGRATION_BASE_DELAY: Duration = Duration::from_secs(2);

/// Boot retry policy for channel subscriptions: fixed backoff.
const SUBSCRIBE_ATTEMPTS: u32 = 5;
const SUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

/// RecipeHub - recipe catalog service
#[derive(Parser, Debug)]
#[command(name = "recipehub")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipehub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = AppState::new(&config).await?;

    // Storage and channel must be ready before traffic is accepted; both
    // are retried and fatal on exhaustion.
    apply_migrations(state.repo.as_ref()).await?;
    subscribe_consumers(&state, &config).await?;

    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Applies schema migrations, retrying with exponential backoff.
///
/// The store may still be coming up when the service boots; transient
/// failures are retried, exhaustion is fatal.
async fn apply_migrations(repo: &dyn RecipeRepository) -> Result<()> {
    let mut delay = MIGRATION_BASE_DELAY;

    for attempt in 1..=MIGRATION_ATTEMPTS {
        match repo.migrate().await {
            Ok(()) => {
                tracing::info!("Migrations applied");
                return Ok(());
            }
            Err(err) if attempt < MIGRATION_ATTEMPTS => {
                tracing::warn!(
                    attempt,
                    error = %err,
                    "Migration failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("migrations failed after {MIGRATION_ATTEMPTS} attempts"));
            }
        }
    }

    unreachable!("retry loop always returns");
}

/// Registers the mutation consumer and the audit log sink, retrying with a
/// fixed backoff. Exhaustion is fatal: running without the consumer would
/// silently drop event-mode writes.
async fn subscribe_consumers(state: &AppState, config: &Config) -> Result<()> {
    let mutation_consumer = Arc::new(MutationConsumer::new(
        state.repo.clone(),
        state.cache.clone(),
        config.cache_ttl(),
    ));
    subscribe_with_retry(
        state.channel.as_ref(),
        MUTATIONS_TOPIC,
        &config.subscriber_id,
        mutation_consumer,
    )
    .await?;

    subscribe_with_retry(
        state.channel.as_ref(),
        LOGS_TOPIC,
        LOG_SINK_SUBSCRIBER,
        Arc::new(LogSink),
    )
    .await?;

    Ok(())
}

async fn subscribe_with_retry(
    channel: &dyn EventChannel,
    topic: &str,
    subscriber_id: &str,
    handler: Arc<dyn EventHandler>,
) -> Result<()> {
    for attempt in 1..=SUBSCRIBE_ATTEMPTS {
        match channel.subscribe(topic, subscriber_id, handler.clone()).await {
            Ok(()) => {
                tracing::info!(topic, subscriber_id, "Subscribed");
                return Ok(());
            }
            Err(err) if attempt < SUBSCRIBE_ATTEMPTS => {
                tracing::warn!(
                    topic,
                    subscriber_id,
                    attempt,
                    error = %err,
                    "Subscribe failed, retrying in {:?}",
                    SUBSCRIBE_DELAY
                );
                tokio::time::sleep(SUBSCRIBE_DELAY).await;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("subscribing '{subscriber_id}' to '{topic}' failed after {SUBSCRIBE_ATTEMPTS} attempts")
                });
            }
        }
    }

    unreachable!("retry loop always returns");
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
