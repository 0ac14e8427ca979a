mod api;
mod bootstrap;
mod health;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use bootstrap::Application;
use supplybot_core::config::{AppConfig, LoadOptions};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use supplybot_core::config::LogFormat::*;

    // RUST_LOG takes precedence over the configured level when present.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    run_application(app, wait_for_shutdown()).await
}

/// Serves until `shutdown` resolves, then closes the pool whatever the outcome.
async fn run_application(
    app: Application,
    shutdown: impl Future<Output = Result<()>>,
) -> Result<()> {
    let result = serve(&app, shutdown).await;
    app.db_pool.close().await;
    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "database pool closed"
    );
    result
}

async fn serve(app: &Application, shutdown: impl Future<Output = Result<()>>) -> Result<()> {
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let routes = api::router(app.runtime.clone()).merge(health::router(app.db_pool.clone()));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, routes)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "supplybot-server listening"
    );

    // A failed signal listener still stops the server before the error is returned.
    let signal = shutdown.await;
    if let Err(signal_error) = &signal {
        error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %signal_error,
            "shutdown signal listener failed"
        );
    }
    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "supplybot-server stopping"
    );

    let _ = shutdown_tx.send(());
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(serve_error))) => {
            error!(
                event_name = "system.server.error",
                correlation_id = "shutdown",
                error = %serve_error,
                "http server terminated with an error"
            );
        }
        Ok(Err(join_error)) => {
            error!(
                event_name = "system.server.error",
                correlation_id = "shutdown",
                error = %join_error,
                "http server task failed"
            );
        }
        Err(_) => {
            warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "in-flight requests did not drain before the shutdown deadline"
            );
        }
    }

    signal
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use supplybot_core::config::{ConfigOverrides, LoadOptions};

    use super::run_application;
    use crate::bootstrap::{bootstrap, Application};

    /// Bootstraps against an in-memory store and points the listener at `port`
    /// on loopback. Port 0 asks the OS for a free one.
    async fn application(port: u16) -> Application {
        let mut app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                llm_api_key: Some("hf_test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap");
        app.config.server.bind_address = "127.0.0.1".to_string();
        app.config.server.port = port;
        app.config.server.graceful_shutdown_secs = 1;
        app
    }

    #[tokio::test]
    async fn pool_is_closed_when_the_listener_cannot_bind() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
        let port = occupied.local_addr().expect("local addr").port();
        let app = application(port).await;
        let pool = app.db_pool.clone();

        let result = run_application(app, async { Ok(()) }).await;

        assert!(result.is_err(), "binding an occupied port should fail");
        assert!(pool.is_closed());
        drop(occupied);
    }

    #[tokio::test]
    async fn pool_is_closed_when_the_signal_listener_fails() {
        let app = application(0).await;
        let pool = app.db_pool.clone();

        let result =
            run_application(app, async { Err(anyhow!("signal handler unavailable")) }).await;

        let message = result.err().expect("signal failure should propagate").to_string();
        assert!(message.contains("signal handler unavailable"));
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn clean_shutdown_closes_pool() {
        let app = application(0).await;
        let pool = app.db_pool.clone();

        run_application(app, async { Ok(()) }).await.expect("clean shutdown");

        assert!(pool.is_closed());
    }
}
