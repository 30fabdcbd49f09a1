//! Seed entry point.

use anyhow::Context;
use document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
use domain::Storefront;
use seed::{Config, StoreBackend};
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::warn!("received SIGINT, closing document store");
        }
        () = terminate => {
            tracing::warn!("received SIGTERM, closing document store");
        }
    }
}

/// Runs the scenario until it finishes or a shutdown signal arrives, then
/// closes the store exactly once.
async fn run<S>(store: S) -> anyhow::Result<()>
where
    S: DocumentStore + Clone,
{
    let storefront = Storefront::new(store);

    let outcome = tokio::select! {
        result = seed::run_scenario(&storefront) => Some(result),
        () = shutdown_signal() => None,
    };

    storefront.close().await;
    tracing::info!("document store closed");

    match outcome {
        Some(Ok(report)) => {
            tracing::info!(
                order_id = %report.order_id,
                payment_id = %report.payment_id,
                total = %report.order_total,
                "seed completed"
            );
            Ok(())
        }
        Some(Err(err)) => {
            tracing::error!(error = %err, "seed failed");
            Err(err).context("seed scenario failed")
        }
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let config = Config::from_env().context("invalid configuration")?;

    // 2. Initialize tracing
    seed::init_tracing(&config);

    // 3. Connect and run
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory document store");
            run(InMemoryDocumentStore::new()).await
        }
        StoreBackend::Postgres => {
            let store_config = config
                .store_config()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let store = PostgresDocumentStore::connect(&store_config)
                .await
                .context("failed to connect to PostgreSQL")?;
            if let Err(err) = store.run_migrations().await {
                store.close().await;
                return Err(err).context("failed to run migrations");
            }
            run(store).await
        }
    }
}
