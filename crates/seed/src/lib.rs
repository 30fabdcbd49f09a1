//! Seed scenario for the storefront document store.
//!
//! Populates every collection the way a new storefront would be set up and
//! exercises the find, update and status operations along the way.

pub mod config;
pub mod scenario;

pub use config::{Config, ConfigError, LogFormat, StoreBackend};
pub use scenario::{SeedError, SeedReport, run_scenario};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global tracing subscriber described by `config`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
