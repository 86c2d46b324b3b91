pub mod config;
pub mod error;
pub mod storage;

pub use config::{Config, LocationConfig, UiConfig, Units, ValidationResult, WeatherConfig};
pub use error::{
    AppError, ConfigError, LocationError, NetworkError, StorageError, WeatherError,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Log output goes to stderr so it does not interleave with rendered screens.
/// Safe to call more than once; later calls are no-ops.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("SkyCast core initialized");
    Ok(())
}
