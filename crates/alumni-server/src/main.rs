//! Alumni server binary.

use std::sync::Arc;

use alumni_cache::{CacheRegistry, SweepScheduler};
use alumni_server::directory::{InMemoryDirectory, StudentDirectory};
use alumni_server::services::register_namespaces;
use alumni_server::{AppState, Settings, run_server};
use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    let addr = settings.server.addr()?;

    tracing::info!("Starting Alumni Server v{}", env!("CARGO_PKG_VERSION"));

    let prometheus_handle =
        alumni_server::metrics::init_metrics().context("failed to initialize metrics")?;

    // Directorio de estudiantes
    let directory: Arc<dyn StudentDirectory> = match &settings.directory.seed_file {
        Some(path) => Arc::new(
            InMemoryDirectory::from_file(path)
                .with_context(|| format!("failed to load students from {}", path.display()))?,
        ),
        None => {
            tracing::warn!("No seed file configured, starting with an empty student directory");
            Arc::new(InMemoryDirectory::new())
        },
    };

    // Cache compartido por todos los handlers
    let cache = CacheRegistry::new();
    register_namespaces(&cache, &settings.cache.namespaces)?;

    let _sweeper = SweepScheduler::new(cache.clone(), settings.cache.sweep_config())
        .context("invalid sweep configuration")?
        .start();

    let state = AppState::new(cache, directory)?;

    run_server(addr, state, prometheus_handle).await?;

    Ok(())
}
