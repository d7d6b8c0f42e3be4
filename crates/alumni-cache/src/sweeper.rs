//! Periodic sweep of dead entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::registry::CacheRegistry;

/// Configuration for the sweep scheduler.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Interval between sweeps.
    pub interval: Duration,
}

impl SweepConfig {
    /// Rejects a zero interval, which `tokio::time::interval` cannot run.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

/// Handle for controlling a running sweep scheduler.
pub struct SweepHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
}

impl SweepHandle {
    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background task that removes dead entries from every namespace.
///
/// Runs independently of request handling; requests never wait on it.
pub struct SweepScheduler {
    registry: CacheRegistry,
    config: SweepConfig,
}

impl SweepScheduler {
    /// Creates a new sweep scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] if the interval is zero.
    pub fn new(registry: CacheRegistry, config: SweepConfig) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Creates a scheduler with default configuration.
    pub fn with_defaults(registry: CacheRegistry) -> Self {
        Self {
            registry,
            config: SweepConfig::default(),
        }
    }

    /// Starts the background sweep task.
    ///
    /// Returns a handle that can be used to stop the scheduler.
    pub fn start(self) -> SweepHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = SweepHandle { shutdown_tx };

        tokio::spawn(self.run(shutdown_rx));

        handle
    }

    /// Runs the scheduler loop.
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval_timer = interval(self.config.interval);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing is dead yet at startup.
        interval_timer.tick().await;

        info!(
            "Starting cache sweep scheduler with interval {:?}",
            self.config.interval
        );

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    let removed = self.registry.sweep();
                    debug!(removed = removed, "Scheduled cache sweep completed");
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Cache sweep scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }
}
