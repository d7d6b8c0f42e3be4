#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use alumni_cache::{CacheRegistry, NamespaceConfig};

pub type Produced<V> = Pin<Box<dyn Future<Output = anyhow::Result<V>> + Send>>;

/// Counts how many times the producers it hands out are invoked.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicU32>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer resolving to `value` after `delay`.
    pub fn producer<V: Send + 'static>(
        &self,
        value: V,
        delay: Duration,
    ) -> impl FnOnce() -> Produced<V> + Send + 'static + use<V> {
        let calls = Arc::clone(&self.0);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(value)
            })
        }
    }

    /// Producer failing with `message` after `delay`.
    pub fn failing<V: Send + 'static>(
        &self,
        message: &'static str,
        delay: Duration,
    ) -> impl FnOnce() -> Produced<V> + Send + 'static + use<V> {
        let calls = Arc::clone(&self.0);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Err(anyhow::anyhow!(message))
            })
        }
    }

    pub fn calls(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Registry with a single `String` namespace.
pub fn registry_with(name: &str, config: NamespaceConfig) -> CacheRegistry {
    let registry = CacheRegistry::new();
    registry
        .register::<String>(name, config)
        .expect("Failed to register test namespace");
    registry
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
