//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("alumni_cache_hits_total", "Total number of fresh cache hits");
    metrics::describe_counter!(
        "alumni_cache_stale_hits_total",
        "Total number of stale values served while revalidating"
    );
    metrics::describe_counter!("alumni_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "alumni_cache_evictions_total",
        "Total number of entries removed from the cache"
    );
    metrics::describe_counter!(
        "alumni_cache_refreshes_total",
        "Total number of background refreshes by outcome"
    );
    metrics::describe_gauge!("alumni_cache_entries", "Current number of entries in cache");
    metrics::describe_histogram!(
        "alumni_cache_produce_seconds",
        "Time spent in producers on cold misses"
    );
}

/// Recorder de metricas de un namespace.
/// Usa atomic counters internos para calcular el hit rate.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    namespace: String,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un hit fresh
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("alumni_cache_hits_total", "namespace" => self.namespace.clone()).increment(1);
    }

    /// Registra un hit stale (cuenta como hit para el hit rate)
    pub fn record_stale_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("alumni_cache_stale_hits_total", "namespace" => self.namespace.clone())
            .increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("alumni_cache_misses_total", "namespace" => self.namespace.clone()).increment(1);
    }

    /// Registra entries removidas: `capacity`, `expired` o `manual`
    pub fn record_evictions(&self, reason: &'static str, count: usize) {
        if count == 0 {
            return;
        }
        counter!(
            "alumni_cache_evictions_total",
            "namespace" => self.namespace.clone(),
            "reason" => reason
        )
        .increment(count as u64);
    }

    /// Registra el resultado de un refresh en background
    pub fn record_refresh(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        counter!(
            "alumni_cache_refreshes_total",
            "namespace" => self.namespace.clone(),
            "outcome" => outcome
        )
        .increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: usize) {
        gauge!("alumni_cache_entries", "namespace" => self.namespace.clone()).set(count as f64);
    }

    /// Registra la duracion de un producer
    pub fn record_produce_duration(&self, duration: Duration) {
        histogram!("alumni_cache_produce_seconds", "namespace" => self.namespace.clone())
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para stats/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
