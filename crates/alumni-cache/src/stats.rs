//! Read-only statistics snapshot for a namespace.

use serde::Serialize;

/// Estadisticas de un namespace.
///
/// Built under the namespace lock without touching hit counters, so reading
/// stats never changes what later reads observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Nombre del namespace
    pub namespace: String,
    /// Entries currently held, including stale and dead ones not yet swept.
    pub entries: usize,
    /// Capacidad maxima
    pub max_entries: usize,
    /// `entries / max_entries * 100`
    pub capacity_utilization_percent: f64,
    /// Sum of the hit counters of the entries currently held.
    pub total_hits: u64,
    pub stale_count: usize,
    pub dead_count: usize,
    /// Keys with a background refresh in flight.
    pub refreshing: usize,
    /// Misses since the namespace was registered.
    pub misses: u64,
    /// Hit rate since the namespace was registered.
    pub hit_rate: f64,
}

impl CacheStats {
    /// Computes the utilization percentage, rounded to two decimals.
    pub(crate) fn utilization(entries: usize, max_entries: usize) -> f64 {
        if max_entries == 0 {
            return 0.0;
        }
        let percent = entries as f64 / max_entries as f64 * 100.0;
        (percent * 100.0).round() / 100.0
    }
}
