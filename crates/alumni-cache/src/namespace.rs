//! A single typed cache namespace.
//!
//! Each namespace owns its entries, its eviction order and the bookkeeping
//! for loads and background refreshes. Locks are never held across an
//! `.await`; the only suspension points are inside producers.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use glob::Pattern;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::NamespaceConfig;
use crate::entry::{CacheEntry, Freshness};
use crate::error::CacheError;
use crate::metrics::CacheMetrics;
use crate::stats::CacheStats;

type Loading<V> = Shared<BoxFuture<'static, Result<V, CacheError>>>;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: usize,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
}

struct InFlight<V> {
    id: u64,
    loading: Loading<V>,
}

enum Lookup<V> {
    Fresh(V),
    Stale(V),
    Miss,
}

/// Entries plus their eviction order, guarded by one lock.
struct Store<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// seq -> key, oldest first.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V> Store<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Stores `value` as a fresh entry and returns the keys evicted for room.
    fn put(&mut self, key: &str, value: V, config: &NamespaceConfig) -> Vec<String> {
        let now = Instant::now();
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(entry) = self.entries.get_mut(key) {
            self.order.remove(&entry.seq());
            entry.refresh(value, now, config.ttl, seq);
            self.order.insert(seq, key.to_string());
            return Vec::new();
        }

        let mut evicted = Vec::new();
        while self.entries.len() >= config.max_entries {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted.push(oldest);
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value, now, config.ttl, seq));
        self.order.insert(seq, key.to_string());
        evicted
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(&entry.seq());
                true
            },
            None => false,
        }
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        count
    }
}

/// Releases the refresh-in-progress marker even if the producer panics.
/// A marker replaced by invalidation belongs to someone else and is kept.
struct RefreshGuard<V: Clone + Send + Sync + 'static> {
    namespace: Arc<Namespace<V>>,
    key: String,
    id: u64,
}

impl<V: Clone + Send + Sync + 'static> Drop for RefreshGuard<V> {
    fn drop(&mut self) {
        let mut refreshing = self.namespace.refreshing.lock();
        if refreshing.get(&self.key) == Some(&self.id) {
            refreshing.remove(&self.key);
        }
    }
}

/// Cache namespace con TTL, ventana stale y capacidad acotada.
///
/// Values are cloned out on every hit; wrap large payloads in `Arc`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use alumni_cache::{Namespace, NamespaceConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), alumni_cache::CacheError> {
/// let students = Arc::new(Namespace::<String>::new(
///     "students",
///     NamespaceConfig::new(Duration::from_secs(300)),
/// )?);
///
/// let name = students
///     .get("ana@example.edu", || async { Ok("Ana Diaz".to_string()) })
///     .await?;
/// assert_eq!(name, "Ana Diaz");
/// # Ok(())
/// # }
/// ```
pub struct Namespace<V: Clone + Send + Sync + 'static> {
    name: String,
    config: NamespaceConfig,
    // Lock order: in_flight, refreshing, store.
    store: Mutex<Store<V>>,
    /// key -> id of the refresh allowed to write back.
    refreshing: Mutex<HashMap<String, u64>>,
    in_flight: Mutex<HashMap<String, InFlight<V>>>,
    next_id: AtomicU64,
    metrics: CacheMetrics,
}

impl<V: Clone + Send + Sync + 'static> Namespace<V> {
    /// Crea un namespace con la configuracion dada.
    pub fn new(name: impl Into<String>, config: NamespaceConfig) -> Result<Self, CacheError> {
        config.validate()?;
        let name = name.into();

        Ok(Self {
            metrics: CacheMetrics::new(name.clone()),
            name,
            config,
            store: Mutex::new(Store::new()),
            refreshing: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Returns the namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace configuration.
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Obtiene el valor para `key`, usando `produce` si hace falta.
    ///
    /// - Fresh entry: returned without calling `produce`.
    /// - Stale entry: returned immediately; one background refresh per key is
    ///   spawned with `produce`. Refresh failures keep the stale value.
    /// - Dead or absent: `produce` is awaited and its value stored. Concurrent
    ///   misses for the same key share a single producer call. Producer errors
    ///   propagate and nothing is cached.
    ///
    /// Producers should encode "not found" as a value so negative results are
    /// cached like any other.
    pub async fn get<F, Fut>(self: &Arc<Self>, key: &str, produce: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        ensure_key(key)?;

        match self.lookup(key) {
            Lookup::Fresh(value) => {
                self.metrics.record_hit();
                Ok(value)
            },
            Lookup::Stale(value) => {
                self.metrics.record_stale_hit();
                self.spawn_refresh(key, produce);
                Ok(value)
            },
            Lookup::Miss => {
                self.metrics.record_miss();
                self.load(key, produce).await
            },
        }
    }

    /// Inserta un valor fresh, desalojando la entry mas antigua si esta lleno.
    pub fn set(&self, key: &str, value: V) -> Result<(), CacheError> {
        ensure_key(key)?;
        self.store_value(key, value);
        Ok(())
    }

    /// Invalida una entrada especifica. Returns true if an entry was removed.
    ///
    /// A load or refresh of `key` running at the time will not write its
    /// result back. Other keys are not affected.
    pub fn invalidate(&self, key: &str) -> bool {
        let (removed, remaining) = {
            let mut in_flight = self.in_flight.lock();
            let mut refreshing = self.refreshing.lock();
            let mut store = self.store.lock();
            in_flight.remove(key);
            refreshing.remove(key);
            (store.remove(key), store.entries.len())
        };

        if removed {
            self.metrics.record_evictions("manual", 1);
            self.metrics.update_entry_count(remaining);
        }
        debug!(namespace = %self.name, key = %key, removed, "Cache entry invalidated");
        removed
    }

    /// Invalida entradas cuyas keys coincidan con un patrón glob.
    ///
    /// - `*`: coincide con cualquier secuencia de caracteres
    /// - `?`: coincide con un carácter
    ///
    /// Loads and refreshes of matching keys are cancelled too, even when the
    /// key is not stored yet. An invalid pattern invalidates nothing.
    pub fn invalidate_matching(&self, pattern_str: &str) -> InvalidationResult {
        let pattern = match Pattern::new(pattern_str) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern = %pattern_str, error = %e, "Invalid glob pattern");
                return InvalidationResult {
                    count: 0,
                    patterns: vec![pattern_str.to_string()],
                };
            },
        };

        let (keys, remaining) = {
            let mut in_flight = self.in_flight.lock();
            let mut refreshing = self.refreshing.lock();
            let mut store = self.store.lock();
            in_flight.retain(|key, _| !pattern.matches(key));
            refreshing.retain(|key, _| !pattern.matches(key));
            let keys: Vec<String> = store
                .entries
                .keys()
                .filter(|key| pattern.matches(key))
                .cloned()
                .collect();
            for key in &keys {
                store.remove(key);
            }
            (keys, store.entries.len())
        };

        let count = keys.len();
        self.metrics.record_evictions("manual", count);
        self.metrics.update_entry_count(remaining);

        info!(
            namespace = %self.name,
            pattern = %pattern_str,
            count = count,
            "Cache entries invalidated by pattern"
        );

        InvalidationResult {
            count,
            patterns: vec![pattern_str.to_string()],
        }
    }

    /// Invalida todas las entradas. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let count = {
            let mut in_flight = self.in_flight.lock();
            let mut refreshing = self.refreshing.lock();
            let mut store = self.store.lock();
            in_flight.clear();
            refreshing.clear();
            store.clear()
        };

        self.metrics.record_evictions("manual", count);
        self.metrics.update_entry_count(0);
        info!(namespace = %self.name, count = count, "Namespace cleared");
        count
    }

    /// Removes dead entries. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let (count, remaining) = {
            let mut store = self.store.lock();
            let dead: Vec<String> = store
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_dead(now, self.config.stale_window))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &dead {
                store.remove(key);
            }
            (dead.len(), store.entries.len())
        };

        self.metrics.record_evictions("expired", count);
        self.metrics.update_entry_count(remaining);
        if count > 0 {
            debug!(namespace = %self.name, count = count, "Swept dead entries");
        }
        count
    }

    /// Snapshot de estadisticas; no modifica el estado.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let refreshing = self.refreshing.lock().len();
        let store = self.store.lock();

        let mut stale_count = 0;
        let mut dead_count = 0;
        let mut total_hits = 0;
        for entry in store.entries.values() {
            total_hits += entry.hit_count();
            match entry.freshness(now, self.config.stale_window) {
                Freshness::Fresh => {},
                Freshness::Stale => stale_count += 1,
                Freshness::Dead => dead_count += 1,
            }
        }

        let entries = store.entries.len();
        CacheStats {
            namespace: self.name.clone(),
            entries,
            max_entries: self.config.max_entries,
            capacity_utilization_percent: CacheStats::utilization(
                entries,
                self.config.max_entries,
            ),
            total_hits,
            stale_count,
            dead_count,
            refreshing,
            misses: self.metrics.misses(),
            hit_rate: self.metrics.hit_rate(),
        }
    }

    /// Retorna el numero de entries, incluyendo las que aun no se barrieron.
    pub fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    /// Returns true if the namespace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if an entry for `key` is held, whatever its freshness.
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.lock().entries.contains_key(key)
    }

    /// Returns the keys currently held, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.store.lock().order.values().cloned().collect()
    }

    fn lookup(&self, key: &str) -> Lookup<V> {
        let now = Instant::now();
        let mut store = self.store.lock();

        let Some(entry) = store.entries.get_mut(key) else {
            return Lookup::Miss;
        };

        match entry.freshness(now, self.config.stale_window) {
            Freshness::Fresh => {
                entry.record_hit();
                Lookup::Fresh(entry.value().clone())
            },
            Freshness::Stale => {
                entry.record_hit();
                Lookup::Stale(entry.value().clone())
            },
            Freshness::Dead => Lookup::Miss,
        }
    }

    fn store_value(&self, key: &str, value: V) {
        let (evicted, remaining) = {
            let mut store = self.store.lock();
            let evicted = store.put(key, value, &self.config);
            (evicted, store.entries.len())
        };
        self.after_store(&evicted, remaining);
    }

    fn after_store(&self, evicted: &[String], remaining: usize) {
        if !evicted.is_empty() {
            debug!(
                namespace = %self.name,
                evicted = ?evicted,
                "Evicted oldest entries to stay within capacity"
            );
            self.metrics.record_evictions("capacity", evicted.len());
        }
        self.metrics.update_entry_count(remaining);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn spawn_refresh<F, Fut>(self: &Arc<Self>, key: &str, produce: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let id = {
            let mut refreshing = self.refreshing.lock();
            if refreshing.contains_key(key) {
                debug!(namespace = %self.name, key = %key, "Refresh already in flight");
                return;
            }
            let id = self.next_id();
            refreshing.insert(key.to_string(), id);
            id
        };

        let guard = RefreshGuard {
            namespace: Arc::clone(self),
            key: key.to_string(),
            id,
        };
        // Solo el dueño del marker llega aqui.
        let refresh = produce();

        debug!(namespace = %self.name, key = %key, "Serving stale value, refreshing in background");

        tokio::spawn(async move {
            let namespace = &guard.namespace;
            match refresh.await {
                Ok(value) => {
                    namespace.metrics.record_refresh(true);
                    if namespace.finish_refresh(&guard.key, guard.id, value) {
                        debug!(namespace = %namespace.name, key = %guard.key, "Background refresh completed");
                    }
                },
                Err(e) => {
                    namespace.metrics.record_refresh(false);
                    warn!(
                        namespace = %namespace.name,
                        key = %guard.key,
                        error = %e,
                        "Background refresh failed, keeping stale value"
                    );
                },
            }
        });
    }

    /// Stores a refreshed value if refresh `id` still owns the key's marker.
    fn finish_refresh(&self, key: &str, id: u64, value: V) -> bool {
        let (evicted, remaining) = {
            let refreshing = self.refreshing.lock();
            if refreshing.get(key) != Some(&id) {
                debug!(
                    namespace = %self.name,
                    key = %key,
                    "Discarding result of a refresh started before invalidation"
                );
                return false;
            }
            let mut store = self.store.lock();
            let evicted = store.put(key, value, &self.config);
            (evicted, store.entries.len())
        };
        self.after_store(&evicted, remaining);
        true
    }

    async fn load<F, Fut>(self: &Arc<Self>, key: &str, produce: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        // The slot is reserved before anything runs, so `produce` is called
        // at most once per load.
        let loading = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(key) {
                Some(existing) => {
                    debug!(namespace = %self.name, key = %key, "Joining in-flight load");
                    existing.loading.clone()
                },
                None => {
                    let id = self.next_id();
                    let loading = self.loading(key, id, produce);
                    in_flight.insert(
                        key.to_string(),
                        InFlight {
                            id,
                            loading: loading.clone(),
                        },
                    );
                    loading
                },
            }
        };

        loading.await
    }

    fn loading<F, Fut>(self: &Arc<Self>, key: &str, id: u64, produce: F) -> Loading<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let namespace = Arc::clone(self);
        let key = key.to_string();

        async move {
            let started = Instant::now();
            let result = produce().await.map_err(CacheError::producer);
            namespace
                .metrics
                .record_produce_duration(started.elapsed());

            if let Err(e) = &result {
                debug!(namespace = %namespace.name, key = %key, error = %e, "Producer failed on cold path");
            }
            namespace.finish_load(&key, id, result.as_ref().ok().cloned());
            result
        }
        .boxed()
        .shared()
    }

    /// Frees the in-flight slot of load `id` and stores its value. A slot
    /// removed or replaced by invalidation means the value is dropped.
    fn finish_load(&self, key: &str, id: u64, value: Option<V>) {
        let (evicted, remaining) = {
            let mut in_flight = self.in_flight.lock();
            if !in_flight.get(key).is_some_and(|current| current.id == id) {
                if value.is_some() {
                    debug!(
                        namespace = %self.name,
                        key = %key,
                        "Discarding result of a load started before invalidation"
                    );
                }
                return;
            }
            in_flight.remove(key);
            let Some(value) = value else {
                return;
            };
            let mut store = self.store.lock();
            let evicted = store.put(key, value, &self.config);
            (evicted, store.entries.len())
        };
        self.after_store(&evicted, remaining);
    }
}

fn ensure_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    Ok(())
}
