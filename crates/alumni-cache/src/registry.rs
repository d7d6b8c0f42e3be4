//! Process-wide registry of cache namespaces.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::NamespaceConfig;
use crate::error::CacheError;
use crate::namespace::{InvalidationResult, Namespace};
use crate::stats::CacheStats;

/// Operations available on a namespace without knowing its value type.
trait ErasedNamespace: Send + Sync {
    fn name(&self) -> &str;
    fn invalidate(&self, key: &str) -> bool;
    fn invalidate_matching(&self, pattern: &str) -> InvalidationResult;
    fn clear(&self) -> usize;
    fn sweep(&self) -> usize;
    fn stats(&self) -> CacheStats;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<V: Clone + Send + Sync + 'static> ErasedNamespace for Namespace<V> {
    fn name(&self) -> &str {
        Namespace::name(self)
    }

    fn invalidate(&self, key: &str) -> bool {
        Namespace::invalidate(self, key)
    }

    fn invalidate_matching(&self, pattern: &str) -> InvalidationResult {
        Namespace::invalidate_matching(self, pattern)
    }

    fn clear(&self) -> usize {
        Namespace::clear(self)
    }

    fn sweep(&self) -> usize {
        Namespace::sweep(self)
    }

    fn stats(&self) -> CacheStats {
        Namespace::stats(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Registro de namespaces del cache.
///
/// One registry is built at startup and handed to every consumer; clones share
/// the same namespaces. Each namespace stores a single value type, checked
/// when a typed handle is requested.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use alumni_cache::{CacheRegistry, NamespaceConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), alumni_cache::CacheError> {
/// let cache = CacheRegistry::new();
/// cache.register::<u64>("dashboard", NamespaceConfig::new(Duration::from_secs(120)))?;
///
/// let total = cache
///     .get("dashboard", "total-students", || async { Ok(1_250u64) })
///     .await?;
/// assert_eq!(total, 1_250);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct CacheRegistry {
    namespaces: Arc<RwLock<HashMap<String, Arc<dyn ErasedNamespace>>>>,
}

impl CacheRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un namespace para valores de tipo `V`.
    pub fn register<V>(
        &self,
        name: impl Into<String>,
        config: NamespaceConfig,
    ) -> Result<Arc<Namespace<V>>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let name = name.into();
        let mut namespaces = self.namespaces.write();
        if namespaces.contains_key(&name) {
            return Err(CacheError::NamespaceExists(name));
        }

        let namespace = Arc::new(Namespace::<V>::new(name.clone(), config)?);
        namespaces.insert(name.clone(), namespace.clone());

        info!(
            namespace = %name,
            ttl_ms = config.ttl.as_millis() as u64,
            stale_ms = config.stale_window.as_millis() as u64,
            max_entries = config.max_entries,
            serves_stale = config.serves_stale(),
            "Cache namespace registered"
        );
        Ok(namespace)
    }

    /// Returns the typed handle of a registered namespace.
    pub fn namespace<V>(&self, name: &str) -> Result<Arc<Namespace<V>>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let erased = self.erased(name)?;
        erased
            .into_any()
            .downcast::<Namespace<V>>()
            .map_err(|_| CacheError::TypeMismatch {
                namespace: name.to_string(),
                expected: type_name::<V>(),
            })
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.read().contains_key(name)
    }

    /// Nombres de los namespaces registrados, ordenados.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Gets `key` from `namespace`, producing it if needed.
    ///
    /// See [`Namespace::get`] for the fresh / stale / miss behaviour.
    pub async fn get<V, F, Fut>(
        &self,
        namespace: &str,
        key: &str,
        produce: F,
    ) -> Result<V, CacheError>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        self.namespace::<V>(namespace)?.get(key, produce).await
    }

    /// Stores a fresh value.
    pub fn set<V>(&self, namespace: &str, key: &str, value: V) -> Result<(), CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.namespace::<V>(namespace)?.set(key, value)
    }

    /// Removes one entry. Returns true if it existed.
    pub fn invalidate(&self, namespace: &str, key: &str) -> Result<bool, CacheError> {
        Ok(self.erased(namespace)?.invalidate(key))
    }

    /// Removes every entry of `namespace` whose key matches a glob pattern.
    pub fn invalidate_matching(
        &self,
        namespace: &str,
        pattern: &str,
    ) -> Result<InvalidationResult, CacheError> {
        Ok(self.erased(namespace)?.invalidate_matching(pattern))
    }

    /// Removes every entry of `namespace`. Returns how many were removed.
    pub fn clear(&self, namespace: &str) -> Result<usize, CacheError> {
        Ok(self.erased(namespace)?.clear())
    }

    /// Removes dead entries across all namespaces.
    pub fn sweep(&self) -> usize {
        let namespaces: Vec<Arc<dyn ErasedNamespace>> =
            self.namespaces.read().values().cloned().collect();

        let removed: usize = namespaces.iter().map(|ns| ns.sweep()).sum();
        debug!(
            namespaces = namespaces.len(),
            removed = removed,
            "Cache sweep finished"
        );
        removed
    }

    /// Statistics for one namespace.
    pub fn stats(&self, namespace: &str) -> Result<CacheStats, CacheError> {
        Ok(self.erased(namespace)?.stats())
    }

    /// Statistics for every namespace, sorted by name.
    pub fn all_stats(&self) -> Vec<CacheStats> {
        let namespaces: Vec<Arc<dyn ErasedNamespace>> =
            self.namespaces.read().values().cloned().collect();

        let mut stats: Vec<CacheStats> = namespaces.iter().map(|ns| ns.stats()).collect();
        stats.sort_by(|a, b| a.namespace.cmp(&b.namespace));
        stats
    }

    fn erased(&self, name: &str) -> Result<Arc<dyn ErasedNamespace>, CacheError> {
        self.namespaces
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::NamespaceNotFound(name.to_string()))
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn registry() -> CacheRegistry {
        let registry = CacheRegistry::new();
        registry
            .register::<String>("students", NamespaceConfig::default())
            .unwrap();
        registry
            .register::<u64>("dashboard", NamespaceConfig::new(Duration::from_secs(60)))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_duplicate_fails() {
        let registry = registry();

        let result = registry.register::<String>("students", NamespaceConfig::default());
        assert!(matches!(result, Err(CacheError::NamespaceExists(name)) if name == "students"));
    }

    #[test]
    fn test_unknown_namespace() {
        let registry = registry();

        assert!(matches!(
            registry.invalidate("audit", "k"),
            Err(CacheError::NamespaceNotFound(_))
        ));
        assert!(matches!(
            registry.stats("audit"),
            Err(CacheError::NamespaceNotFound(_))
        ));
        assert!(matches!(
            registry.set("audit", "k", 1u64),
            Err(CacheError::NamespaceNotFound(_))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();

        let result = registry.namespace::<u64>("students");
        assert!(matches!(result, Err(CacheError::TypeMismatch { .. })));
        assert!(registry.namespace::<String>("students").is_ok());
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let registry = CacheRegistry::new();
        registry
            .register::<String>("a", NamespaceConfig::default())
            .unwrap();
        registry
            .register::<String>("b", NamespaceConfig::default())
            .unwrap();

        registry.set("a", "k", "from-a".to_string()).unwrap();
        registry.set("b", "k", "from-b".to_string()).unwrap();

        assert!(registry.invalidate("a", "k").unwrap());

        let value: String = registry
            .get("b", "k", || async { Ok("produced".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "from-b");
        assert_eq!(registry.stats("a").unwrap().entries, 0);
    }

    #[test]
    fn test_clones_share_namespaces() {
        let registry = registry();
        let clone = registry.clone();

        clone.set("dashboard", "total", 10u64).unwrap();
        assert_eq!(registry.stats("dashboard").unwrap().entries, 1);
    }

    #[test]
    fn test_all_stats_sorted() {
        let registry = registry();

        let names: Vec<String> = registry
            .all_stats()
            .into_iter()
            .map(|s| s.namespace)
            .collect();
        assert_eq!(names, vec!["dashboard".to_string(), "students".to_string()]);
        assert_eq!(registry.namespaces(), names);
    }
}
