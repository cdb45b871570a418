use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

/// Keyed cache of shared content (vector forms, pre-broken text).
///
/// Lookup and construction happen under one lock, so concurrent callers for
/// the same key always receive the same `Arc`.
pub struct ContentCache<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash, V> ContentCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Arc<V>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.lock().get(key).cloned()
    }

    pub fn get_or_insert_with(&self, key: K, build: impl FnOnce() -> V) -> Arc<V> {
        self.lock()
            .entry(key)
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with); a failed build
    /// leaves the cache untouched.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        build: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let mut entries = self.lock();
        if let Some(found) = entries.get(&key) {
            return Ok(found.clone());
        }
        let value = Arc::new(build()?);
        entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<K: Eq + Hash, V> Default for ContentCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn concurrent_callers_share_one_build() {
        let cache: ContentCache<&str, String> = ContentCache::new();
        let builds = AtomicUsize::new(0);
        let results: Vec<Arc<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        cache.get_or_insert_with("glyph", || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            "form".to_string()
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_builds_are_not_cached() {
        let cache: ContentCache<u32, u32> = ContentCache::default();
        let failed: Result<Arc<u32>, &str> = cache.get_or_try_insert_with(1, || Err("missing"));
        assert!(failed.is_err());
        assert!(cache.is_empty());
        let built = cache.get_or_try_insert_with(1, || Ok::<_, &str>(7)).unwrap();
        assert_eq!(*built, 7);
        assert_eq!(cache.get(&1).as_deref(), Some(&7));
    }
}
