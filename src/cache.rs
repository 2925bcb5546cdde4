use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::MovieId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Poster(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Poster(id) => write!(f, "poster:{}", id),
        }
    }
}

/// Process-lifetime memo shared across request handlers
///
/// Entries are never evicted or replaced: the first value stored under a key wins,
/// so concurrent writers racing on the same key all observe the same value.
#[derive(Clone)]
pub struct Cache<V> {
    entries: Arc<RwLock<HashMap<CacheKey, V>>>,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<V: Clone> Cache<V> {
    /// Retrieves a value from the cache by key
    pub async fn get_from_cache(&self, key: &CacheKey) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores `value` unless the key is already present, returning whichever value is cached
    pub async fn insert(&self, key: CacheKey, value: V) -> V {
        let mut entries = self.entries.write().await;
        let stored = entries.entry(key).or_insert(value).clone();
        tracing::debug!(key = %key, entries = entries.len(), "Cache entry stored");
        stored
    }
}
