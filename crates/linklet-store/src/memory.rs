use async_trait::async_trait;
use dashmap::DashMap;
use linklet_core::error::Result;
use linklet_core::KeyValueStore;

/// In-memory implementation of [`KeyValueStore`] using DashMap.
///
/// Each instance is its own namespace, so the forward and reverse
/// indices are simply two separate `MemoryStore` values. DashMap's
/// sharding keeps reads and writes to different keys from contending
/// on a single map-wide lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_and_get_round_trip() {
        let store = MemoryStore::new();

        store.set("abc123", "https://example.com").await.unwrap();

        let value = store.get("abc123").await.unwrap();
        assert_eq!(value.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn get_absent_key() {
        let store = MemoryStore::new();

        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn round_trip_preserves_bytes() {
        let store = MemoryStore::new();
        let long = format!("https://example.com/{}", "x".repeat(1500));
        let emoji = "https://example.com/路徑?q=🦀🔗";

        store.set("long00", &long).await.unwrap();
        store.set("emoji0", emoji).await.unwrap();

        assert_eq!(store.get("long00").await.unwrap().as_deref(), Some(long.as_str()));
        assert_eq!(store.get("emoji0").await.unwrap().as_deref(), Some(emoji));
    }

    #[tokio::test]
    async fn exists_checks() {
        let store = MemoryStore::new();

        assert!(!store.exists("abc123").await.unwrap());
        store.set("abc123", "https://example.com").await.unwrap();
        assert!(store.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryStore::new();

        store.set("abc123", "https://old.com").await.unwrap();
        store.set("abc123", "https://new.com").await.unwrap();

        assert_eq!(
            store.get("abc123").await.unwrap().as_deref(),
            Some("https://new.com")
        );
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn len_and_clear() {
        let store = MemoryStore::new();

        store.set("a00000", "1").await.unwrap();
        store.set("b00000", "2").await.unwrap();
        assert_eq!(store.len().await.unwrap(), 2);

        store.clear().await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
        assert!(store.get("a00000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn instances_are_isolated_namespaces() {
        let forward = MemoryStore::new();
        let reverse = MemoryStore::new();

        forward.set("abc123", "https://example.com").await.unwrap();

        assert!(!reverse.exists("abc123").await.unwrap());
        assert_eq!(reverse.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .set(&format!("key-{:03}", i), &format!("value-{}", i))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 10);
        for i in 0..10u64 {
            let value = store.get(&format!("key-{:03}", i)).await.unwrap();
            assert_eq!(value, Some(format!("value-{}", i)));
        }
    }
}
