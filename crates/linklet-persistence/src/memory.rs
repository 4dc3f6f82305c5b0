use crate::backend::PersistenceBackend;
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use linklet_core::{ShortCode, UrlRecord};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory stored record plus an insertion sequence number.
///
/// The sequence number breaks creation-time ties so `list_all` ordering
/// stays stable even when two records land on the same clock tick.
#[derive(Debug, Clone)]
struct Stored {
    record: UrlRecord,
    seq: u64,
}

/// In-memory implementation of [`PersistenceBackend`].
///
/// The mock backend the engine runs against when no database is
/// configured but durable-looking stats are still wanted, and the
/// workhorse for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: DashMap<String, Stored>,
    next_seq: AtomicU64,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn save_record(&self, code: &ShortCode, url: &str) -> Result<()> {
        if let Some(mut stored) = self.records.get_mut(code.as_str()) {
            stored.record.updated_at = Timestamp::now();
            return Ok(());
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.records.insert(
            code.as_str().to_owned(),
            Stored {
                record: UrlRecord::new(code.clone(), url),
                seq,
            },
        );
        Ok(())
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64> {
        let Some(mut stored) = self.records.get_mut(code.as_str()) else {
            return Ok(0);
        };

        stored.record.click_count += 1;
        stored.record.updated_at = Timestamp::now();
        Ok(stored.record.click_count)
    }

    async fn get_stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .records
            .get(code.as_str())
            .map(|stored| stored.record.clone()))
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        let mut stored: Vec<Stored> = self.records.iter().map(|e| e.value().clone()).collect();
        stored.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.record).collect())
    }

    async fn clear(&self) -> Result<()> {
        self.records.clear();
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get_stats() {
        let backend = MemoryBackend::new();

        backend
            .save_record(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        let record = backend.get_stats(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.click_count, 0);
    }

    #[tokio::test]
    async fn get_stats_unknown_code() {
        let backend = MemoryBackend::new();

        assert!(backend.get_stats(&code("nope00")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_existing_bumps_only_updated_at() {
        let backend = MemoryBackend::new();

        backend
            .save_record(&code("abc123"), "https://example.com")
            .await
            .unwrap();
        backend.increment_clicks(&code("abc123")).await.unwrap();

        let before = backend.get_stats(&code("abc123")).await.unwrap().unwrap();

        backend
            .save_record(&code("abc123"), "https://other.com")
            .await
            .unwrap();

        let after = backend.get_stats(&code("abc123")).await.unwrap().unwrap();
        // Content untouched, click count preserved, only updated_at moves.
        assert_eq!(after.original_url, "https://example.com");
        assert_eq!(after.click_count, 1);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn increment_clicks_counts_up() {
        let backend = MemoryBackend::new();

        backend
            .save_record(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        assert_eq!(backend.increment_clicks(&code("abc123")).await.unwrap(), 1);
        assert_eq!(backend.increment_clicks(&code("abc123")).await.unwrap(), 2);
        assert_eq!(backend.increment_clicks(&code("abc123")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn increment_clicks_unknown_code_returns_zero() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.increment_clicks(&code("nope00")).await.unwrap(), 0);
        // No stray record materialized by the increment.
        assert!(backend.get_stats(&code("nope00")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_newest_first() {
        let backend = MemoryBackend::new();

        backend
            .save_record(&code("aaa000"), "https://first.com")
            .await
            .unwrap();
        backend
            .save_record(&code("bbb000"), "https://second.com")
            .await
            .unwrap();
        backend
            .save_record(&code("ccc000"), "https://third.com")
            .await
            .unwrap();

        let records = backend.list_all().await.unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.original_url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://third.com", "https://second.com", "https://first.com"]
        );
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let backend = MemoryBackend::new();

        backend
            .save_record(&code("abc123"), "https://example.com")
            .await
            .unwrap();
        backend.clear().await.unwrap();

        assert!(backend.list_all().await.unwrap().is_empty());
        assert!(backend.get_stats(&code("abc123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let backend = MemoryBackend::new();

        backend.disconnect().await.unwrap();
        backend.disconnect().await.unwrap();
    }
}
