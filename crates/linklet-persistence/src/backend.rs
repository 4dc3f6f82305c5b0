use crate::error::Result;
use async_trait::async_trait;
use linklet_core::{ShortCode, UrlRecord};

/// A durable store of URL records and click counters.
///
/// Implementations return real errors; the graceful-degradation policy
/// lives one level up, in [`PersistenceAdapter`](crate::adapter::PersistenceAdapter).
/// A missing record is not an error anywhere in this trait.
#[async_trait]
pub trait PersistenceBackend: Send + Sync + 'static {
    /// Creates a record with a zero click count, or if a record for the
    /// code already exists, bumps only its `updated_at` timestamp.
    async fn save_record(&self, code: &ShortCode, url: &str) -> Result<()>;

    /// Atomically increments the click counter for a code and returns
    /// the new count. Returns `0` if no record exists for the code.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64>;

    /// Point lookup of a record. Returns `None` if the code is unknown.
    async fn get_stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Lists all records, ordered by creation time descending.
    async fn list_all(&self) -> Result<Vec<UrlRecord>>;

    /// Removes every record. Testing/reset only.
    async fn clear(&self) -> Result<()>;

    /// Releases underlying resources. Idempotent.
    async fn disconnect(&self) -> Result<()>;
}
