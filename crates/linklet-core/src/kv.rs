use crate::error::Result;
use async_trait::async_trait;

/// A minimal async key-value capability used as a pluggable index backend.
///
/// The engine holds two independent instances of this trait: a forward
/// index (code → URL) and a reverse index (URL → code). Each instance is
/// its own namespace; implementations must not let instances observe one
/// another's keys. No ordering, iteration, or TTL semantics are required.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Retrieves the value for a key. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value under a key, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Checks whether a key is present.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Returns the number of keys in this namespace.
    async fn len(&self) -> Result<usize>;

    /// Removes every key in this namespace. Testing/reset only.
    async fn clear(&self) -> Result<()>;
}
