//! Durable records and click counters for shortened URLs.
//!
//! Persistence is strictly best-effort: the in-memory indices are the
//! authority for serving redirects, and a broken backend must never be
//! visible to callers of the engine. The fallible [`PersistenceBackend`]
//! trait carries the real I/O; the [`PersistenceAdapter`] wraps it and
//! converts every failure into the documented default at the boundary.

pub mod adapter;
pub mod backend;
pub mod error;
pub mod memory;
pub mod redis;

pub use adapter::PersistenceAdapter;
pub use backend::PersistenceBackend;
pub use error::PersistenceError;
pub use memory::MemoryBackend;
pub use redis::RedisBackend;
