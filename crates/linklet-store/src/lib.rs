//! Key-value store backends for the Linklet indices.
//!
//! Two implementations of [`linklet_core::KeyValueStore`] are provided:
//! an in-memory store backed by `DashMap` and a Redis-backed store with
//! namespaced keys. Which one backs the engine's indices is a wiring
//! decision; the engine only sees the trait.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;
