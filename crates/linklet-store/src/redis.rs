use async_trait::async_trait;
use linklet_core::error::{Result, StoreError};
use linklet_core::KeyValueStore;
use redis::AsyncCommands;
use tracing::trace;

/// Generates the data key for an entry in a namespace.
fn data_key(namespace: &str, key: &str) -> String {
    format!("lk:{}:k:{}", namespace, key)
}

/// Generates the key of the companion set tracking a namespace's keys.
fn keyset_key(namespace: &str) -> String {
    format!("lk:{}:keys", namespace)
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// A Redis-backed implementation of [`KeyValueStore`].
///
/// Every instance owns a namespace: data lives under `lk:{ns}:k:{key}`,
/// and a companion set `lk:{ns}:keys` tracks the namespace's keys so
/// `len` and `clear` stay scoped to this instance even when several
/// namespaces share one Redis database.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    namespace: String,
}

impl RedisStore {
    /// Creates a store over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    /// Creates a store by opening a new connection to `redis_url`.
    pub async fn connect(redis_url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client =
            redis::Client::open(redis_url).map_err(|e| map_redis_error("open client", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("connect", e))?;
        Ok(Self::new(conn, namespace))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(namespace = %self.namespace, key = %key, "redis get");
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(data_key(&self.namespace, key))
            .await
            .map_err(|e| map_redis_error("get", e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        trace!(namespace = %self.namespace, key = %key, "redis set");
        let mut conn = self.conn.clone();
        // Data write and keyset membership go together so len/clear
        // never drift from the stored entries.
        redis::pipe()
            .atomic()
            .set(data_key(&self.namespace, key), value)
            .ignore()
            .sadd(keyset_key(&self.namespace), key)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("set", e))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(data_key(&self.namespace, key))
            .await
            .map_err(|e| map_redis_error("exists", e))
    }

    async fn len(&self) -> Result<usize> {
        let mut conn = self.conn.clone();
        conn.scard::<_, usize>(keyset_key(&self.namespace))
            .await
            .map_err(|e| map_redis_error("len", e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .smembers(keyset_key(&self.namespace))
            .await
            .map_err(|e| map_redis_error("clear", e))?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in &keys {
            pipe.del(data_key(&self.namespace, key)).ignore();
        }
        pipe.del(keyset_key(&self.namespace)).ignore();

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("clear", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: exercising the store end to end requires a running Redis
    // instance; trait-level behavior is covered by the engine tests over
    // the in-memory store. These tests pin the key layout.

    #[test]
    fn key_layout_is_namespaced() {
        assert_eq!(data_key("forward", "abc123"), "lk:forward:k:abc123");
        assert_eq!(keyset_key("forward"), "lk:forward:keys");
    }

    #[test]
    fn namespaces_do_not_collide() {
        assert_ne!(data_key("forward", "x"), data_key("reverse", "x"));
        assert_ne!(keyset_key("forward"), keyset_key("reverse"));
    }
}
