use crate::backend::PersistenceBackend;
use crate::error::{PersistenceError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use linklet_core::{ShortCode, UrlRecord};
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::{debug, trace};

const FIELD_URL: &str = "url";
const FIELD_CLICKS: &str = "clicks";
const FIELD_CREATED_AT: &str = "created_at";
const FIELD_UPDATED_AT: &str = "updated_at";

/// Sorted set of codes scored by creation time, for newest-first listing.
const INDEX_KEY: &str = "lk:rec:created";

/// Persistence must degrade instead of hanging, so every call is bounded.
const RESPONSE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);
const CONNECTION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Generates the hash key holding the record for a short code.
fn record_key(code: &ShortCode) -> String {
    format!("lk:rec:{}", code.as_str())
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> PersistenceError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        PersistenceError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        PersistenceError::Unavailable(message)
    } else {
        PersistenceError::Operation(message)
    }
}

fn now_micros() -> i64 {
    Timestamp::now().as_microsecond()
}

fn parse_timestamp(field: &str, raw: &str) -> Result<Timestamp> {
    let micros: i64 = raw
        .parse()
        .map_err(|_| PersistenceError::InvalidData(format!("{field} is not a number: '{raw}'")))?;
    Timestamp::from_microsecond(micros)
        .map_err(|e| PersistenceError::InvalidData(format!("{field} out of range: {e}")))
}

/// Redis implementation of [`PersistenceBackend`].
///
/// Each record is a hash under `lk:rec:{code}` (url, clicks, created_at,
/// updated_at). Clicks are counted with `HINCRBY`, which keeps the
/// increment atomic without a round trip. A sorted set scored by
/// creation time backs `list_all`'s newest-first ordering.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisBackend {
    /// Creates a backend over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Creates a backend by opening a new connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client =
            redis::Client::open(redis_url).map_err(|e| map_redis_error("open client", e))?;
        let config = redis::AsyncConnectionConfig::new()
            .set_connection_timeout(Some(CONNECTION_TIMEOUT))
            .set_response_timeout(Some(RESPONSE_TIMEOUT));
        let conn = client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(|e| map_redis_error("connect", e))?;
        Ok(Self::new(conn))
    }

    fn record_from_fields(code: &ShortCode, fields: HashMap<String, String>) -> Result<UrlRecord> {
        let field = |name: &str| {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| PersistenceError::InvalidData(format!("missing field '{name}'")))
        };

        let original_url = field(FIELD_URL)?;
        let clicks = field(FIELD_CLICKS)?;
        let click_count: u64 = clicks.parse().map_err(|_| {
            PersistenceError::InvalidData(format!("clicks is not a number: '{clicks}'"))
        })?;

        Ok(UrlRecord {
            code: code.clone(),
            original_url,
            click_count,
            created_at: parse_timestamp(FIELD_CREATED_AT, &field(FIELD_CREATED_AT)?)?,
            updated_at: parse_timestamp(FIELD_UPDATED_AT, &field(FIELD_UPDATED_AT)?)?,
        })
    }
}

#[async_trait]
impl PersistenceBackend for RedisBackend {
    async fn save_record(&self, code: &ShortCode, url: &str) -> Result<()> {
        trace!(code = %code, "saving record");
        let key = record_key(code);
        let now = now_micros();
        let mut conn = self.conn.clone();

        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| map_redis_error("save_record", e))?;

        if exists {
            // Re-shorten of a known code: content is immutable, only the
            // modification timestamp moves.
            return conn
                .hset::<_, _, _, ()>(&key, FIELD_UPDATED_AT, now)
                .await
                .map_err(|e| map_redis_error("save_record", e));
        }

        redis::pipe()
            .atomic()
            .hset(&key, FIELD_URL, url)
            .ignore()
            .hset(&key, FIELD_CLICKS, 0u64)
            .ignore()
            .hset(&key, FIELD_CREATED_AT, now)
            .ignore()
            .hset(&key, FIELD_UPDATED_AT, now)
            .ignore()
            .zadd(INDEX_KEY, code.as_str(), now)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("save_record", e))
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<u64> {
        let key = record_key(code);
        let mut conn = self.conn.clone();

        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| map_redis_error("increment_clicks", e))?;
        if !exists {
            return Ok(0);
        }

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .hincr(&key, FIELD_CLICKS, 1)
            .hset(&key, FIELD_UPDATED_AT, now_micros())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("increment_clicks", e))?;

        Ok(count)
    }

    async fn get_stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(record_key(code))
            .await
            .map_err(|e| map_redis_error("get_stats", e))?;

        if fields.is_empty() {
            return Ok(None);
        }

        Self::record_from_fields(code, fields).map(Some)
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        let mut conn = self.conn.clone();
        let codes: Vec<String> = conn
            .zrevrange(INDEX_KEY, 0, -1)
            .await
            .map_err(|e| map_redis_error("list_all", e))?;

        let mut records = Vec::with_capacity(codes.len());
        for code in codes {
            let code = ShortCode::new_unchecked(code);
            // A record deleted between the index read and the hash read
            // is simply skipped.
            if let Some(record) = self.get_stats(&code).await? {
                records.push(record);
            }
        }

        Ok(records)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let codes: Vec<String> = conn
            .zrange(INDEX_KEY, 0, -1)
            .await
            .map_err(|e| map_redis_error("clear", e))?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for code in &codes {
            pipe.del(record_key(&ShortCode::new_unchecked(code.clone())))
                .ignore();
        }
        pipe.del(INDEX_KEY).ignore();

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("clear", e))
    }

    async fn disconnect(&self) -> Result<()> {
        // The multiplexed connection closes when the last clone drops;
        // nothing to tear down eagerly.
        debug!("redis persistence backend disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // End-to-end coverage needs a running Redis instance; adapter and
    // engine tests exercise the trait through the in-memory backend.

    #[test]
    fn record_key_format() {
        let code = ShortCode::new_unchecked("abc123");
        assert_eq!(record_key(&code), "lk:rec:abc123");
    }

    #[test]
    fn record_from_fields_parses() {
        let code = ShortCode::new_unchecked("abc123");
        let mut fields = HashMap::new();
        fields.insert(FIELD_URL.to_string(), "https://example.com".to_string());
        fields.insert(FIELD_CLICKS.to_string(), "7".to_string());
        fields.insert(FIELD_CREATED_AT.to_string(), "1700000000000000".to_string());
        fields.insert(FIELD_UPDATED_AT.to_string(), "1700000001000000".to_string());

        let record = RedisBackend::record_from_fields(&code, fields).unwrap();
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.click_count, 7);
        assert!(record.updated_at > record.created_at);
    }

    #[test]
    fn record_from_fields_rejects_garbage() {
        let code = ShortCode::new_unchecked("abc123");
        let mut fields = HashMap::new();
        fields.insert(FIELD_URL.to_string(), "https://example.com".to_string());
        fields.insert(FIELD_CLICKS.to_string(), "many".to_string());
        fields.insert(FIELD_CREATED_AT.to_string(), "0".to_string());
        fields.insert(FIELD_UPDATED_AT.to_string(), "0".to_string());

        let err = RedisBackend::record_from_fields(&code, fields).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidData(_)));
    }
}
