use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A durable record of a shortened URL, as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code the record is keyed by.
    pub code: ShortCode,
    /// The original URL, byte-for-byte as submitted.
    pub original_url: String,
    /// Number of recorded redirects through this code.
    pub click_count: u64,
    /// When the record was first created.
    pub created_at: Timestamp,
    /// When the record was last touched (re-shorten or click).
    pub updated_at: Timestamp,
}

impl UrlRecord {
    /// Creates a fresh record with a zero click count, timestamped now.
    pub fn new(code: ShortCode, original_url: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            code,
            original_url: original_url.into(),
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
