use crate::config::Settings;
use crate::error::{EngineError, Result};
use crate::generator::{CodeGenerator, RandomGenerator};
use linklet_core::{KeyValueStore, ShortCode};
use linklet_persistence::{PersistenceAdapter, RedisBackend};
use linklet_store::MemoryStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Default cap on collision re-draws before giving up.
///
/// With 62^6 ≈ 56.8 billion codes, even a second draw is astronomically
/// unlikely; the cap only matters when the store is pathologically full.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// What a [`ShortenerEngine::clear`] call wipes.
///
/// Durable records can outlive an index reset; whether test isolation
/// should also wipe persistent state is a policy choice, so the caller
/// makes it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Reset the forward and reverse indices only.
    Indexes,
    /// Reset the indices and ask the persistence adapter to drop its
    /// records as well (best-effort, like every persistence operation).
    IndexesAndRecords,
}

/// The deduplicating URL-shortener engine.
///
/// Holds two independent [`KeyValueStore`] namespaces — the forward
/// index (code → URL, serving redirects) and the reverse index
/// (URL → code, serving dedup) — plus a code generator and a
/// persistence adapter.
///
/// The two indices always agree: entries are written pairwise under the
/// engine's write lock, are never mutated afterwards, and are only
/// removed by [`clear`](Self::clear). URL comparison is exact byte
/// equality; no normalization is performed, so `http://a` and
/// `https://a` get distinct codes.
#[derive(Debug, Clone)]
pub struct ShortenerEngine<S, G> {
    forward: Arc<S>,
    reverse: Arc<S>,
    generator: Arc<G>,
    persistence: Arc<PersistenceAdapter>,
    // Serializes the check-generate-write section of add_url. A single
    // writer closes the check-then-act race (two concurrent calls for
    // the same URL both observing "absent") and guarantees two inserts
    // can never claim the same candidate code.
    write_lock: Arc<Mutex<()>>,
    max_attempts: u32,
}

impl<S: KeyValueStore, G: CodeGenerator> ShortenerEngine<S, G> {
    /// Creates an engine from its parts.
    ///
    /// `forward` and `reverse` must be independent namespaces of the
    /// same store kind.
    ///
    /// Index pairing is best-effort on store failure: with a fallible
    /// backend, a reverse-index write that errors after the forward
    /// write succeeded leaves an orphaned forward entry, which wastes
    /// one code but never hands out a code that fails to resolve. The
    /// default in-memory assembly cannot fail mid-pair.
    pub fn new(forward: S, reverse: S, generator: G, persistence: PersistenceAdapter) -> Self {
        Self {
            forward: Arc::new(forward),
            reverse: Arc::new(reverse),
            generator: Arc::new(generator),
            persistence: Arc::new(persistence),
            write_lock: Arc::new(Mutex::new(())),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the collision re-draw cap.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the persistence adapter, for stats queries and listing.
    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    /// Generates a short code that is free in the forward index.
    ///
    /// Re-draws the entire candidate (not individual characters) on a
    /// collision, up to the attempt cap.
    pub async fn generate_code(&self) -> Result<ShortCode> {
        for attempt in 0..self.max_attempts {
            let candidate = self.generator.generate();
            if !self.forward.exists(candidate.as_str()).await? {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "code collision resolved by re-draw");
                }
                return Ok(candidate);
            }
        }

        warn!(
            attempts = self.max_attempts,
            "exhausted code generation attempts"
        );
        Err(EngineError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Deduplicating insert: returns the existing code for a URL already
    /// shortened, or generates a fresh one and records the pair.
    ///
    /// Idempotent per exact URL string. On a new URL the persistence
    /// adapter is informed on a background task; the call never waits on
    /// durable storage.
    pub async fn add_url(&self, url: &str) -> Result<ShortCode> {
        // Fast path: URL already shortened, no lock needed.
        if let Some(code) = self.reverse.get(url).await? {
            trace!(code = %code, "url already shortened");
            return Ok(ShortCode::new_unchecked(code));
        }

        let _guard = self.write_lock.lock().await;

        // Re-check under the lock: a racing call for the same URL may
        // have won between our fast-path read and the lock acquisition.
        if let Some(code) = self.reverse.get(url).await? {
            trace!(code = %code, "url shortened by concurrent call");
            return Ok(ShortCode::new_unchecked(code));
        }

        let code = self.generate_code().await?;

        // Forward first: an orphaned forward entry only wastes a code,
        // while an orphaned reverse entry would hand out codes that
        // don't resolve.
        self.forward.set(code.as_str(), url).await?;
        self.reverse.set(url, code.as_str()).await?;
        debug!(code = %code, "shortened new url");

        let persistence = Arc::clone(&self.persistence);
        let saved_code = code.clone();
        let saved_url = url.to_owned();
        tokio::spawn(async move {
            persistence.save_record(&saved_code, &saved_url).await;
        });

        Ok(code)
    }

    /// Resolves a short code to its original URL via the forward index.
    /// Returns `None` for unknown codes.
    pub async fn resolve(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self.forward.get(code.as_str()).await?)
    }

    /// Resolves a raw code string as received from a redirect request.
    ///
    /// Validates the string before touching the index, so malformed
    /// input is rejected without a store round trip.
    pub async fn resolve_str(&self, code: &str) -> Result<Option<String>> {
        let code = ShortCode::new(code)?;
        self.resolve(&code).await
    }

    /// Records a redirect through a code. Fire-and-forget semantics for
    /// the caller: returns the new click count, or `0` when persistence
    /// is disabled or unavailable. Never fails.
    pub async fn record_click(&self, code: &ShortCode) -> u64 {
        self.persistence.increment_clicks(code).await
    }

    /// Number of codes currently in the forward index.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.forward.len().await?)
    }

    /// Whether the forward index is empty.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Resets state for testing or an explicit operator wipe.
    pub async fn clear(&self, scope: ClearScope) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.forward.clear().await?;
        self.reverse.clear().await?;

        if scope == ClearScope::IndexesAndRecords {
            self.persistence.clear().await;
        }

        Ok(())
    }

    /// Releases persistence resources. Idempotent graceful shutdown.
    pub async fn shutdown(&self) {
        self.persistence.disconnect().await;
    }
}

impl ShortenerEngine<MemoryStore, RandomGenerator> {
    /// Assembles the standard engine: memory-backed indices, the uniform
    /// random generator, and persistence per [`Settings`].
    ///
    /// A missing database URL means persistence runs disabled; a
    /// configured backend that cannot be reached at startup is logged
    /// and likewise falls back to disabled. Neither crashes the core.
    pub async fn from_settings(settings: &Settings) -> Self {
        let persistence = match &settings.database_url {
            None => {
                debug!("no database url configured, persistence disabled");
                PersistenceAdapter::disabled()
            }
            Some(url) => match RedisBackend::connect(url).await {
                Ok(backend) => PersistenceAdapter::enabled(backend),
                Err(e) => {
                    warn!(error = %e, "persistence backend unreachable, running disabled");
                    PersistenceAdapter::disabled()
                }
            },
        };

        Self::new(
            MemoryStore::new(),
            MemoryStore::new(),
            RandomGenerator::new(),
            persistence,
        )
    }
}
