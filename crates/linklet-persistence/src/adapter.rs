use crate::backend::PersistenceBackend;
use linklet_core::{ShortCode, UrlRecord};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// The never-failing boundary in front of a [`PersistenceBackend`].
///
/// The adapter has two modes, fixed at construction time:
///
/// * **Disabled** — no backend configured; every operation is a no-op
///   returning its documented default.
/// * **Enabled** — operations delegate to the backend, and any error is
///   logged and converted to the same default the disabled mode returns.
///
/// Callers cannot distinguish a backend failure from a missing record,
/// and none of these methods can fail: redirects stay available even
/// when durable storage is down.
#[derive(Clone)]
pub struct PersistenceAdapter {
    backend: Option<Arc<dyn PersistenceBackend>>,
}

impl PersistenceAdapter {
    /// Creates an adapter with no backend; every operation is a no-op.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Creates an adapter delegating to the given backend.
    pub fn enabled(backend: impl PersistenceBackend) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    /// Whether a backend is configured.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Saves a record, best-effort. See [`PersistenceBackend::save_record`].
    pub async fn save_record(&self, code: &ShortCode, url: &str) {
        let Some(backend) = &self.backend else {
            trace!(code = %code, "persistence disabled, skipping save");
            return;
        };

        if let Err(e) = backend.save_record(code, url).await {
            warn!(code = %code, error = %e, "failed to persist record");
        }
    }

    /// Increments the click counter, best-effort. Returns the new count,
    /// or `0` when the record is missing, the backend failed, or
    /// persistence is disabled.
    pub async fn increment_clicks(&self, code: &ShortCode) -> u64 {
        let Some(backend) = &self.backend else {
            return 0;
        };

        match backend.increment_clicks(code).await {
            Ok(count) => count,
            Err(e) => {
                warn!(code = %code, error = %e, "failed to increment click count");
                0
            }
        }
    }

    /// Point lookup of a record. `None` covers missing records, backend
    /// failures, and disabled persistence alike.
    pub async fn get_stats(&self, code: &ShortCode) -> Option<UrlRecord> {
        let backend = self.backend.as_ref()?;

        match backend.get_stats(code).await {
            Ok(record) => record,
            Err(e) => {
                warn!(code = %code, error = %e, "failed to fetch record stats");
                None
            }
        }
    }

    /// Lists all records, newest first. Empty on failure or when disabled.
    pub async fn list_all(&self) -> Vec<UrlRecord> {
        let Some(backend) = &self.backend else {
            return Vec::new();
        };

        match backend.list_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to list records");
                Vec::new()
            }
        }
    }

    /// Removes every record, best-effort. Testing/reset only.
    pub async fn clear(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        if let Err(e) = backend.clear().await {
            warn!(error = %e, "failed to clear records");
        }
    }

    /// Releases backend resources. Idempotent; used for graceful
    /// shutdown and test teardown.
    pub async fn disconnect(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        if let Err(e) = backend.disconnect().await {
            warn!(error = %e, "error while disconnecting persistence backend");
        }
    }
}

impl fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("mode", &if self.is_enabled() { "enabled" } else { "disabled" })
            .finish()
    }
}
