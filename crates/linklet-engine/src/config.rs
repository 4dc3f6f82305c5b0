use std::env;

pub const DATABASE_URL_ENV: &str = "LINKLET_DATABASE_URL";
pub const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";
pub const BASE_URL_ENV: &str = "LINKLET_BASE_URL";
pub const BASE_URL_FALLBACK_ENV: &str = "BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Runtime settings for assembling an engine.
///
/// `database_url` decides the persistence mode once, at startup:
/// present means enabled, absent means disabled. `base_url` is only
/// consumed by the display layer to compose full shortened links; the
/// core never needs it. Missing values never crash anything.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Connection string for the persistence backend, if configured.
    pub database_url: Option<String>,
    /// Base URL that shortened links are composed against.
    pub base_url: String,
}

impl Settings {
    /// Reads settings from the environment.
    ///
    /// `LINKLET_DATABASE_URL` (falling back to `DATABASE_URL`) enables
    /// persistence; `LINKLET_BASE_URL` (falling back to `BASE_URL`,
    /// then [`DEFAULT_BASE_URL`]) sets the link base. Empty values are
    /// treated as unset.
    pub fn from_env() -> Self {
        Self {
            database_url: env_var(DATABASE_URL_ENV).or_else(|| env_var(DATABASE_URL_FALLBACK_ENV)),
            base_url: env_var(BASE_URL_ENV)
                .or_else(|| env_var(BASE_URL_FALLBACK_ENV))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
