//! Short-code generation and the deduplicating shortener engine.
//!
//! The engine owns the forward (code → URL) and reverse (URL → code)
//! indices, a [`CodeGenerator`] for fresh candidates, and a persistence
//! adapter it informs about new records in the background. The indices
//! are the authority for serving redirects; persistence is best-effort.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;

pub use config::Settings;
pub use engine::{ClearScope, ShortenerEngine};
pub use error::EngineError;
pub use generator::{CodeGenerator, RandomGenerator};
