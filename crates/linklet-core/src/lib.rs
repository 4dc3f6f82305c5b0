//! Core types and traits for the Linklet URL shortener.
//!
//! This crate provides the shared vocabulary used by the storage,
//! engine, and persistence crates: the validated [`ShortCode`] type,
//! the durable [`UrlRecord`], the [`KeyValueStore`] capability, and
//! the error enums crossing crate boundaries.

pub mod error;
pub mod kv;
pub mod record;
pub mod shortcode;

pub use error::{CoreError, StoreError};
pub use kv::KeyValueStore;
pub use record::UrlRecord;
pub use shortcode::{ShortCode, ALPHABET, CODE_LENGTH};
