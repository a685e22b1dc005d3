//! Core types and traits for the Portal link engine.
//!
//! This crate provides the code encoder, the URL fingerprint, the
//! key-value [`Store`] capability and the [`Shortener`] contract shared by
//! the storage adapters, the engine and the gateway.

pub mod base62;
pub mod clock;
pub mod detail;
pub mod error;
pub mod fingerprint;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use detail::LinkDetail;
pub use error::{CoreError, ShortenerError, StoreError};
pub use fingerprint::{fingerprint, Fingerprint};
pub use shortcode::ShortCode;
pub use shortener::{Shortener, MAX_TTL_MINUTES};
pub use store::Store;
