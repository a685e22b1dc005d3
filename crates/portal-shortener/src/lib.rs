//! Short-link allocation and resolution engine.
//!
//! [`ShortenerService`] implements [`portal_core::Shortener`] on top of any
//! [`portal_core::Store`]: it derives codes from the store's global counter,
//! deduplicates live URLs through a fingerprint-keyed reverse map and writes
//! the forward, reverse and detail projections with one shared TTL.

pub mod keys;
pub mod service;

pub use keys::KeyLayout;
pub use service::ShortenerService;
