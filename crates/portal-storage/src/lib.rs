//! Key-value [`Store`](portal_core::Store) adapters for the Portal engine.
//!
//! [`RedisStore`] is the production backend; [`InMemoryStore`] keeps the
//! same expiry semantics in process for local runs and tests.

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use redis::{RedisConfig, RedisStore};
