use async_trait::async_trait;
use portal_core::store::{Result, Store};
use portal_core::StoreError;
use redis::AsyncCommands;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Connection parameters for a Redis server.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisConfig {
    /// `host:port` of the server.
    #[builder(default = "localhost:26379".to_string(), setter(into))]
    pub addr: String,
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
    #[builder(default = 0)]
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RedisConfig {
    /// Renders the connection URL understood by [`redis::Client::open`].
    ///
    /// The password is percent-encoded; the client decodes it again.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}/{}",
                urlencoding::encode(password),
                self.addr,
                self.db
            ),
            None => format!("redis://{}/{}", self.addr, self.db),
        }
    }
}

/// Redacted form for logs.
impl Display for RedisConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_some() { "***" } else { "<none>" };
        write!(f, "addr={} passwd={} db={}", self.addr, password, self.db)
    }
}

/// A Redis-based implementation of [`Store`].
///
/// Counters use `INCR`, values are plain strings written with `SET EX`.
/// Multi-key writes run inside one `MULTI`/`EXEC` transaction.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    let lower = message.to_ascii_lowercase();
    if lower.contains("timed out") {
        StoreError::Timeout(message)
    } else if err.is_io_error() || lower.contains("connection refused") {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// Redis expiry in whole seconds; `None` stores the key without expiry.
fn expiry_secs(ttl: Duration) -> Option<u64> {
    if ttl.is_zero() {
        None
    } else {
        // Sub-second TTLs would round to 0, which Redis rejects.
        Some(ttl.as_secs().max(1))
    }
}

impl RedisStore {
    /// Creates a new Redis store.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection and verifies it with `PING`.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        debug!(%config, "Connecting to Redis");
        let client = redis::Client::open(config.url())
            .map_err(|e| map_redis_error("invalid redis connection parameters", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to Redis: {e}")))?;

        let store = Self::new(conn);
        store.ping().await?;
        Ok(store)
    }

    /// Round-trips a `PING` to the server.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_redis_error("failed to ping Redis", e))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        trace!(key = %key, "Incrementing counter in Redis");

        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(key, 1).await.map_err(|e| {
            warn!(key = %key, error = %e, "Redis error on incr");
            map_redis_error("failed to increment counter in Redis", e)
        })
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        trace!(key = %key, "Fetching value from Redis");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Hit in Redis");
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(key = %key, "Miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn get_int(&self, key: &str) -> Result<i64> {
        match self.get_string(key).await? {
            Some(value) => value.parse::<i64>().map_err(|_| {
                warn!(key = %key, "Non-integer value in Redis");
                StoreError::InvalidData(format!("value at '{key}' is not an integer"))
            }),
            None => Ok(0),
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        trace!(key = %key, ?ttl, "Storing value in Redis");

        let mut conn = self.conn.clone();
        let result = match expiry_secs(ttl) {
            Some(secs) => conn.set_ex::<_, _, ()>(key, value, secs).await,
            None => conn.set::<_, _, ()>(key, value).await,
        };
        result.map_err(|e| {
            warn!(key = %key, error = %e, "Failed to store value in Redis");
            map_redis_error("failed to write value to Redis", e)
        })
    }

    async fn set_all_with_expiry(&self, entries: &[(String, String)], ttl: Duration) -> Result<()> {
        trace!(count = entries.len(), ?ttl, "Storing values in Redis transaction");

        let secs = expiry_secs(ttl);
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            match secs {
                Some(secs) => pipe.set_ex(key, value, secs).ignore(),
                None => pipe.set(key, value).ignore(),
            };
        }

        let mut conn = self.conn.clone();
        match pipe.query_async::<()>(&mut conn).await {
            Ok(()) => {
                debug!(count = entries.len(), "Committed Redis transaction");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Redis transaction failed");
                Err(map_redis_error("failed to commit transaction to Redis", e))
            }
        }
    }
}
