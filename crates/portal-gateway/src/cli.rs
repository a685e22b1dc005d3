use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use portal_storage::RedisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    Redis,
    InMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "portal-gateway", about = "HTTP front end for the portal short-link engine")]
pub struct Cli {
    #[arg(long, env = "PORTAL_LISTEN_ADDR", default_value = "127.0.0.1:8000")]
    pub listen_addr: SocketAddr,

    #[arg(long, env = "PORTAL_STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::Redis)]
    pub storage: StorageBackend,

    #[arg(long, env = "APP_REDIS_ADDR", default_value = "localhost:26379")]
    pub redis_addr: String,

    #[arg(long, env = "APP_REDIS_PASSWD", hide_env_values = true)]
    pub redis_passwd: Option<String>,

    #[arg(long, env = "APP_REDIS_DB", default_value_t = 0)]
    pub redis_db: i64,

    #[arg(long, env = "PORTAL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            addr: self.redis_addr.clone(),
            // an empty password means no AUTH
            password: self.redis_passwd.clone().filter(|p| !p.is_empty()),
            db: self.redis_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["portal-gateway"]).unwrap();
        assert_eq!(cli.listen_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(cli.log_format, LogFormat::Text);
        assert_eq!(cli.redis_config().url(), "redis://localhost:26379/0");
    }

    #[test]
    fn explicit_flags() {
        let cli = Cli::try_parse_from([
            "portal-gateway",
            "--storage",
            "in-memory",
            "--redis-addr",
            "redis.internal:6379",
            "--redis-passwd",
            "secret",
            "--redis-db",
            "2",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackend::InMemory);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(
            cli.redis_config().url(),
            "redis://:secret@redis.internal:6379/2"
        );
    }

    #[test]
    fn empty_password_is_ignored() {
        let cli = Cli::try_parse_from(["portal-gateway", "--redis-passwd", ""]).unwrap();
        assert_eq!(cli.redis_config().password, None);
    }
}
