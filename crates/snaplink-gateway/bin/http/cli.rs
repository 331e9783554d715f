use clap::{Parser, ValueEnum};
use snaplink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SNAPLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNAPLINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNAPLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SNAPLINK_MYSQL_DSN";
pub const STORE_TIMEOUT_MS_ENV: &str = "SNAPLINK_STORE_TIMEOUT_MS";
pub const MAX_GENERATION_ATTEMPTS_ENV: &str = "SNAPLINK_MAX_GENERATION_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "SNAPLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snaplink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin prepended to slugs in create responses.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Deadline for each store call, in milliseconds.
    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    #[arg(
        long,
        env = MAX_GENERATION_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_GENERATION_ATTEMPTS
    )]
    pub max_generation_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
