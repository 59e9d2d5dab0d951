use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::services::prompt::GradingMode;

const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "https://bestion.netlify.app",
    "http://localhost:3000",
    "http://localhost:5173",
    "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "supabase" => Some(Self::Supabase),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supabase => "supabase",
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub grading_mode: GradingMode,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
    pub record_module_progress: bool,
    pub store_backend: StoreBackend,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let grading_mode = std::env::var("GRADING_MODE")
            .ok()
            .and_then(|value| GradingMode::parse(&value))
            .unwrap_or_default();

        let cors_origins = std::env::var("CORS_ORIGINS")
            .ok()
            .map(|value| parse_origins(&value))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("frontend").join("public"));

        let record_module_progress = env_bool("RECORD_MODULE_PROGRESS").unwrap_or(true);

        let store_backend = std::env::var("STORE_BACKEND")
            .ok()
            .and_then(|value| StoreBackend::parse(&value))
            .unwrap_or(StoreBackend::Supabase);

        Self {
            host,
            port,
            log_level,
            grading_mode,
            cors_origins,
            static_dir,
            record_module_progress,
            store_backend,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
