use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "UPA Agenda";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_TRIAGE_URL: &str = "http://localhost:11434";
const DEFAULT_TRIAGE_MODEL: &str = "medgemma:4b";
const DEFAULT_TRIAGE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "upa_agenda_lib=info,upa_agenda=info,tower_http=warn"
}

/// Get the application data directory
/// ~/UpaAgenda/ unless overridden by `UPA_AGENDA_DATA_DIR`.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("UPA_AGENDA_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("UpaAgenda")
}

/// Path of the local store file.
pub fn store_path() -> PathBuf {
    app_data_dir().join("agenda.db")
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store_path: PathBuf,
    pub triage_url: String,
    pub triage_model: String,
    pub triage_timeout: Duration,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("UPA_AGENDA_BIND")
            .ok()
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = %raw, "Ignoring invalid UPA_AGENDA_BIND: {e}");
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        Self {
            bind_addr,
            store_path: store_path(),
            triage_url: env_or("UPA_AGENDA_TRIAGE_URL", DEFAULT_TRIAGE_URL),
            triage_model: env_or("UPA_AGENDA_TRIAGE_MODEL", DEFAULT_TRIAGE_MODEL),
            triage_timeout: Duration::from_secs(env_secs(
                "UPA_AGENDA_TRIAGE_TIMEOUT_SECS",
                DEFAULT_TRIAGE_TIMEOUT_SECS,
            )),
            session_ttl: Duration::from_secs(env_secs(
                "UPA_AGENDA_SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: store_path(),
            triage_url: DEFAULT_TRIAGE_URL.to_string(),
            triage_model: DEFAULT_TRIAGE_MODEL.to_string(),
            triage_timeout: Duration::from_secs(DEFAULT_TRIAGE_TIMEOUT_SECS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    DEFAULT_BIND
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8787)))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_secs(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => parse_secs(&raw).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, default, "Invalid duration, using default");
            default
        }),
        Err(_) => default,
    }
}

fn parse_secs(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}
