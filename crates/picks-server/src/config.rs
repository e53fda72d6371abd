use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("no admin credential configured; set PICKS_ADMIN_PASSWORD or PICKS_ADMIN_TOKENS")]
    NoAdminCredential,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Where the override document is persisted; `None` runs memory-only.
    pub state_file: Option<PathBuf>,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub admin_tokens: Vec<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("state_file", &self.state_file)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[redacted]"),
            )
            .field("admin_tokens", &format!("[{} redacted]", self.admin_tokens.len()))
            .finish()
    }
}

/// Load server configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or no admin credential is set.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_server_config(|key| std::env::var(key))
}

/// Build server configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the process environment so tests can
/// drive it with a pure `HashMap` lookup.
fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let bind_addr = {
        let raw = or_default("PICKS_BIND_ADDR", "127.0.0.1:8788");
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "PICKS_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?
    };
    let log_level = or_default("PICKS_LOG_LEVEL", "info");
    let state_file = lookup("PICKS_STATE_FILE").ok().map(PathBuf::from);

    let admin_username = or_default("PICKS_ADMIN_USER", "admin");
    let admin_password = lookup("PICKS_ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());
    let admin_tokens: Vec<String> = lookup("PICKS_ADMIN_TOKENS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    // Writes are always auth-gated; refusing to start beats an open store.
    if admin_password.is_none() && admin_tokens.is_empty() {
        return Err(ConfigError::NoAdminCredential);
    }

    Ok(ServerConfig {
        bind_addr,
        log_level,
        state_file,
        admin_username,
        admin_password,
        admin_tokens,
    })
}
