//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing credentials are not fatal;
//! see [`GatewayConfig::missing_credentials`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default candidate models, most capable first, most compatible last.
pub const DEFAULT_MODEL_CANDIDATES: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-flash-latest",
    "gemini-1.5-flash",
];

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string, if configured.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// When false, events live in an in-memory store for the process lifetime.
    pub persistence_enabled: bool,

    /// Inference provider API key, if configured.
    pub gemini_api_key: Option<String>,

    /// Base URL of the Gemini REST API.
    pub gemini_api_base: String,

    /// Ordered fallback list of model identifiers.
    pub model_candidates: Vec<String>,

    /// Upper bound in seconds for a single candidate attempt.
    pub model_attempt_timeout_secs: u64,

    /// Replacement for the default extraction directive.
    pub extraction_prompt: Option<String>,

    /// Directory where flyer uploads are written.
    pub upload_dir: PathBuf,

    /// Directory where avatar uploads are written.
    pub profile_dir: PathBuf,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()?;

        let database_url = non_empty_env("DATABASE_URL");
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 0);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);
        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);

        let gemini_api_key =
            non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY"));
        let gemini_api_base = non_empty_env("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        let model_candidates = non_empty_env("MODEL_CANDIDATES")
            .map(|raw| parse_candidate_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_MODEL_CANDIDATES
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            });
        let model_attempt_timeout_secs = parse_env("MODEL_ATTEMPT_TIMEOUT_SECS", 60);
        let extraction_prompt = non_empty_env("EXTRACTION_PROMPT");

        let upload_dir = PathBuf::from(
            non_empty_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
        );
        let profile_dir = PathBuf::from(
            non_empty_env("PROFILE_DIR").unwrap_or_else(|| "profiles".to_string()),
        );
        let max_upload_bytes = parse_env("MAX_UPLOAD_BYTES", 16 * 1024 * 1024);

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            persistence_enabled,
            gemini_api_key,
            gemini_api_base,
            model_candidates,
            model_attempt_timeout_secs,
            extraction_prompt,
            upload_dir,
            profile_dir,
            max_upload_bytes,
            log_json,
        })
    }

    /// Per-candidate timeout as a [`Duration`].
    #[must_use]
    pub const fn model_attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.model_attempt_timeout_secs)
    }

    /// Names of required credentials that are not configured.
    ///
    /// Startup logs a warning for each; requests that need them fail
    /// individually.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.persistence_enabled && self.database_url.is_none() {
            missing.push("DATABASE_URL");
        }
        if self.gemini_api_key.is_none() {
            missing.push("GEMINI_API_KEY");
        }
        missing
    }
}

/// Splits a comma-separated model list, dropping blanks.
fn parse_candidate_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads an environment variable, treating blank values as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_list_trims_and_drops_blanks() {
        let list = parse_candidate_list(" gemini-2.5-flash, ,gemini-1.5-flash ,");
        assert_eq!(list, vec!["gemini-2.5-flash", "gemini-1.5-flash"]);
    }

    #[test]
    fn candidate_list_of_only_commas_is_empty() {
        assert!(parse_candidate_list(",,").is_empty());
    }
}
