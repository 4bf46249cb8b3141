//! Shared configuration for Runpad.
//!
//! Locates Runpad's state directory and resolves the remote execution
//! endpoint.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.runpad/
//! ├── .env.local         # Optional environment overrides
//! └── repl_history.txt   # REPL line history
//! ```
//!
//! # Environment Variables
//!
//! - `RUNPAD_STATE_DIR`: Override the state directory
//! - `RUNPAD_API_URL`: Override the remote execution service base URL

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "RUNPAD_STATE_DIR";

/// Environment variable for the remote execution service base URL.
pub const API_URL_ENV: &str = "RUNPAD_API_URL";

/// Base URL of the hosted remote execution service.
pub const DEFAULT_API_URL: &str = "https://priyanshu-compiler.up.railway.app";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".runpad";

const HISTORY_FILE: &str = "repl_history.txt";
const ENV_FILE: &str = ".env.local";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Runpad state directory.
///
/// The state directory is determined by:
/// 1. `RUNPAD_STATE_DIR` environment variable if set
/// 2. `~/.runpad` if home directory is available
/// 3. `.runpad` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the REPL history file path.
pub fn history_file() -> PathBuf {
    history_file_in(&state_dir())
}

/// Get the REPL history file path inside a given state directory.
pub fn history_file_in(dir: &Path) -> PathBuf {
    dir.join(HISTORY_FILE)
}

/// Get the `.env.local` file path inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE)
}

/// Load environment overrides.
///
/// Reads `.env.local` from the working directory first, then from the state
/// directory. Variables already set in the process environment win; missing
/// files are ignored.
pub fn load_env() {
    if dotenvy::from_filename(ENV_FILE).is_ok() {
        debug!("loaded {} from working directory", ENV_FILE);
    }
    let path = env_file();
    if dotenvy::from_path(&path).is_ok() {
        debug!(path = %path.display(), "loaded environment file");
    }
}

/// Parse and validate a remote execution service base URL.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Get the remote execution service base URL.
///
/// Uses `RUNPAD_API_URL` if set, otherwise [`DEFAULT_API_URL`].
pub fn api_base_url() -> Result<Url> {
    match std::env::var(API_URL_ENV) {
        Ok(raw) if !raw.trim().is_empty() => parse_api_url(&raw),
        _ => parse_api_url(DEFAULT_API_URL),
    }
}

/// Ensure the state directory exists, creating it if necessary.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_state_dir() -> Result<PathBuf> {
    ensure_dir(&state_dir())
}

/// Ensure `dir` exists, creating it and its parents if necessary.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        debug!(path = %dir.display(), "creating state directory");
        std::fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}
