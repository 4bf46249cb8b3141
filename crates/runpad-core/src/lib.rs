//! Runpad Core - shared logic for every Runpad interface.
//!
//! - **config**: state directory, history file and API endpoint resolution
//! - **examples**: named example programs per language
//! - **stats**: line and character counts for live statistics
//! - **templates**: the default program shown for each language

pub mod config;
pub mod error;
pub mod examples;
pub mod stats;
pub mod templates;

// Re-export commonly used items for convenience
pub use config::{
    api_base_url, ensure_dir, ensure_state_dir, env_file, history_file, history_file_in, load_env,
    parse_api_url, state_dir, API_URL_ENV, DEFAULT_API_URL, STATE_DIR_ENV,
};
pub use error::{ConfigError, Result};
pub use examples::{example, examples_for, CodeExample};
pub use stats::TextStats;
pub use templates::{default_code, FALLBACK_TEMPLATE};
