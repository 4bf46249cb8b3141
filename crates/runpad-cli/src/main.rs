//! Runpad CLI entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use runpad_cli::cli::{Cli, Commands};
use runpad_cli::commands;
use runpad_cli::repl::Repl;
use runpad_models::DEFAULT_LANGUAGE;
use runpad_runtime::RuntimeConfig;

fn main() {
    // Load .env.local overrides (RUNPAD_API_URL etc.) before clap reads env
    runpad_core::load_env();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let state_dir = cli.state_dir();
    let result = commands::runtime_config(cli.api_url.as_deref()).and_then(|config| {
        match cli.command {
            Some(Commands::Repl { language }) => run_repl(state_dir, language, config),
            Some(cmd) => commands::execute(cmd, config),
            None => run_repl(state_dir, None, config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(
    state_dir: Option<PathBuf>,
    language: Option<String>,
    config: RuntimeConfig,
) -> commands::Result<()> {
    let state_dir = match state_dir {
        Some(dir) => runpad_core::ensure_dir(&dir)?,
        None => runpad_core::ensure_state_dir()?,
    };

    let language_id = match language.as_deref() {
        Some(query) => commands::lookup_language(query)?.id,
        None => DEFAULT_LANGUAGE,
    };

    let mut repl = Repl::new(&state_dir, language_id, config)?;
    repl.run()
}
