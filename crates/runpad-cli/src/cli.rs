//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Runpad - write code in the terminal and run it remotely
#[derive(Parser, Debug)]
#[command(name = "runpad")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "RUNPAD_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Base URL of the remote execution service
    #[arg(long, env = "RUNPAD_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported languages
    Languages {
        /// Ask the remote service instead of the built-in catalog
        #[arg(short, long)]
        remote: bool,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the starter template for a language
    Template {
        /// Language id, name or extension
        #[arg(required = true)]
        language: String,
    },

    /// List or print example programs for a language
    Examples {
        /// Language id, name or extension
        #[arg(required = true)]
        language: String,

        /// Print the example with this name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Run a program on the remote service
    Run {
        /// Source file (reads standard input if omitted)
        file: Option<PathBuf>,

        /// Language id (inferred from the file extension if omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Text passed to the program's standard input
        #[arg(long, conflicts_with = "stdin_file")]
        stdin: Option<String>,

        /// File whose contents are passed to the program's standard input
        #[arg(long)]
        stdin_file: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Start interactive REPL mode
    Repl {
        /// Language to start with
        #[arg(short, long)]
        language: Option<String>,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

impl Cli {
    /// Returns the state directory override, if any.
    pub fn state_dir(&self) -> Option<PathBuf> {
        self.state_dir
            .as_ref()
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref()))
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args enters REPL mode
        let cli = Cli::parse_from(["runpad"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["runpad", "run", "main.py", "--stdin", "5"]);
        match cli.command {
            Some(Commands::Run {
                file,
                language,
                stdin,
                stdin_file,
                timeout,
            }) => {
                assert_eq!(file, Some(PathBuf::from("main.py")));
                assert!(language.is_none());
                assert_eq!(stdin.as_deref(), Some("5"));
                assert!(stdin_file.is_none());
                assert!(timeout.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_stdin_conflict() {
        let result = Cli::try_parse_from([
            "runpad",
            "run",
            "--stdin",
            "x",
            "--stdin-file",
            "input.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_languages() {
        let cli = Cli::parse_from(["runpad", "languages", "--format", "json"]);
        match cli.command {
            Some(Commands::Languages { remote, format }) => {
                assert!(!remote);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Languages command"),
        }
    }

    #[test]
    fn test_cli_parse_examples() {
        let cli = Cli::parse_from(["runpad", "examples", "bac", "-n", "Calculator"]);
        match cli.command {
            Some(Commands::Examples { language, name }) => {
                assert_eq!(language, "bac");
                assert_eq!(name.as_deref(), Some("Calculator"));
            }
            _ => panic!("Expected Examples command"),
        }
    }

    #[test]
    fn test_cli_parse_repl_language() {
        let cli = Cli::parse_from(["runpad", "repl", "--language", "rs"]);
        match cli.command {
            Some(Commands::Repl { language }) => assert_eq!(language.as_deref(), Some("rs")),
            _ => panic!("Expected Repl command"),
        }
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["runpad", "-vvv"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_cli_state_dir_flag() {
        let cli = Cli::parse_from(["runpad", "--state-dir", "/tmp/runpad"]);
        assert_eq!(cli.state_dir(), Some(PathBuf::from("/tmp/runpad")));
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
