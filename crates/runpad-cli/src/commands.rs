//! Command handlers for CLI subcommands.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use runpad_core::{default_code, example, examples_for};
use runpad_editor::{BufferSurface, EditorSession};
use runpad_models::language;
use runpad_models::{ExecutionResult, LanguageOption, DEFAULT_LANGUAGE, LANGUAGES};
use runpad_runtime::{CompilerClient, ExecutionLifecycle, RuntimeConfig};

use crate::cli::{Commands, OutputFormat};
use crate::palette;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, config: RuntimeConfig) -> Result<()> {
    match command {
        Commands::Languages { remote, format } => {
            if remote {
                cmd_remote_languages(config)
            } else {
                cmd_languages(format)
            }
        }
        Commands::Template { language } => cmd_template(&language),
        Commands::Examples { language, name } => cmd_examples(&language, name.as_deref()),
        Commands::Run {
            file,
            language,
            stdin,
            stdin_file,
            timeout,
        } => {
            let config = match timeout {
                Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
                None => config,
            };
            cmd_run(
                file.as_deref(),
                language.as_deref(),
                StdinSource::from_args(stdin, stdin_file),
                config,
            )
        }
        Commands::Repl { language: _ } => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

/// Builds the runtime configuration from the `--api-url` flag.
pub fn runtime_config(api_url: Option<&str>) -> Result<RuntimeConfig> {
    let config = match api_url {
        Some(url) if !url.trim().is_empty() => RuntimeConfig::new().with_base_url_str(url)?,
        _ => RuntimeConfig::from_env()?,
    };
    Ok(config)
}

/// Resolves a user-supplied language name, id or extension.
pub fn lookup_language(query: &str) -> Result<&'static LanguageOption> {
    palette::resolve(query).ok_or_else(|| format!("Unknown language: {}", query).into())
}

fn cmd_languages(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{:<6}  {:<18}  {:<8}  MODE", "ID", "NAME", "EXT");
            println!("{}", "-".repeat(48));
            for lang in LANGUAGES {
                let marker = if lang.id == DEFAULT_LANGUAGE { " *" } else { "" };
                println!(
                    "{:<6}  {:<18}  {:<8}  {}{}",
                    lang.id, lang.name, lang.extension, lang.editor_mode, marker
                );
            }
            println!("\n{} language(s), * = default", LANGUAGES.len());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(LANGUAGES)?;
            println!("{}", json);
        }
        OutputFormat::Brief => {
            for lang in LANGUAGES {
                println!("{}\t{}", lang.id, lang.name);
            }
        }
    }

    Ok(())
}

fn cmd_remote_languages(config: RuntimeConfig) -> Result<()> {
    let client = CompilerClient::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    info!(url = %client.languages_url(), "fetching remote language listing");
    let listing = runtime.block_on(client.languages())?;
    println!("{}", serde_json::to_string_pretty(&listing)?);

    Ok(())
}

fn cmd_template(query: &str) -> Result<()> {
    let lang = lookup_language(query)?;
    println!("{}", default_code(lang.id));
    Ok(())
}

fn cmd_examples(query: &str, name: Option<&str>) -> Result<()> {
    let lang = lookup_language(query)?;

    match name {
        Some(name) => {
            let found = example(lang.id, name)
                .ok_or_else(|| format!("No example named '{}' for {}", name, lang.name))?;
            println!("{}", found.code);
        }
        None => {
            let examples = examples_for(lang.id);
            if examples.is_empty() {
                println!("No examples for {}.", lang.name);
                return Ok(());
            }
            println!("Examples for {}:", lang.name);
            for ex in examples {
                println!("  {}", ex.name);
            }
        }
    }

    Ok(())
}

/// Where the program's standard input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinSource {
    /// No input.
    Empty,
    /// Literal text.
    Text(String),
    /// Contents of a file.
    File(PathBuf),
}

impl StdinSource {
    /// Builds the source from the `--stdin` / `--stdin-file` flags.
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Self {
        match (text, file) {
            (Some(text), _) => StdinSource::Text(text),
            (None, Some(path)) => StdinSource::File(path),
            (None, None) => StdinSource::Empty,
        }
    }

    /// Reads the input text.
    pub fn read(&self) -> Result<String> {
        match self {
            StdinSource::Empty => Ok(String::new()),
            StdinSource::Text(text) => Ok(text.clone()),
            StdinSource::File(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {}", path.display(), e).into()),
        }
    }
}

/// Picks the language for `run`: explicit flag, then file extension, then
/// the default language.
pub fn resolve_run_language(
    explicit: Option<&str>,
    file: Option<&Path>,
) -> Result<&'static LanguageOption> {
    if let Some(query) = explicit {
        return lookup_language(query);
    }

    let from_file = file
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .and_then(language::from_extension);

    Ok(from_file.unwrap_or_else(language::default_language))
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e).into()),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn cmd_run(
    file: Option<&Path>,
    language: Option<&str>,
    stdin: StdinSource,
    config: RuntimeConfig,
) -> Result<()> {
    let lang = resolve_run_language(language, file)?;
    let source = read_source(file)?;
    let standard_input = stdin.read()?;

    let mut session = EditorSession::with_language(BufferSurface::new(), lang.id)?;
    session.set_content_externally(source);
    let snapshot = session.snapshot(standard_input);
    session.close();

    debug!(
        language = %snapshot.language_id,
        chars = snapshot.content.chars().count(),
        "running program"
    );

    let lifecycle = ExecutionLifecycle::http(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        lifecycle.submit(snapshot)?;
        Ok::<_, runpad_runtime::RuntimeError>(lifecycle.settled().await)
    })?;

    match result {
        ExecutionResult::Succeeded { output } => {
            print!("{}", output);
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        ExecutionResult::Failed { message } => Err(message.into()),
        other => Err(format!("Run did not complete: {:?}", other).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cmd_languages_formats() {
        // Should not panic
        cmd_languages(OutputFormat::Table).unwrap();
        cmd_languages(OutputFormat::Json).unwrap();
        cmd_languages(OutputFormat::Brief).unwrap();
    }

    #[test]
    fn test_cmd_template_unknown() {
        let err = cmd_template("zzzz").unwrap_err();
        assert!(err.to_string().contains("Unknown language"));
    }

    #[test]
    fn test_cmd_examples() {
        cmd_examples("bac", None).unwrap();
        cmd_examples("bac", Some("hello world")).unwrap();
        cmd_examples("py", None).unwrap();
        assert!(cmd_examples("bac", Some("Nope")).is_err());
    }

    #[test]
    fn test_resolve_run_language() {
        let lang = resolve_run_language(Some("rust"), None).unwrap();
        assert_eq!(lang.id, "rs");

        let lang = resolve_run_language(None, Some(Path::new("src/Main.JAVA"))).unwrap();
        assert_eq!(lang.id, "java");

        let lang = resolve_run_language(None, Some(Path::new("notes.txt"))).unwrap();
        assert_eq!(lang.id, DEFAULT_LANGUAGE);

        let lang = resolve_run_language(None, None).unwrap();
        assert_eq!(lang.id, DEFAULT_LANGUAGE);

        // Explicit flag wins over the extension
        let lang = resolve_run_language(Some("js"), Some(Path::new("a.py"))).unwrap();
        assert_eq!(lang.id, "js");

        assert!(resolve_run_language(Some("zzzz"), None).is_err());
    }

    #[test]
    fn test_stdin_source() {
        assert_eq!(StdinSource::from_args(None, None), StdinSource::Empty);
        assert_eq!(StdinSource::Empty.read().unwrap(), "");

        let source = StdinSource::from_args(Some("5 7".into()), None);
        assert_eq!(source.read().unwrap(), "5 7");

        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "line1\nline2\n").unwrap();
        let source = StdinSource::from_args(None, Some(path));
        assert_eq!(source.read().unwrap(), "line1\nline2\n");
    }

    #[test]
    fn test_stdin_source_missing_file() {
        let source = StdinSource::File(PathBuf::from("/nonexistent/input.txt"));
        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }

    #[test]
    fn test_read_source_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.py");
        fs::write(&path, "print(1)\n").unwrap();
        assert_eq!(read_source(Some(&path)).unwrap(), "print(1)\n");
    }

    #[test]
    fn test_runtime_config_from_flag() {
        let config = runtime_config(Some("http://localhost:8080")).unwrap();
        assert_eq!(config.base_url.port(), Some(8080));

        assert!(runtime_config(Some("ftp://example.com")).is_err());
    }
}
