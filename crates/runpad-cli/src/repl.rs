//! Interactive REPL (Read-Eval-Print Loop) for Runpad.
//!
//! Plain lines are typed into the buffer; slash commands switch language,
//! set standard input and run the buffer on the remote service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, info};

use runpad_core::{example, examples_for, TextStats};
use runpad_editor::{BufferSurface, EditorSession, Theme};
use runpad_models::language;
use runpad_models::{ExecutionResult, LanguageOption, LANGUAGES};
use runpad_runtime::{ExecutionBackend, ExecutionLifecycle, RuntimeConfig, RuntimeError};

use crate::commands::{Result, StdinSource};
use crate::palette;

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "lang").
    pub name: &'static str,
    /// Command aliases (e.g., ["l"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
    /// Examples with descriptions.
    pub examples: &'static [(&'static str, &'static str)],
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "lang",
        aliases: &["l"],
        brief: "Switch language (resets the buffer to its template)",
        usage: "/lang [language]",
        examples: &[
            ("/lang python", "Switch to Python"),
            ("/lang .rs", "Switch by file extension"),
            ("/lang", "Show the current language"),
        ],
    },
    CommandHelp {
        name: "languages",
        aliases: &["langs"],
        brief: "List supported languages",
        usage: "/languages",
        examples: &[],
    },
    CommandHelp {
        name: "theme",
        aliases: &["t"],
        brief: "Set or toggle the light/dark theme",
        usage: "/theme [light|dark]",
        examples: &[("/theme", "Toggle"), ("/theme light", "Use the light theme")],
    },
    CommandHelp {
        name: "input",
        aliases: &["i"],
        brief: "Set the program's standard input",
        usage: "/input [text]",
        examples: &[
            ("/input 5 7", "Feed '5 7' to the program"),
            ("/input 3\\n4", "Feed two lines ('\\n' is a newline)"),
            ("/input", "Clear standard input"),
        ],
    },
    CommandHelp {
        name: "input-file",
        aliases: &["if"],
        brief: "Use a file's contents as standard input",
        usage: "/input-file <file>",
        examples: &[("/input-file ~/cases/one.txt", "Feed the file to the program")],
    },
    CommandHelp {
        name: "run",
        aliases: &["r"],
        brief: "Run the buffer and wait for the result",
        usage: "/run",
        examples: &[],
    },
    CommandHelp {
        name: "show",
        aliases: &["p"],
        brief: "Print the buffer with line numbers",
        usage: "/show",
        examples: &[],
    },
    CommandHelp {
        name: "stats",
        aliases: &[],
        brief: "Show line and character counts",
        usage: "/stats",
        examples: &[],
    },
    CommandHelp {
        name: "clear",
        aliases: &[],
        brief: "Empty the buffer",
        usage: "/clear",
        examples: &[],
    },
    CommandHelp {
        name: "reset",
        aliases: &[],
        brief: "Restore the current language's template",
        usage: "/reset",
        examples: &[],
    },
    CommandHelp {
        name: "example",
        aliases: &["ex"],
        brief: "List or load example programs",
        usage: "/example [name]",
        examples: &[
            ("/example", "List examples for the current language"),
            ("/example Calculator", "Load the 'Calculator' example"),
        ],
    },
    CommandHelp {
        name: "load",
        aliases: &[],
        brief: "Load a file into the buffer",
        usage: "/load <file>",
        examples: &[("/load ~/code/main.py", "Load a file; the language follows its extension")],
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "/help [command]",
        examples: &[("/help lang", "Show help for /lang")],
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the REPL",
        usage: "/quit",
        examples: &[],
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/clear", "/example", "/help", "/input", "/input-file", "/lang", "/languages", "/load", "/quit",
        "/reset", "/run", "/show", "/stats", "/theme",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Slash commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Switch language, or show the current one
    Lang(Option<String>),
    /// List supported languages
    Languages,
    /// Set or toggle the theme
    Theme(Option<String>),
    /// Set (or clear) standard input
    Input(Option<String>),
    /// Read standard input from a file
    InputFile(String),
    /// Run the buffer
    Run,
    /// Print the buffer
    Show,
    /// Show text statistics
    Stats,
    /// Empty the buffer
    Clear,
    /// Restore the template
    Reset,
    /// List or load examples
    Example(Option<String>),
    /// Load a file
    Load(String),
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    /// Quit the REPL
    Quit,
    /// Unknown command
    Unknown(String),
    /// A line typed into the buffer
    Text(String),
}

impl ReplCommand {
    /// Parses input into a REPL command.
    ///
    /// Anything that is not a slash command is a buffer line and keeps its
    /// indentation. Lines starting with `//` or `/*` are comments, not
    /// commands.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        let Some(stripped) = trimmed.strip_prefix('/') else {
            return ReplCommand::Text(input.trim_end_matches(['\r', '\n']).to_string());
        };
        if stripped.starts_with('/') || stripped.starts_with('*') {
            return ReplCommand::Text(input.trim_end_matches(['\r', '\n']).to_string());
        }

        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match cmd.as_str() {
            "lang" | "l" => ReplCommand::Lang(arg),
            "languages" | "langs" => ReplCommand::Languages,
            "theme" | "t" => ReplCommand::Theme(arg),
            "input" | "i" => ReplCommand::Input(arg),
            "input-file" | "if" => arg
                .map(ReplCommand::InputFile)
                .unwrap_or(ReplCommand::Unknown("input-file requires a file".to_string())),
            "run" | "r" => ReplCommand::Run,
            "show" | "p" => ReplCommand::Show,
            "stats" => ReplCommand::Stats,
            "clear" => ReplCommand::Clear,
            "reset" => ReplCommand::Reset,
            "example" | "ex" => ReplCommand::Example(arg),
            "load" => arg
                .map(ReplCommand::Load)
                .unwrap_or(ReplCommand::Unknown("load requires a file".to_string())),
            "help" | "h" | "?" => ReplCommand::Help(arg),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }
}

/// The editing and execution state behind the REPL.
pub struct Workbench {
    session: EditorSession<BufferSurface>,
    lifecycle: ExecutionLifecycle,
    runtime: tokio::runtime::Runtime,
    standard_input: String,
}

impl Workbench {
    /// Creates a workbench over any execution backend.
    pub fn new(language_id: &str, backend: Arc<dyn ExecutionBackend>) -> Result<Self> {
        Self::with_lifecycle(language_id, ExecutionLifecycle::new(backend))
    }

    /// Creates a workbench that runs programs over HTTP.
    pub fn http(language_id: &str, config: RuntimeConfig) -> Result<Self> {
        Self::with_lifecycle(language_id, ExecutionLifecycle::http(config)?)
    }

    fn with_lifecycle(language_id: &str, lifecycle: ExecutionLifecycle) -> Result<Self> {
        let session = EditorSession::with_language(BufferSurface::new(), language_id)?;
        let runtime = tokio::runtime::Runtime::new()?;

        Ok(Self {
            session,
            lifecycle,
            runtime,
            standard_input: String::new(),
        })
    }

    /// The current language.
    pub fn language(&self) -> &'static LanguageOption {
        self.session.language()
    }

    /// The buffer content.
    pub fn content(&self) -> &str {
        self.session.content()
    }

    /// The current theme.
    pub fn theme(&self) -> Theme {
        self.session.theme()
    }

    /// Standard input for the next run.
    pub fn standard_input(&self) -> &str {
        &self.standard_input
    }

    /// Line and character counts of the buffer.
    pub fn stats(&mut self) -> TextStats {
        self.session.stats()
    }

    /// The latest execution result.
    pub fn result(&self) -> ExecutionResult {
        self.lifecycle.result()
    }

    /// Types a line at the end of the buffer.
    pub fn type_line(&mut self, line: &str) {
        self.session.surface_mut().type_line(line);
        self.session.pump_surface_edits();
    }

    /// Switches language by id, name or extension.
    pub fn switch_language(&mut self, query: &str) -> Result<&'static LanguageOption> {
        let lang = palette::resolve(query).ok_or_else(|| format!("Unknown language: {}", query))?;
        self.session.set_language(lang.id)?;
        Ok(lang)
    }

    /// Sets the theme, or toggles it when `name` is `None`.
    pub fn set_theme(&mut self, name: Option<&str>) -> Result<Theme> {
        let theme = match name {
            Some(name) => name.parse::<Theme>()?,
            None => self.session.theme().toggled(),
        };
        self.session.set_visual_theme(theme);
        Ok(theme)
    }

    /// Sets standard input for subsequent runs.
    ///
    /// `\n`, `\t` and `\\` escapes are decoded so several lines fit on
    /// one REPL line.
    pub fn set_input(&mut self, text: Option<String>) {
        self.standard_input = text.as_deref().map(unescape_input).unwrap_or_default();
    }

    /// Uses the contents of a file as standard input for subsequent runs.
    pub fn load_input(&mut self, path: &Path) -> Result<()> {
        self.standard_input = StdinSource::File(path.to_path_buf()).read()?;
        Ok(())
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.session.set_content_externally("");
    }

    /// Restores the current language's template.
    pub fn reset(&mut self) -> Result<()> {
        let id = self.session.language_id();
        self.session.set_language(id)?;
        Ok(())
    }

    /// Loads a named example for the current language into the buffer.
    pub fn load_example(&mut self, name: &str) -> Result<()> {
        let lang = self.session.language();
        let found = example(lang.id, name)
            .ok_or_else(|| format!("No example named '{}' for {}", name, lang.name))?;
        self.session.set_content_externally(found.code);
        Ok(())
    }

    /// Loads a file into the buffer, switching language to match its
    /// extension when it has a known one.
    pub fn load_file(&mut self, path: &Path) -> Result<Option<&'static LanguageOption>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;

        let detected = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(language::from_extension);
        if let Some(lang) = detected {
            if lang.id != self.session.language_id() {
                self.session.set_language(lang.id)?;
            }
        }

        self.session.set_content_externally(text);
        Ok(detected)
    }

    /// Runs the buffer and waits for the result.
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let snapshot = self.session.snapshot(self.standard_input.clone());
        let lifecycle = &self.lifecycle;

        let result = self.runtime.block_on(async {
            let seq = lifecycle.submit(snapshot)?;
            debug!(seq = %seq, "waiting for result");
            Ok::<_, RuntimeError>(lifecycle.settled().await)
        })?;

        Ok(result)
    }

    /// The buffer with right-aligned line numbers.
    pub fn numbered(&self) -> String {
        let content = self.session.content();
        let total = content.split('\n').count();
        let width = total.to_string().len();

        content
            .split('\n')
            .enumerate()
            .map(|(i, line)| format!("{:>width$} | {}", i + 1, line, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the buffer surface has caught up with the session.
    pub fn is_synced(&self) -> bool {
        self.session.is_synced()
    }
}

/// Decodes `\n`, `\t` and `\\` in REPL input. Other backslashes are kept.
fn unescape_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// REPL state
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    history_path: PathBuf,
    workbench: Workbench,
}

impl Repl {
    /// Creates a new REPL instance.
    pub fn new(state_dir: &Path, language_id: &str, config: RuntimeConfig) -> Result<Self> {
        let rl_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(CommandCompleter));

        let history_path = runpad_core::history_file_in(state_dir);
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        info!(url = %config.base_url, language = language_id, "starting REPL");
        let workbench = Workbench::http(language_id, config)?;

        Ok(Self {
            editor,
            history_path,
            workbench,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> Result<()> {
        println!("Runpad REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type code to edit the buffer, /run to execute, /help for commands");
        println!();
        print!("{}", self.workbench.numbered());
        println!();
        println!();

        loop {
            let prompt = self.prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(&line)?;
                    }

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break, // Quit requested
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);

        println!("Goodbye!");
        Ok(())
    }

    /// Returns the prompt string.
    fn prompt(&self) -> String {
        let lang = self.workbench.language();
        if self.workbench.standard_input().is_empty() {
            format!("runpad [{}]> ", lang.id)
        } else {
            format!("runpad [{} +stdin]> ", lang.id)
        }
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool> {
        let workbench = &mut self.workbench;

        match cmd {
            ReplCommand::Text(line) => workbench.type_line(&line),

            ReplCommand::Lang(None) => {
                let lang = workbench.language();
                println!("Language: {} ({})", lang.name, lang.id);
            }
            ReplCommand::Lang(Some(query)) => {
                let lang = workbench.switch_language(&query)?;
                println!("Switched to {} - buffer reset to template", lang.name);
            }

            ReplCommand::Languages => {
                let current = workbench.language().id;
                for lang in LANGUAGES {
                    let marker = if lang.id == current { "*" } else { " " };
                    println!("{} {:<6} {}", marker, lang.id, lang.name);
                }
            }

            ReplCommand::Theme(name) => {
                let theme = workbench.set_theme(name.as_deref())?;
                println!("Theme: {}", theme);
            }

            ReplCommand::Input(text) => {
                workbench.set_input(text);
                if workbench.standard_input().is_empty() {
                    println!("Standard input cleared");
                } else {
                    println!("Standard input set ({} chars)", workbench.standard_input().len());
                }
            }

            ReplCommand::InputFile(raw) => {
                let path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
                workbench.load_input(&path)?;
                println!(
                    "Standard input read from {} ({} chars)",
                    path.display(),
                    workbench.standard_input().len()
                );
            }

            ReplCommand::Run => {
                println!("Running...");
                match workbench.run()? {
                    ExecutionResult::Succeeded { output } => {
                        print!("{}", output);
                        if !output.ends_with('\n') {
                            println!();
                        }
                    }
                    ExecutionResult::Failed { message } => eprintln!("Run failed: {}", message),
                    other => println!("{:?}", other),
                }
            }

            ReplCommand::Show => println!("{}", workbench.numbered()),
            ReplCommand::Stats => println!("{}", workbench.stats()),

            ReplCommand::Clear => {
                workbench.clear();
                println!("Buffer cleared");
            }
            ReplCommand::Reset => {
                workbench.reset()?;
                println!("Buffer reset to the {} template", workbench.language().name);
            }

            ReplCommand::Example(None) => {
                let lang = workbench.language();
                let examples = examples_for(lang.id);
                if examples.is_empty() {
                    println!("No examples for {}.", lang.name);
                } else {
                    for ex in examples {
                        println!("  {}", ex.name);
                    }
                }
            }
            ReplCommand::Example(Some(name)) => {
                workbench.load_example(&name)?;
                println!("Loaded example '{}'", name);
            }

            ReplCommand::Load(raw) => {
                let path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
                match workbench.load_file(&path)? {
                    Some(lang) => println!("Loaded {} as {}", path.display(), lang.name),
                    None => println!("Loaded {}", path.display()),
                }
            }

            ReplCommand::Help(topic) => print_help(topic.as_deref()),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}. Type /help for available commands.", cmd);
            }
        }

        Ok(false)
    }
}

/// Finds help for a command by name or alias.
fn find_command_help(name: &str) -> Option<&'static CommandHelp> {
    let name_lower = name.trim_start_matches('/').to_lowercase();
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name_lower || h.aliases.contains(&name_lower.as_str()))
}

/// Prints help information.
fn print_help(topic: Option<&str>) {
    match topic {
        Some(cmd) => {
            if let Some(help) = find_command_help(cmd) {
                println!("/{} - {}", help.name, help.brief);
                if !help.aliases.is_empty() {
                    println!("Aliases: {}", help.aliases.join(", "));
                }
                println!();
                println!("Usage:");
                println!("  {}", help.usage);
                if !help.examples.is_empty() {
                    println!();
                    println!("Examples:");
                    for (example, desc) in help.examples {
                        println!("  {}  # {}", example, desc);
                    }
                }
            } else {
                println!(
                    "Unknown command: {}. Type /help for available commands.",
                    cmd
                );
            }
        }
        None => {
            println!("COMMANDS:");
            for help in COMMAND_HELP {
                println!("  {:<22} {}", help.usage, help.brief);
            }
            println!();
            println!("Any other line is appended to the buffer.");
            println!("Type /help <command> for detailed help on a specific command.");
        }
    }
}
