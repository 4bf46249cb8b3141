//! The static catalog of supported languages.
//!
//! The catalog is ordered and read-only for the lifetime of the process. It
//! is the authority the editor session validates language switches against
//! and the list any selector presents.

use serde::Serialize;

/// One entry of the language catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    /// Identifier sent to the remote execution service (e.g. `py`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Source file extension including the leading dot.
    pub extension: &'static str,
    /// Language mode understood by the text surface for highlighting.
    pub editor_mode: &'static str,
}

/// Language used when a session is created without an explicit choice.
pub const DEFAULT_LANGUAGE: &str = "py";

/// Editor mode used for languages the surface has no grammar for.
pub const PLAINTEXT_MODE: &str = "plaintext";

/// All supported languages, in presentation order.
pub static LANGUAGES: &[LanguageOption] = &[
    LanguageOption { id: "py", name: "Python", extension: ".py", editor_mode: "python" },
    LanguageOption { id: "js", name: "JavaScript", extension: ".js", editor_mode: "javascript" },
    LanguageOption { id: "ts", name: "TypeScript", extension: ".ts", editor_mode: "typescript" },
    LanguageOption { id: "java", name: "Java", extension: ".java", editor_mode: "java" },
    LanguageOption { id: "cpp", name: "C++", extension: ".cpp", editor_mode: "cpp" },
    LanguageOption { id: "c", name: "C", extension: ".c", editor_mode: "c" },
    LanguageOption { id: "go", name: "Go", extension: ".go", editor_mode: "go" },
    LanguageOption { id: "rs", name: "Rust", extension: ".rs", editor_mode: "rust" },
    LanguageOption { id: "kt", name: "Kotlin", extension: ".kt", editor_mode: "kotlin" },
    LanguageOption { id: "cs", name: "C#", extension: ".cs", editor_mode: "csharp" },
    LanguageOption { id: "bac", name: "BasicCode (bac)", extension: ".bac", editor_mode: PLAINTEXT_MODE },
];

/// Looks up a language by its identifier.
pub fn find(id: &str) -> Option<&'static LanguageOption> {
    LANGUAGES.iter().find(|lang| lang.id == id)
}

/// Returns true if `id` names a catalog entry.
pub fn is_supported(id: &str) -> bool {
    find(id).is_some()
}

/// Looks up a language by file extension, with or without the leading dot.
///
/// Matching is case-insensitive so `MAIN.PY` resolves like `main.py`.
pub fn from_extension(ext: &str) -> Option<&'static LanguageOption> {
    let ext = ext.trim_start_matches('.');
    LANGUAGES
        .iter()
        .find(|lang| lang.extension[1..].eq_ignore_ascii_case(ext))
}

/// Returns the editor mode for `id`, falling back to plain text.
pub fn editor_mode(id: &str) -> &'static str {
    find(id).map_or(PLAINTEXT_MODE, |lang| lang.editor_mode)
}

/// Returns the default catalog entry.
pub fn default_language() -> &'static LanguageOption {
    // DEFAULT_LANGUAGE is a catalog id; covered by test_default_language_in_catalog.
    find(DEFAULT_LANGUAGE).unwrap_or(&LANGUAGES[0])
}
