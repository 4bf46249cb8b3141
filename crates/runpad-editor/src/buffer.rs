//! In-memory text surface.

use std::collections::VecDeque;

use runpad_models::language::PLAINTEXT_MODE;

use crate::surface::TextSurface;
use crate::theme::Theme;

/// A text surface backed by a `String`.
///
/// User edits go through [`user_edit`](BufferSurface::user_edit) or
/// [`type_line`](BufferSurface::type_line) and are queued as change
/// notifications. Programmatic writes are counted so callers can check that
/// redundant writes were skipped.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    text: String,
    mode: String,
    theme: Option<Theme>,
    ready: bool,
    disposed: bool,
    writes: usize,
    changes: VecDeque<String>,
}

impl BufferSurface {
    /// Creates a ready, empty surface.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            mode: PLAINTEXT_MODE.to_string(),
            theme: None,
            ready: true,
            disposed: false,
            writes: 0,
            changes: VecDeque::new(),
        }
    }

    /// Creates a surface that is still initializing.
    pub fn uninitialized() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// Marks the surface as initialized.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Returns the current text without allocating.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the current editor mode.
    pub fn language_mode(&self) -> &str {
        &self.mode
    }

    /// Returns the last applied theme.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Number of programmatic content writes received.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Returns true once the surface has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replaces the whole text as if the user had edited it.
    pub fn user_edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.changes.push_back(self.text.clone());
    }

    /// Appends a line as if the user had typed it.
    pub fn type_line(&mut self, line: &str) {
        let mut text = self.text.clone();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.user_edit(text);
    }
}

impl Default for BufferSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface for BufferSurface {
    fn is_ready(&self) -> bool {
        self.ready && !self.disposed
    }

    fn set_content(&mut self, text: &str) {
        self.text = text.to_string();
        self.writes += 1;
    }

    fn content(&self) -> String {
        self.text.clone()
    }

    fn set_language_mode(&mut self, mode: &str) {
        self.mode = mode.to_string();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }

    fn take_changes(&mut self) -> Vec<String> {
        self.changes.drain(..).collect()
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.changes.clear();
    }
}
