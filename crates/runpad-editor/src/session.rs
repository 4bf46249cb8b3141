//! The editor session state machine.
//!
//! `EditorSession` owns the authoritative `{language, content}` pair and a
//! text surface. Surface-to-session flows are one-directional notifications;
//! session-to-surface flows are overwrites guarded by equality checks, so a
//! write never triggers another write.
//!
//! Writes issued while the surface is not ready are queued and replayed in
//! call order by [`EditorSession::surface_ready`]. Session state itself is
//! updated immediately.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use runpad_core::{default_code, TextStats};
use runpad_models::{language, LanguageOption, RunSnapshot, SessionId};

use crate::error::{EditorError, Result};
use crate::surface::TextSurface;
use crate::theme::Theme;

/// Synchronization state between the session and its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The surface reflects the last synced value.
    Idle,
    /// A programmatic write to the surface is in progress.
    Reconciling,
}

/// A write waiting to be applied to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SurfaceCommand {
    LanguageMode(&'static str),
    Content(String),
    Theme(Theme),
}

/// Callback receiving every accepted user edit.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Single source of truth for one editing session.
///
/// The surface is owned by the session and disposed when the session is
/// closed or dropped.
pub struct EditorSession<S: TextSurface> {
    id: SessionId,
    surface: S,
    language: &'static LanguageOption,
    content: String,
    theme: Theme,
    state: SyncState,
    pending: VecDeque<SurfaceCommand>,
    listener: Option<ChangeListener>,
}

impl<S: TextSurface> fmt::Debug for EditorSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("language", &self.language.id)
            .field("content_len", &self.content.len())
            .field("theme", &self.theme)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl<S: TextSurface> EditorSession<S> {
    /// Creates a session in the default language with its template.
    pub fn new(surface: S) -> Self {
        Self::open(surface, language::default_language())
    }

    /// Creates a session in `language_id` with its template.
    pub fn with_language(surface: S, language_id: &str) -> Result<Self> {
        let lang = language::find(language_id)
            .ok_or_else(|| EditorError::UnknownLanguage(language_id.to_string()))?;
        Ok(Self::open(surface, lang))
    }

    fn open(surface: S, lang: &'static LanguageOption) -> Self {
        let mut session = Self {
            id: SessionId::new(),
            surface,
            language: lang,
            content: default_code(lang.id).to_string(),
            theme: Theme::default(),
            state: SyncState::Idle,
            pending: VecDeque::new(),
            listener: None,
        };

        debug!(session = %session.id, language = lang.id, "session opened");

        session.enqueue(SurfaceCommand::LanguageMode(lang.editor_mode));
        session.enqueue(SurfaceCommand::Content(session.content.clone()));
        session.enqueue(SurfaceCommand::Theme(session.theme));
        session.flush();
        session
    }

    /// Session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current catalog entry.
    pub fn language(&self) -> &'static LanguageOption {
        self.language
    }

    /// Current language id.
    pub fn language_id(&self) -> &'static str {
        self.language.id
    }

    /// Authoritative content as of the last drain of surface edits.
    ///
    /// Edits still queued on the surface are not included; call
    /// [`pump_surface_edits`](Self::pump_surface_edits) first, or use
    /// [`snapshot`](Self::snapshot), which drains them itself.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Last requested theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current synchronization state.
    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    /// Number of writes waiting for the surface to become ready.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Returns the owned surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the owned surface mutably, e.g. to feed it user input.
    ///
    /// Edits made this way are picked up by
    /// [`pump_surface_edits`](Self::pump_surface_edits).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Line and character counts of the content, after draining queued
    /// surface edits.
    pub fn stats(&mut self) -> TextStats {
        self.pump_surface_edits();
        TextStats::of(&self.content)
    }

    /// Returns true when the surface is ready, nothing is queued, and the
    /// surface holds exactly the authoritative content.
    pub fn is_synced(&self) -> bool {
        self.surface.is_ready() && self.pending.is_empty() && self.surface.content() == self.content
    }

    /// Captures the current content and language for a run request.
    ///
    /// Queued surface edits are drained first so the snapshot holds the
    /// last text the user typed.
    pub fn snapshot(&mut self, standard_input: impl Into<String>) -> RunSnapshot {
        self.pump_surface_edits();
        RunSnapshot::new(self.content.clone(), self.language.id, standard_input)
    }

    /// Installs the change listener, replacing any previous one.
    pub fn set_change_listener(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the change listener.
    pub fn clear_change_listener(&mut self) {
        self.listener = None;
    }

    /// Switches language and replaces the content with its template.
    ///
    /// This is destructive: edits made in the previous language are
    /// discarded and cannot be recovered. Selecting the current language
    /// again also resets to the template.
    ///
    /// # Errors
    /// Returns [`EditorError::UnknownLanguage`] without touching any state
    /// if `id` is not in the catalog.
    pub fn set_language(&mut self, id: &str) -> Result<()> {
        let lang =
            language::find(id).ok_or_else(|| EditorError::UnknownLanguage(id.to_string()))?;

        self.pump_surface_edits();

        debug!(
            session = %self.id,
            from = self.language.id,
            to = lang.id,
            "switching language"
        );

        self.language = lang;
        self.content = default_code(lang.id).to_string();
        self.enqueue(SurfaceCommand::LanguageMode(lang.editor_mode));
        self.enqueue(SurfaceCommand::Content(self.content.clone()));
        self.flush();
        Ok(())
    }

    /// Sets content that did not come from direct typing.
    ///
    /// The surface is only overwritten if it holds something different,
    /// which keeps the cursor where it is for redundant updates.
    pub fn set_content_externally(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.pump_surface_edits();

        trace!(session = %self.id, len = text.len(), "external content");

        self.content = text.clone();
        self.enqueue(SurfaceCommand::Content(text));
        self.flush();
    }

    /// Forwards a theme to the surface.
    pub fn set_visual_theme(&mut self, theme: Theme) {
        self.pump_surface_edits();
        self.theme = theme;
        self.enqueue(SurfaceCommand::Theme(theme));
        self.flush();
    }

    /// Handles a user edit reported by the surface.
    ///
    /// Returns true if the edit changed the authoritative content. A
    /// notification carrying the content the session already holds is an
    /// echo of a programmatic write and is absorbed without notifying the
    /// listener.
    pub fn on_surface_content_changed(&mut self, text: &str) -> bool {
        if text == self.content {
            trace!(session = %self.id, "absorbed echo");
            return false;
        }

        self.content = text.to_string();
        if let Some(listener) = self.listener.as_mut() {
            listener(text);
        }
        true
    }

    /// Drains edits queued by the surface and applies them in order.
    ///
    /// Returns the number of edits that changed the content.
    pub fn pump_surface_edits(&mut self) -> usize {
        self.surface
            .take_changes()
            .into_iter()
            .filter(|text| self.on_surface_content_changed(text))
            .count()
    }

    /// Replays queued writes once the surface has become ready.
    ///
    /// Returns the number of writes applied; zero if the surface is still
    /// not ready.
    pub fn surface_ready(&mut self) -> usize {
        if !self.pending.is_empty() {
            debug!(
                session = %self.id,
                pending = self.pending.len(),
                "surface ready, replaying writes"
            );
        }
        self.flush()
    }

    /// Closes the session and disposes the surface.
    pub fn close(self) {
        debug!(session = %self.id, "closing session");
        // Disposal happens in Drop.
    }

    fn enqueue(&mut self, command: SurfaceCommand) {
        self.pending.push_back(command);
    }

    fn flush(&mut self) -> usize {
        if !self.surface.is_ready() {
            trace!(
                session = %self.id,
                pending = self.pending.len(),
                "surface not ready, deferring writes"
            );
            return 0;
        }

        self.state = SyncState::Reconciling;
        let mut applied = 0;
        while let Some(command) = self.pending.pop_front() {
            self.apply(command);
            applied += 1;
        }
        self.state = SyncState::Idle;
        applied
    }

    fn apply(&mut self, command: SurfaceCommand) {
        match command {
            SurfaceCommand::LanguageMode(mode) => self.surface.set_language_mode(mode),
            SurfaceCommand::Content(text) => {
                if self.surface.content() != text {
                    self.surface.set_content(&text);
                } else {
                    trace!(session = %self.id, "surface already up to date");
                }
            }
            SurfaceCommand::Theme(theme) => self.surface.set_theme(theme),
        }
    }
}

impl<S: TextSurface> Drop for EditorSession<S> {
    fn drop(&mut self) {
        self.surface.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferSurface;
    use runpad_models::{DEFAULT_LANGUAGE, LANGUAGES};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> EditorSession<BufferSurface> {
        EditorSession::new(BufferSurface::new())
    }

    #[test]
    fn test_new_session_uses_default_template() {
        let session = session();

        assert_eq!(session.language_id(), DEFAULT_LANGUAGE);
        assert_eq!(session.content(), default_code(DEFAULT_LANGUAGE));
        assert_eq!(session.surface().text(), session.content());
        assert_eq!(session.surface().language_mode(), "python");
        assert_eq!(session.surface().theme(), Some(Theme::Dark));
        assert!(session.is_synced());
        assert_eq!(session.sync_state(), SyncState::Idle);
    }

    #[test]
    fn test_with_language_rejects_unknown() {
        let err = EditorSession::with_language(BufferSurface::new(), "cobol").unwrap_err();
        assert_eq!(err, EditorError::UnknownLanguage("cobol".into()));
    }

    #[test]
    fn test_set_language_every_catalog_entry() {
        let mut session = session();

        for lang in LANGUAGES {
            session.set_language(lang.id).unwrap();

            assert_eq!(session.language_id(), lang.id);
            assert_eq!(session.content(), default_code(lang.id));
            assert_eq!(session.surface().text(), default_code(lang.id));
            assert_eq!(session.surface().language_mode(), lang.editor_mode);
        }
    }

    #[test]
    fn test_set_language_discards_edits() {
        let mut session = session();
        session.on_surface_content_changed("print('mine')");

        session.set_language("py").unwrap();

        assert_eq!(session.content(), default_code("py"));
    }

    #[test]
    fn test_set_language_unknown_leaves_state_untouched() {
        let mut session = session();
        session.set_language("go").unwrap();
        session.on_surface_content_changed("package main");
        let writes = session.surface().write_count();

        let err = session.set_language("brainfuck").unwrap_err();

        assert_eq!(err, EditorError::UnknownLanguage("brainfuck".into()));
        assert_eq!(session.language_id(), "go");
        assert_eq!(session.content(), "package main");
        assert_eq!(session.surface().write_count(), writes);
    }

    #[test]
    fn test_external_content_same_as_surface_is_not_written() {
        let mut session = session();
        let writes = session.surface().write_count();
        let current = session.surface().text().to_string();

        session.set_content_externally(current.clone());
        session.set_content_externally(current);

        assert_eq!(session.surface().write_count(), writes);
    }

    #[test]
    fn test_external_content_different_is_written() {
        let mut session = session();
        let writes = session.surface().write_count();

        session.set_content_externally("x = 1");

        assert_eq!(session.content(), "x = 1");
        assert_eq!(session.surface().text(), "x = 1");
        assert_eq!(session.surface().write_count(), writes + 1);
    }

    #[test]
    fn test_external_content_matching_user_typed_text_skips_write() {
        let mut session = session();
        session.surface_mut().user_edit("typed");
        let writes = session.surface().write_count();

        session.set_content_externally("typed");

        assert_eq!(session.content(), "typed");
        assert_eq!(session.surface().write_count(), writes);
    }

    #[test]
    fn test_user_edit_updates_content_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = session();
        session.set_change_listener(move |text| sink.borrow_mut().push(text.to_string()));

        assert!(session.on_surface_content_changed("a"));
        assert!(session.on_surface_content_changed("ab"));

        assert_eq!(session.content(), "ab");
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_echo_is_absorbed() {
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let mut session = session();
        session.set_change_listener(move |_| *sink.borrow_mut() += 1);

        let current = session.content().to_string();
        assert!(!session.on_surface_content_changed(&current));
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_user_edit_does_not_write_back() {
        let mut session = session();
        let writes = session.surface().write_count();

        session.surface_mut().type_line("# more");
        assert_eq!(session.pump_surface_edits(), 1);

        assert_eq!(session.content(), session.surface().text());
        assert_eq!(session.surface().write_count(), writes);
    }

    #[test]
    fn test_queued_edits_apply_before_language_switch() {
        let mut session = session();
        session.surface_mut().type_line("lost");

        session.set_language("rs").unwrap();

        assert_eq!(session.content(), default_code("rs"));
        assert!(session.is_synced());
    }

    #[test]
    fn test_listener_replaced() {
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));
        let mut session = session();

        let sink = Rc::clone(&first);
        session.set_change_listener(move |_| *sink.borrow_mut() += 1);
        let sink = Rc::clone(&second);
        session.set_change_listener(move |_| *sink.borrow_mut() += 1);

        session.on_surface_content_changed("edit");

        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);

        session.clear_change_listener();
        session.on_surface_content_changed("edit 2");
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_theme_forwarded() {
        let mut session = session();
        session.set_visual_theme(Theme::Light);

        assert_eq!(session.theme(), Theme::Light);
        assert_eq!(session.surface().theme(), Some(Theme::Light));
    }

    #[test]
    fn test_writes_deferred_until_ready() {
        let mut session = EditorSession::new(BufferSurface::uninitialized());

        assert_eq!(session.surface().text(), "");
        assert_eq!(session.pending_writes(), 3);
        assert!(!session.is_synced());

        session.set_language("kt").unwrap();
        session.set_visual_theme(Theme::Light);
        session.set_content_externally("fun main() {}");

        // State is authoritative immediately.
        assert_eq!(session.language_id(), "kt");
        assert_eq!(session.content(), "fun main() {}");
        assert_eq!(session.surface().write_count(), 0);

        assert_eq!(session.surface_ready(), 0);

        session.surface_mut().mark_ready();
        assert_eq!(session.surface_ready(), 7);

        assert!(session.is_synced());
        assert_eq!(session.surface().text(), "fun main() {}");
        assert_eq!(session.surface().language_mode(), "kotlin");
        assert_eq!(session.surface().theme(), Some(Theme::Light));
    }

    #[test]
    fn test_deferred_replay_skips_redundant_writes() {
        let mut session = EditorSession::new(BufferSurface::uninitialized());
        session.set_content_externally("same");
        session.set_content_externally("same");

        session.surface_mut().mark_ready();
        session.surface_ready();

        // Template write, then "same" once; the repeat is skipped.
        assert_eq!(session.surface().write_count(), 2);
        assert_eq!(session.surface().text(), "same");
    }

    #[test]
    fn test_snapshot() {
        let mut session = session();
        session.set_language("js").unwrap();

        let snapshot = session.snapshot("stdin");

        assert_eq!(snapshot.content, default_code("js"));
        assert_eq!(snapshot.language_id, "js");
        assert_eq!(snapshot.standard_input, "stdin");
    }

    #[test]
    fn test_snapshot_includes_queued_user_edits() {
        let mut session = session();
        session.surface_mut().user_edit("print(42)");

        let snapshot = session.snapshot("");

        assert_eq!(snapshot.content, "print(42)");
        assert_eq!(session.content(), "print(42)");
        assert!(session.is_synced());
    }

    #[test]
    fn test_snapshot_notifies_listener_for_queued_edits() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut session = session();
        session.set_change_listener(move |text| sink.borrow_mut().push(text.to_string()));
        session.surface_mut().user_edit("a");
        session.surface_mut().user_edit("ab");

        assert_eq!(session.snapshot("").content, "ab");
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_stats_include_queued_user_edits() {
        let mut session = session();
        session.surface_mut().user_edit("x\ny\nz");

        let stats = session.stats();

        assert_eq!(stats.lines, 3);
        assert_eq!(stats.chars, 5);
    }

    #[test]
    fn test_stats_track_content() {
        let mut session = session();
        session.set_content_externally("a\nb");
        assert_eq!(session.stats().lines, 2);
        assert_eq!(session.stats().chars, 3);
    }

    #[test]
    fn test_drop_disposes_surface() {
        struct Tracked(Rc<RefCell<bool>>, BufferSurface);

        impl TextSurface for Tracked {
            fn is_ready(&self) -> bool {
                self.1.is_ready()
            }
            fn set_content(&mut self, text: &str) {
                self.1.set_content(text)
            }
            fn content(&self) -> String {
                self.1.content()
            }
            fn set_language_mode(&mut self, mode: &str) {
                self.1.set_language_mode(mode)
            }
            fn set_theme(&mut self, theme: Theme) {
                self.1.set_theme(theme)
            }
            fn dispose(&mut self) {
                *self.0.borrow_mut() = true;
            }
        }

        let disposed = Rc::new(RefCell::new(false));
        let session = EditorSession::new(Tracked(Rc::clone(&disposed), BufferSurface::new()));
        assert!(!*disposed.borrow());

        session.close();
        assert!(*disposed.borrow());
    }
}
