//! The text surface capability consumed by the editor session.
//!
//! A `TextSurface` is whatever actually displays and edits text: a widget
//! in a GUI host, a terminal buffer, or the in-memory [`BufferSurface`].
//! The session never renders anything itself; it only pushes state into a
//! surface and listens for the surface's user edits.
//!
//! [`BufferSurface`]: crate::BufferSurface

use crate::theme::Theme;

/// Trait for editable text surfaces.
///
/// Implementations must uphold two rules:
/// - programmatic writes through [`set_content`](TextSurface::set_content)
///   are not reported back as changes;
/// - every user edit is reported, either by the host calling
///   `EditorSession::on_surface_content_changed` directly or by queuing it
///   for [`take_changes`](TextSurface::take_changes).
pub trait TextSurface {
    /// Returns true once the surface can accept writes.
    ///
    /// While a surface is not ready the session queues its writes.
    fn is_ready(&self) -> bool;

    /// Replaces the whole text.
    fn set_content(&mut self, text: &str);

    /// Returns the current text.
    fn content(&self) -> String;

    /// Switches syntax highlighting to the given editor mode.
    fn set_language_mode(&mut self, mode: &str);

    /// Applies a visual theme.
    fn set_theme(&mut self, theme: Theme);

    /// Returns user edits reported since the last call, oldest first.
    ///
    /// Surfaces that deliver edits through a direct callback keep the
    /// default, which reports nothing.
    fn take_changes(&mut self) -> Vec<String> {
        Vec::new()
    }

    /// Releases the surface. Called exactly once, when the owning session
    /// is closed or dropped.
    fn dispose(&mut self);
}
