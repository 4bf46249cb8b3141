//! Editor session for Runpad.
//!
//! This crate keeps an editable text surface synchronized with the
//! authoritative `{language, content}` pair of a session:
//! - `TextSurface` - the capability a host editor widget must provide
//! - `BufferSurface` - an in-memory surface used by the REPL and tests
//! - `EditorSession` - the source of truth that reconciles the surface
//!
//! # Example
//!
//! ```
//! use runpad_editor::{BufferSurface, EditorSession, Theme};
//!
//! let mut session = EditorSession::new(BufferSurface::new());
//! session.set_language("rs").unwrap();
//! session.set_visual_theme(Theme::Light);
//!
//! assert_eq!(session.language_id(), "rs");
//! assert_eq!(session.surface().text(), session.content());
//! ```

pub mod buffer;
pub mod error;
pub mod session;
pub mod surface;
pub mod theme;

pub use buffer::BufferSurface;
pub use error::{EditorError, Result};
pub use session::{ChangeListener, EditorSession, SyncState};
pub use surface::TextSurface;
pub use theme::Theme;
