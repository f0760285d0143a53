//! The collage editing engine.
//!
//! - [`composition`] — the ordered layer sequence for one collage-in-progress
//! - [`history`]     — snapshot-based linear undo/redo over compositions
//! - [`session`]     — one editing session: history, selection and the
//!   catalog of edit operations the IPC layer exposes

pub mod composition;
pub mod history;
pub mod session;

pub use composition::Composition;
pub use history::History;
pub use session::{EditorSession, SessionOrigin};
