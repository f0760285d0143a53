//! Tauri IPC command handlers.
//!
//! Sub-modules are grouped by concern:
//! - [`session`] — identity, opening boards/drafts/collages, state snapshots
//! - [`edit`]    — the edit-operation catalog plus undo/redo and selection
//! - [`publish`] — save draft, post collage, deletes, background removal
//!
//! All handlers follow the `_inner` + `#[tauri::command]` wrapper pattern:
//! `_inner` functions take the state they need and contain the business
//! logic, directly testable without Tauri; the `#[tauri::command]` wrappers
//! extract managed state and delegate.

pub mod edit;
pub mod publish;
pub mod session;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::editor::EditorSession;
use crate::error::AppError;
use crate::state::UserIdentity;

pub(crate) fn read_session(
    lock: &RwLock<EditorSession>,
) -> Result<RwLockReadGuard<'_, EditorSession>, AppError> {
    lock.read()
        .map_err(|e| AppError::Io(format!("session lock poisoned: {e}")))
}

pub(crate) fn write_session(
    lock: &RwLock<EditorSession>,
) -> Result<RwLockWriteGuard<'_, EditorSession>, AppError> {
    lock.write()
        .map_err(|e| AppError::Io(format!("session lock poisoned: {e}")))
}

/// The signed-in user, or [`AppError::NotAuthenticated`]. Handlers call this
/// once up front and pass the identity down explicitly.
pub(crate) fn require_identity(
    lock: &RwLock<Option<UserIdentity>>,
) -> Result<UserIdentity, AppError> {
    lock.read()
        .map_err(|e| AppError::Io(format!("identity lock poisoned: {e}")))?
        .clone()
        .ok_or(AppError::NotAuthenticated)
}

/// Current UTC time as an RFC-3339 string, the timestamp format of every
/// stored document.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
