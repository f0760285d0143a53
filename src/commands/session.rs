//! Identity and session-lifecycle command handlers.
//!
//! Opening a board, draft or published collage replaces the active
//! [`EditorSession`]; the loaded state becomes the undo floor. Every handler
//! returns a [`SessionSnapshot`] (or a view containing one) so the frontend
//! re-renders from the latest state without a second query.

use std::sync::RwLock;

use serde::Serialize;

use super::{read_session, require_identity, write_session};
use crate::collage::types::{BoardDoc, DraftDoc, PinDoc, PublishedCollageDoc};
use crate::collage::{boards_of, codec, drafts_of, PUBLIC_COLLAGES};
use crate::editor::{EditorSession, SessionOrigin};
use crate::error::AppError;
use crate::models::Layer;
use crate::state::{AppState, UserIdentity};
use crate::store::read_doc;

/// Serializable snapshot of the active session sent to the frontend after
/// every edit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Layers of the current composition in stacking order.
    pub layers: Vec<Layer>,
    /// Index of the selected layer, if any.
    pub selected: Option<usize>,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Working name carried between save dialogs.
    pub draft_name: String,
}

impl From<&EditorSession> for SessionSnapshot {
    fn from(session: &EditorSession) -> Self {
        Self {
            layers: session.composition().layers().to_vec(),
            selected: session.selection(),
            can_undo: session.history().can_undo(),
            can_redo: session.history().can_redo(),
            draft_name: session.draft_name().to_string(),
        }
    }
}

/// Everything the board page needs on open: board metadata, the pin palette,
/// and the hydrated editing session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub name: String,
    pub description: String,
    pub pins: Vec<PinDoc>,
    pub snapshot: SessionSnapshot,
}

// ── Identity ──────────────────────────────────────────────────────────────

/// Testable inner logic for [`set_identity`].
pub(crate) fn set_identity_inner(
    identity: UserIdentity,
    identity_lock: &RwLock<Option<UserIdentity>>,
) -> Result<(), AppError> {
    let mut slot = identity_lock
        .write()
        .map_err(|e| AppError::Io(format!("identity lock poisoned: {e}")))?;
    *slot = Some(identity);
    Ok(())
}

/// Testable inner logic for [`clear_identity`].
pub(crate) fn clear_identity_inner(
    identity_lock: &RwLock<Option<UserIdentity>>,
) -> Result<(), AppError> {
    let mut slot = identity_lock
        .write()
        .map_err(|e| AppError::Io(format!("identity lock poisoned: {e}")))?;
    *slot = None;
    Ok(())
}

// ── Session lifecycle ─────────────────────────────────────────────────────

/// Testable inner logic for [`new_session`]: replace the active session with
/// a blank canvas.
pub(crate) fn new_session_inner(
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    *session = EditorSession::default();
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`open_board`].
///
/// Reads the board document; if a draft is linked, the session hydrates from
/// that draft, otherwise from the collage stored on the board itself. A
/// dangling draft link falls back to the board's own collage.
pub(crate) fn open_board_inner(board_id: &str, state: &AppState) -> Result<BoardView, AppError> {
    let identity = require_identity(&state.identity)?;
    let boards = boards_of(&identity.uid);

    let board: BoardDoc = read_doc(state.store.as_ref(), &boards, board_id)?
        .ok_or_else(|| AppError::NotFound("Board not found.".to_string()))?;

    let (composition, draft_id, draft_name) = match &board.draft_id {
        Some(id) => {
            let draft: Option<DraftDoc> =
                read_doc(state.store.as_ref(), &drafts_of(&identity.uid), id)?;
            match draft {
                Some(draft) => (
                    codec::load_from_draft(&draft),
                    Some(id.clone()),
                    draft.name,
                ),
                None => (
                    crate::editor::Composition::new(board.collage.clone()),
                    None,
                    String::new(),
                ),
            }
        }
        None => (
            crate::editor::Composition::new(board.collage.clone()),
            None,
            String::new(),
        ),
    };

    let mut session = write_session(&state.session)?;
    *session = EditorSession::open(
        composition,
        SessionOrigin::Board {
            board_id: board_id.to_string(),
            draft_id,
        },
        draft_name,
    );

    tracing::info!(board_id, layers = session.composition().len(), "opened board");

    Ok(BoardView {
        name: board.name,
        description: board.description,
        pins: board.pins,
        snapshot: SessionSnapshot::from(&*session),
    })
}

/// Testable inner logic for [`open_draft`].
pub(crate) fn open_draft_inner(
    draft_id: &str,
    state: &AppState,
) -> Result<SessionSnapshot, AppError> {
    let identity = require_identity(&state.identity)?;

    let draft: DraftDoc = read_doc(state.store.as_ref(), &drafts_of(&identity.uid), draft_id)?
        .ok_or_else(|| AppError::NotFound("Draft not found.".to_string()))?;

    let mut session = write_session(&state.session)?;
    *session = EditorSession::open(
        codec::load_from_draft(&draft),
        SessionOrigin::Draft {
            draft_id: draft_id.to_string(),
        },
        draft.name,
    );

    tracing::info!(draft_id, layers = session.composition().len(), "opened draft");

    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`open_published`]: open a public collage for
/// remixing. No sign-in required to read public collages.
pub(crate) fn open_published_inner(
    collage_id: &str,
    state: &AppState,
) -> Result<SessionSnapshot, AppError> {
    let collage: PublishedCollageDoc =
        read_doc(state.store.as_ref(), PUBLIC_COLLAGES, collage_id)?
            .ok_or_else(|| AppError::NotFound("Collage not found.".to_string()))?;

    let mut session = write_session(&state.session)?;
    *session = EditorSession::open(
        codec::load_from_published(&collage),
        SessionOrigin::Published {
            collage_id: collage_id.to_string(),
        },
        collage.name,
    );

    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`get_session_snapshot`].
pub(crate) fn get_session_snapshot_inner(
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let session = read_session(session_lock)?;
    Ok(SessionSnapshot::from(&*session))
}

// ── Tauri command wrappers ────────────────────────────────────────────────

/// Record the signed-in user reported by the shell's auth layer.
#[tauri::command]
pub async fn set_identity(
    uid: String,
    username: String,
    state: tauri::State<'_, AppState>,
) -> Result<(), AppError> {
    set_identity_inner(UserIdentity { uid, username }, &state.identity)
}

/// Forget the signed-in user.
#[tauri::command]
pub async fn clear_identity(state: tauri::State<'_, AppState>) -> Result<(), AppError> {
    clear_identity_inner(&state.identity)
}

/// Replace the active session with a blank canvas.
#[tauri::command]
pub async fn new_session(
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    new_session_inner(&state.session)
}

/// Open a moodboard and hydrate the editor from its linked draft (or its own
/// collage when no draft exists).
#[tauri::command]
pub async fn open_board(
    board_id: String,
    state: tauri::State<'_, AppState>,
) -> Result<BoardView, AppError> {
    open_board_inner(&board_id, &state)
}

/// Open a stored draft for editing.
#[tauri::command]
pub async fn open_draft(
    draft_id: String,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    open_draft_inner(&draft_id, &state)
}

/// Open a published collage for remixing.
#[tauri::command]
pub async fn open_published(
    collage_id: String,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    open_published_inner(&collage_id, &state)
}

/// Return the current session snapshot without touching anything.
#[tauri::command]
pub async fn get_session_snapshot(
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    get_session_snapshot_inner(&state.session)
}
