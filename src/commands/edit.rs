//! Edit-operation IPC command handlers.
//!
//! Each handler applies one user-visible edit to the active session and
//! returns the resulting [`SessionSnapshot`]; the frontend re-renders from
//! that. All of these are synchronous with respect to the in-memory model —
//! they complete and commit under one lock acquisition, so no two commits can
//! race. Undo and redo only move the history read pointer; they never create
//! new entries.
//!
//! Gesture-driven operations (drag, resize) are fired by the frontend on
//! gesture end, so one gesture is one history entry. The opacity slider fires
//! per change event instead; every tick is its own undo step.

use std::sync::RwLock;

use super::session::SessionSnapshot;
use super::write_session;
use crate::collage::types::PublishedCollageDoc;
use crate::collage::{codec, PUBLIC_COLLAGES};
use crate::editor::EditorSession;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::read_doc;

// ── Layer edits ───────────────────────────────────────────────────────────

/// Testable inner logic for [`add_layer`].
pub(crate) fn add_layer_inner(
    image_url: &str,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.add_layer(image_url);
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`import_collage`].
///
/// Reads a published collage and appends all of its layers to the current
/// composition in one history step, placement reset to the origin.
pub(crate) fn import_collage_inner(
    collage_id: &str,
    state: &AppState,
) -> Result<SessionSnapshot, AppError> {
    let collage: PublishedCollageDoc =
        read_doc(state.store.as_ref(), PUBLIC_COLLAGES, collage_id)?
            .ok_or_else(|| AppError::NotFound("Collage not found.".to_string()))?;
    let layers = codec::load_from_published(&collage).layers().to_vec();

    let mut session = write_session(&state.session)?;
    session.add_collage_layers(layers);
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`move_layer`]. Fired on drag-end; intermediate
/// drag positions never reach the history.
pub(crate) fn move_layer_inner(
    index: usize,
    x: f64,
    y: f64,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.move_layer(index, x, y)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`resize_layer`]. Fired on resize-end.
pub(crate) fn resize_layer_inner(
    index: usize,
    width: f64,
    height: f64,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.resize_layer(index, width, height)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`flip_layer`].
pub(crate) fn flip_layer_inner(
    index: usize,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.flip_layer(index)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`rotate_layer`].
pub(crate) fn rotate_layer_inner(
    index: usize,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.rotate_layer(index)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`set_layer_opacity`].
pub(crate) fn set_layer_opacity_inner(
    index: usize,
    value: f64,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.set_opacity(index, value)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`remove_layer`].
pub(crate) fn remove_layer_inner(
    index: usize,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.remove_layer(index)?;
    Ok(SessionSnapshot::from(&*session))
}

// ── Undo / redo ───────────────────────────────────────────────────────────

/// Testable inner logic for [`undo`].
pub(crate) fn undo_inner(
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.undo();
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`redo`].
pub(crate) fn redo_inner(
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.redo();
    Ok(SessionSnapshot::from(&*session))
}

// ── Selection ─────────────────────────────────────────────────────────────

/// Testable inner logic for [`select_layer`].
pub(crate) fn select_layer_inner(
    index: usize,
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.select(index)?;
    Ok(SessionSnapshot::from(&*session))
}

/// Testable inner logic for [`clear_selection`]. Fired on outside-click.
pub(crate) fn clear_selection_inner(
    session_lock: &RwLock<EditorSession>,
) -> Result<SessionSnapshot, AppError> {
    let mut session = write_session(session_lock)?;
    session.clear_selection();
    Ok(SessionSnapshot::from(&*session))
}

// ── Tauri command wrappers ────────────────────────────────────────────────

/// Add one image from the pin palette to the collage.
#[tauri::command]
pub async fn add_layer(
    image_url: String,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    add_layer_inner(&image_url, &state.session)
}

/// Import all layers of a published collage into the current composition.
#[tauri::command]
pub async fn import_collage(
    collage_id: String,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    import_collage_inner(&collage_id, &state)
}

/// Commit a layer's final position after a drag.
#[tauri::command]
pub async fn move_layer(
    index: usize,
    x: f64,
    y: f64,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    move_layer_inner(index, x, y, &state.session)
}

/// Commit a layer's final size after a resize.
#[tauri::command]
pub async fn resize_layer(
    index: usize,
    width: f64,
    height: f64,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    resize_layer_inner(index, width, height, &state.session)
}

/// Mirror a layer horizontally.
#[tauri::command]
pub async fn flip_layer(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    flip_layer_inner(index, &state.session)
}

/// Rotate a layer a further 90 degrees.
#[tauri::command]
pub async fn rotate_layer(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    rotate_layer_inner(index, &state.session)
}

/// Set a layer's opacity; one undo step per slider tick.
#[tauri::command]
pub async fn set_layer_opacity(
    index: usize,
    value: f64,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    set_layer_opacity_inner(index, value, &state.session)
}

/// Remove a layer from the collage.
#[tauri::command]
pub async fn remove_layer(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    remove_layer_inner(index, &state.session)
}

/// Step back one edit.
#[tauri::command]
pub async fn undo(state: tauri::State<'_, AppState>) -> Result<SessionSnapshot, AppError> {
    undo_inner(&state.session)
}

/// Step forward into the most recently undone edit.
#[tauri::command]
pub async fn redo(state: tauri::State<'_, AppState>) -> Result<SessionSnapshot, AppError> {
    redo_inner(&state.session)
}

/// Select a layer for the toolbar actions.
#[tauri::command]
pub async fn select_layer(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    select_layer_inner(index, &state.session)
}

/// Drop the selection (outside-click).
#[tauri::command]
pub async fn clear_selection(
    state: tauri::State<'_, AppState>,
) -> Result<SessionSnapshot, AppError> {
    clear_selection_inner(&state.session)
}
