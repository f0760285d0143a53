//! Save, post, delete and background-removal command handlers.
//!
//! These are the side-effecting flows: they translate the in-memory
//! composition into one of the two stored shapes and hand it to the document
//! store. The publish flow is two-step — write the published record, then
//! delete the source draft — in that order deliberately: a crash between the
//! steps leaves a harmless duplicate, never data loss.
//!
//! Background removal is the one operation that suspends mid-edit. It
//! captures its target up front, performs the network round-trips on the
//! blocking pool, and re-enters the session only for the final commit, where
//! the target is re-resolved by the captured image URL (see
//! [`crate::editor::EditorSession::apply_processed_image`]).

use serde::Serialize;
use uuid::Uuid;

use super::session::SessionSnapshot;
use super::{now_rfc3339, read_session, require_identity, write_session};
use crate::collage::types::{BoardDoc, DraftDoc};
use crate::collage::{boards_of, codec, drafts_of, PUBLIC_COLLAGES};
use crate::editor::SessionOrigin;
use crate::error::AppError;
use crate::services::fetch_image_bytes;
use crate::state::AppState;
use crate::store::{create_doc, read_doc, write_doc, DocumentStore};

/// Result of a successful draft save.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub draft_id: String,
    /// Confirmation text for the frontend snackbar.
    pub message: String,
}

/// Result of a successful post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOutcome {
    pub collage_id: String,
    pub message: String,
}

/// Result of a successful background removal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOutcome {
    pub snapshot: SessionSnapshot,
    pub message: String,
}

// ── save_draft ────────────────────────────────────────────────────────────

/// Testable inner logic for [`save_draft`].
///
/// Updates the linked draft in place, or creates one on first save. Creating
/// a draft from a board session also links `draftId` back onto the board
/// document. `created_at` is set once and preserved on every later save.
pub(crate) fn save_draft_inner(name: &str, state: &AppState) -> Result<SaveOutcome, AppError> {
    let identity = require_identity(&state.identity)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::NameRequired(
            "Please enter a name for the draft.".to_string(),
        ));
    }

    let now = now_rfc3339();
    let drafts = drafts_of(&identity.uid);
    let mut session = write_session(&state.session)?;

    let draft_id = match session.draft_id().map(str::to_string) {
        Some(id) => {
            let created_at = read_doc::<DraftDoc>(state.store.as_ref(), &drafts, &id)?
                .map(|d| d.created_at)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| now.clone());
            let doc = codec::to_draft_doc(name, session.composition(), created_at, now);
            write_doc(state.store.as_ref(), &drafts, &id, &doc)?;
            id
        }
        None => {
            let doc = codec::to_draft_doc(name, session.composition(), now.clone(), now);
            let id = create_doc(state.store.as_ref(), &drafts, &doc)?;
            session.link_draft(id.clone());

            if let SessionOrigin::Board { board_id, .. } = session.origin() {
                let board_id = board_id.clone();
                let boards = boards_of(&identity.uid);
                let mut board: BoardDoc =
                    read_doc(state.store.as_ref(), &boards, &board_id)?
                        .ok_or_else(|| AppError::NotFound("Board not found.".to_string()))?;
                board.draft_id = Some(id.clone());
                write_doc(state.store.as_ref(), &boards, &board_id, &board)?;
            }
            id
        }
    };

    session.set_draft_name(name);
    tracing::info!(%draft_id, "draft saved");

    Ok(SaveOutcome {
        draft_id,
        message: "Draft saved successfully!".to_string(),
    })
}

// ── post_collage ──────────────────────────────────────────────────────────

/// Testable inner logic for [`post_collage`].
///
/// Writes the published record, then deletes the source draft. The draft is
/// transient staging; it does not outlive a successful publish. A failed
/// delete surfaces as an error while the published record stands.
pub(crate) fn post_collage_inner(name: &str, state: &AppState) -> Result<PostOutcome, AppError> {
    let identity = require_identity(&state.identity)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::NameRequired(
            "Collage name cannot be empty.".to_string(),
        ));
    }

    let now = now_rfc3339();
    let mut session = write_session(&state.session)?;

    let doc = codec::to_published_doc(
        name,
        session.composition(),
        &identity,
        (codec::CONTAINER_WIDTH, codec::CONTAINER_HEIGHT),
        now.clone(),
        now,
    );
    let collage_id = create_doc(state.store.as_ref(), PUBLIC_COLLAGES, &doc)?;
    tracing::info!(%collage_id, "collage posted");

    if let Some(draft_id) = session.draft_id().map(str::to_string) {
        state.store.delete(&drafts_of(&identity.uid), &draft_id)?;
        session.unlink_draft();
    }

    Ok(PostOutcome {
        collage_id,
        message: "Collage posted successfully!".to_string(),
    })
}

// ── delete_draft / delete_board ───────────────────────────────────────────

/// Testable inner logic for [`delete_draft`]. Terminal for the draft; the
/// session stays open on the now-unsaved composition.
pub(crate) fn delete_draft_inner(state: &AppState) -> Result<String, AppError> {
    let identity = require_identity(&state.identity)?;
    let mut session = write_session(&state.session)?;
    let draft_id = session
        .draft_id()
        .map(str::to_string)
        .ok_or_else(|| AppError::NotFound("No draft to delete.".to_string()))?;

    let drafts = drafts_of(&identity.uid);
    read_doc::<DraftDoc>(state.store.as_ref(), &drafts, &draft_id)?
        .ok_or_else(|| AppError::NotFound("Draft not found.".to_string()))?;
    state.store.delete(&drafts, &draft_id)?;
    session.unlink_draft();

    tracing::info!(%draft_id, "draft deleted");
    Ok("Draft deleted successfully!".to_string())
}

/// Testable inner logic for [`delete_board`]. Terminal for the session; the
/// editor resets to a blank canvas.
pub(crate) fn delete_board_inner(state: &AppState) -> Result<String, AppError> {
    let identity = require_identity(&state.identity)?;
    let mut session = write_session(&state.session)?;
    let board_id = match session.origin() {
        SessionOrigin::Board { board_id, .. } => board_id.clone(),
        _ => return Err(AppError::NotFound("No board is open.".to_string())),
    };

    let boards = boards_of(&identity.uid);
    read_doc::<BoardDoc>(state.store.as_ref(), &boards, &board_id)?
        .ok_or_else(|| AppError::NotFound("Board not found.".to_string()))?;
    state.store.delete(&boards, &board_id)?;
    *session = crate::editor::EditorSession::default();

    tracing::info!(%board_id, "board deleted");
    Ok("Board deleted successfully!".to_string())
}

// ── remove_background ─────────────────────────────────────────────────────

/// Testable inner logic for [`remove_background`].
///
/// Fetch image bytes, run them through the transform service, store the
/// result, then swap the layer's URL and commit. Failure at any step aborts
/// without committing; an already-uploaded result blob is acceptable garbage.
/// Other edits are not blocked while this is in flight.
pub(crate) async fn remove_background_inner(
    index: usize,
    state: &AppState,
) -> Result<RemovalOutcome, AppError> {
    let original_url = {
        let session = read_session(&state.session)?;
        let layer = session.composition().layer(index)?;
        if layer.image_url.is_empty() {
            return Err(AppError::NotFound("No image URL found".to_string()));
        }
        layer.image_url.clone()
    };

    // Network and file I/O run on the blocking pool; the session lock is not
    // held, so the user keeps editing while this is in flight.
    let remover = std::sync::Arc::clone(&state.remover);
    let objects = std::sync::Arc::clone(&state.objects);
    let fetch_url = original_url.clone();
    let processed_url = tokio::task::spawn_blocking(move || {
        let image = fetch_image_bytes(&fetch_url)?;
        let processed = remover.remove_background(&image)?;
        let path = format!("processed-images/{}.png", Uuid::new_v4());
        objects.put(&path, &processed)
    })
    .await
    .map_err(|e| AppError::Io(format!("background removal task panicked: {e}")))??;

    let snapshot = {
        let mut session = write_session(&state.session)?;
        session.apply_processed_image(index, &original_url, &processed_url)?;
        SessionSnapshot::from(&*session)
    };

    // Keep the linked draft in sync, as the edit already reached the store
    // for its blob. Best-effort: the in-memory commit above stands either
    // way, and the next explicit save retries.
    if let Err(e) = persist_linked_draft(state) {
        tracing::warn!("draft sync after background removal failed: {e}");
    }

    Ok(RemovalOutcome {
        snapshot,
        message: "Background removed successfully!".to_string(),
    })
}

/// Write the current composition to the linked draft, when signed in and a
/// draft exists. No-op otherwise.
fn persist_linked_draft(state: &AppState) -> Result<(), AppError> {
    let identity = match require_identity(&state.identity) {
        Ok(identity) => identity,
        Err(AppError::NotAuthenticated) => return Ok(()),
        Err(e) => return Err(e),
    };
    let session = read_session(&state.session)?;
    let Some(draft_id) = session.draft_id().map(str::to_string) else {
        return Ok(());
    };

    let drafts = drafts_of(&identity.uid);
    let now = now_rfc3339();
    let existing: Option<DraftDoc> = read_doc(state.store.as_ref(), &drafts, &draft_id)?;
    let name = if session.draft_name().is_empty() {
        existing.as_ref().map(|d| d.name.clone()).unwrap_or_default()
    } else {
        session.draft_name().to_string()
    };
    let created_at = existing
        .map(|d| d.created_at)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| now.clone());

    let doc = codec::to_draft_doc(&name, session.composition(), created_at, now);
    write_doc(state.store.as_ref(), &drafts, &draft_id, &doc)
}

// ── Tauri command wrappers ────────────────────────────────────────────────

/// Save the composition as a private draft, creating it on first save.
#[tauri::command]
pub async fn save_draft(
    name: String,
    state: tauri::State<'_, AppState>,
) -> Result<SaveOutcome, AppError> {
    save_draft_inner(&name, &state)
}

/// Post the composition as a public collage and delete the source draft.
#[tauri::command]
pub async fn post_collage(
    name: String,
    state: tauri::State<'_, AppState>,
) -> Result<PostOutcome, AppError> {
    post_collage_inner(&name, &state)
}

/// Delete the draft backing the active session.
#[tauri::command]
pub async fn delete_draft(state: tauri::State<'_, AppState>) -> Result<String, AppError> {
    delete_draft_inner(&state)
}

/// Delete the open board.
#[tauri::command]
pub async fn delete_board(state: tauri::State<'_, AppState>) -> Result<String, AppError> {
    delete_board_inner(&state)
}

/// Run a layer's image through the background-removal service and swap in
/// the processed result.
#[tauri::command]
pub async fn remove_background(
    index: usize,
    state: tauri::State<'_, AppState>,
) -> Result<RemovalOutcome, AppError> {
    remove_background_inner(index, &state).await
}
