//! One collage editing session.
//!
//! [`EditorSession`] is the in-memory document the IPC command handlers
//! mutate: the composition history, the current selection, the working draft
//! name, and where the session was opened from. It owns the catalog of edit
//! operations; each operation computes the next composition from the current
//! one and commits it to the history exactly once.
//!
//! Concurrency model: all operations here are synchronous and complete under
//! one write-lock acquisition, so no two commits can interleave. The single
//! suspending operation (background removal) lives in the command layer and
//! re-enters the session only for its final commit, re-resolving its target
//! through [`EditorSession::apply_processed_image`].

use crate::editor::{Composition, History};
use crate::error::AppError;
use crate::models::Layer;

/// Smallest width/height the resize handles allow.
pub const MIN_LAYER_EXTENT: f64 = 50.0;
/// Largest width/height the resize handles allow.
pub const MAX_LAYER_EXTENT: f64 = 300.0;

/// Where the active session was opened from; determines which documents the
/// save/post/delete flows touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOrigin {
    /// A fresh canvas not yet tied to any stored document.
    Blank,
    /// A moodboard; `draft_id` is the linked work-in-progress draft, created
    /// on first save.
    Board {
        board_id: String,
        draft_id: Option<String>,
    },
    /// A stored draft opened directly.
    Draft { draft_id: String },
    /// A published collage opened for remixing.
    Published { collage_id: String },
}

/// The active editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    history: History,
    /// Index of the selected layer, valid only for the current composition.
    /// Cleared on remove and on outside-click; undo/redo leave it alone.
    selection: Option<usize>,
    origin: SessionOrigin,
    /// Working name for the draft, carried between save dialogs.
    draft_name: String,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::open(Composition::default(), SessionOrigin::Blank, String::new())
    }
}

impl EditorSession {
    /// Start a session on a loaded composition. The loaded state becomes the
    /// undo floor.
    pub fn open(initial: Composition, origin: SessionOrigin, draft_name: String) -> Self {
        Self {
            history: History::new(initial),
            selection: None,
            origin,
            draft_name,
        }
    }

    pub fn composition(&self) -> &Composition {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn origin(&self) -> &SessionOrigin {
        &self.origin
    }

    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    /// The draft backing this session, whatever the origin, if one exists.
    pub fn draft_id(&self) -> Option<&str> {
        match &self.origin {
            SessionOrigin::Board { draft_id, .. } => draft_id.as_deref(),
            SessionOrigin::Draft { draft_id } => Some(draft_id),
            SessionOrigin::Blank | SessionOrigin::Published { .. } => None,
        }
    }

    /// Attach a freshly created draft to the session (first save).
    pub fn link_draft(&mut self, id: String) {
        match &mut self.origin {
            SessionOrigin::Board { draft_id, .. } => *draft_id = Some(id),
            _ => self.origin = SessionOrigin::Draft { draft_id: id },
        }
    }

    /// Detach the draft after it was deleted (post-publish cleanup).
    pub fn unlink_draft(&mut self) {
        match &mut self.origin {
            SessionOrigin::Board { draft_id, .. } => *draft_id = None,
            SessionOrigin::Draft { .. } => self.origin = SessionOrigin::Blank,
            _ => {}
        }
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Select the layer at `index` for the toolbar actions.
    pub fn select(&mut self, index: usize) -> Result<(), AppError> {
        self.composition().layer(index)?;
        self.selection = Some(index);
        Ok(())
    }

    /// Outside-click: drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ── Edit operations ───────────────────────────────────────────────────
    //
    // Each computes a new composition from the current snapshot and commits
    // it. The previous snapshot stays in the history untouched.

    /// Add one image from the board's pin list. New layers start at the
    /// origin with default size and render on top.
    pub fn add_layer(&mut self, image_url: impl Into<String>) {
        let next = self.composition().appended(Layer::new(image_url));
        self.history.commit(next);
    }

    /// Import every layer of an existing collage in one step. Placement is
    /// reset so the imported stack lands at the origin, but rotation, flip,
    /// opacity and transparency carry over. One history entry for the whole
    /// import.
    pub fn add_collage_layers(&mut self, layers: impl IntoIterator<Item = Layer>) {
        let reset = layers.into_iter().map(|l| Layer {
            x: 0.0,
            y: 0.0,
            width: Layer::DEFAULT_EXTENT,
            height: Layer::DEFAULT_EXTENT,
            ..l
        });
        let next = self.composition().extended(reset);
        self.history.commit(next);
    }

    /// Drag-end: commit the final position. Intermediate drag positions are
    /// transient UI state and never reach the history.
    pub fn move_layer(&mut self, index: usize, x: f64, y: f64) -> Result<(), AppError> {
        let next = self
            .composition()
            .replaced(index, |l| l.with_position(x, y))?;
        self.history.commit(next);
        Ok(())
    }

    /// Resize-end: commit the final size, clamped to the handle range.
    pub fn resize_layer(&mut self, index: usize, width: f64, height: f64) -> Result<(), AppError> {
        let width = width.clamp(MIN_LAYER_EXTENT, MAX_LAYER_EXTENT);
        let height = height.clamp(MIN_LAYER_EXTENT, MAX_LAYER_EXTENT);
        let next = self
            .composition()
            .replaced(index, |l| l.with_size(width, height))?;
        self.history.commit(next);
        Ok(())
    }

    pub fn flip_layer(&mut self, index: usize) -> Result<(), AppError> {
        let next = self.composition().replaced(index, Layer::mirrored)?;
        self.history.commit(next);
        Ok(())
    }

    pub fn rotate_layer(&mut self, index: usize) -> Result<(), AppError> {
        let next = self.composition().replaced(index, Layer::rotated)?;
        self.history.commit(next);
        Ok(())
    }

    /// Commit one opacity value. The slider fires this per change event, so
    /// every tick is its own undo step.
    pub fn set_opacity(&mut self, index: usize, value: f64) -> Result<(), AppError> {
        let value = value.clamp(0.0, 1.0);
        let next = self
            .composition()
            .replaced(index, |l| l.with_opacity(value))?;
        self.history.commit(next);
        Ok(())
    }

    /// Remove the layer and clear the selection — the old index would now
    /// address a different layer.
    pub fn remove_layer(&mut self, index: usize) -> Result<(), AppError> {
        let next = self.composition().removed(index)?;
        self.history.commit(next);
        self.selection = None;
        Ok(())
    }

    /// Commit the background-removal result. Because the operation awaited
    /// network I/O between capture and commit, the target is re-resolved by
    /// the image URL captured at issue time: the original index wins if it
    /// still shows that URL, otherwise the first layer with the URL is
    /// taken. If no layer matches, the edit fails without committing.
    pub fn apply_processed_image(
        &mut self,
        index: usize,
        original_url: &str,
        processed_url: &str,
    ) -> Result<(), AppError> {
        let composition = self.composition();
        let target = match composition.layer(index) {
            Ok(layer) if layer.image_url == original_url => index,
            _ => composition
                .layers()
                .iter()
                .position(|l| l.image_url == original_url)
                .ok_or_else(|| {
                    AppError::NotFound(
                        "the image was removed from the collage before processing finished"
                            .to_string(),
                    )
                })?,
        };
        let next =
            composition.replaced(target, |l| l.with_processed_image(processed_url))?;
        self.history.commit(next);
        Ok(())
    }

    // ── Undo / redo ───────────────────────────────────────────────────────

    /// Step back one committed edit. A safe no-op on the freshly loaded
    /// state.
    pub fn undo(&mut self) -> &Composition {
        self.history.undo()
    }

    /// Step forward into the most recently undone edit.
    pub fn redo(&mut self) -> &Composition {
        self.history.redo()
    }
}
