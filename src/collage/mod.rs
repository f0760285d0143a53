//! Stored collage documents and their translation to the in-memory model.
//!
//! Two persisted shapes exist for historical reasons and must both be
//! preserved: drafts store layer attributes flat, published collages nest the
//! geometry under a `layout` key. [`types`] mirrors the stored JSON;
//! [`codec`] converts either shape to the one canonical [`crate::models::Layer`]
//! representation and back.

pub mod codec;
pub mod types;

/// Collection path for a user's moodboards.
pub fn boards_of(uid: &str) -> String {
    format!("user/{uid}/boards")
}

/// Collection path for a user's private drafts.
pub fn drafts_of(uid: &str) -> String {
    format!("user/{uid}/drafts")
}

/// Collection path for publicly posted collages.
pub const PUBLIC_COLLAGES: &str = "publicCollages";
