//! Serializable types mirroring the stored document shapes.
//!
//! These are the **on-disk** representations. The in-memory representation is
//! [`crate::editor::Composition`] over [`crate::models::Layer`]; conversion
//! between the two is done in [`super::codec`].
//!
//! Existing records predate the current writer and may omit any numeric
//! field, the whole `layout` object, or the social counters — every field
//! here defaults on deserialization rather than failing.

use serde::{Deserialize, Serialize};

use crate::models::Layer;

fn default_opacity() -> f64 {
    1.0
}

fn default_extent() -> f64 {
    Layer::DEFAULT_EXTENT
}

fn default_container_width() -> u32 {
    1000
}

fn default_container_height() -> u32 {
    800
}

/// A private work-in-progress collage. Layer attributes are stored flat, so
/// the entries deserialize straight into [`Layer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDoc {
    pub name: String,
    #[serde(default)]
    pub collage: Vec<Layer>,
    /// RFC-3339 creation timestamp (empty string when not yet persisted).
    #[serde(default)]
    pub created_at: String,
    /// RFC-3339 last-modified timestamp.
    #[serde(default)]
    pub updated_at: String,
}

/// Geometry block nested inside a published-collage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDoc {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i64,
}

impl Default for LayoutDoc {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: Layer::DEFAULT_EXTENT,
            height: Layer::DEFAULT_EXTENT,
            rotation: 0.0,
            z_index: 0,
        }
    }
}

/// One layer of a published collage: geometry under `layout`, appearance
/// flags alongside it. A record may omit `layout` entirely; it then defaults
/// to origin placement at default size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedLayerDoc {
    pub image_url: String,
    #[serde(default)]
    pub layout: LayoutDoc,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub flipped: bool,
    #[serde(default)]
    pub has_transparency: bool,
}

/// A publicly posted collage with its social metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedCollageDoc {
    pub name: String,
    #[serde(default)]
    pub collage: Vec<PublishedLayerDoc>,
    /// Canvas width the layout coordinates were authored against.
    #[serde(default = "default_container_width")]
    pub container_width: u32,
    /// Canvas height the layout coordinates were authored against.
    #[serde(default = "default_container_height")]
    pub container_height: u32,
    /// Owner's user id.
    #[serde(default)]
    pub posted_by: String,
    /// Owner's display name at post time.
    #[serde(default)]
    pub posted_by_username: String,
    #[serde(default)]
    pub likes: i64,
    /// Comment payloads are owned by the social layer; carried opaquely here.
    #[serde(default)]
    pub comments: Vec<serde_json::Value>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// An image available on a board, waiting to be added to the collage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDoc {
    pub image_url: String,
    #[serde(default)]
    pub title: String,
}

/// A moodboard document: the pin palette, an optional linked draft, and the
/// board's own collage field used before a draft exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDoc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pins: Vec<PinDoc>,
    /// Collage state saved directly on the board (legacy; superseded by the
    /// linked draft once one exists).
    #[serde(default)]
    pub collage: Vec<Layer>,
    /// Id of the draft holding this board's work in progress, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    /// References to published collages imported onto this board.
    #[serde(default)]
    pub collages: Vec<serde_json::Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
