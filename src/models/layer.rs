//! Layer data model.
//!
//! [`Layer`] is the canonical in-memory representation of one image placed on
//! the collage canvas: position, size, rotation, mirror flag, opacity and
//! stacking hint. It is also the flat on-disk representation used inside
//! draft documents (the published-collage document nests the geometry under a
//! `layout` key instead; see [`crate::collage::types`]).
//!
//! Layers have no stable id. Within one editing session a layer is addressed
//! by its position in the composition array; removing a layer shifts every
//! later index down by one. Render keys pair the index with the image URL.
//!
//! Every transform below returns a copy. Snapshots held by the undo history
//! alias the layers of earlier states, so a layer must never be mutated in
//! place once it is part of a committed composition.

use serde::{Deserialize, Serialize};

fn default_extent() -> f64 {
    Layer::DEFAULT_EXTENT
}

fn default_opacity() -> f64 {
    1.0
}

/// One positioned image instance within a composition.
///
/// Fields are serialized with camelCase keys so the TypeScript frontend and
/// the stored document shapes share one naming convention. Missing numeric
/// fields in stored documents are filled with the documented defaults on
/// deserialization (x 0, y 0, width 100, height 100, rotation 0, zIndex 0,
/// opacity 1, flipped false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// URL of the visual asset. Swapped in place by background removal; the
    /// layer keeps its identity (its index) when that happens.
    pub image_url: String,
    /// Top-left x in canvas pixel space. The canvas is conceptually
    /// unbounded; off-canvas positions are legal and simply render clipped.
    #[serde(default)]
    pub x: f64,
    /// Top-left y in canvas pixel space.
    #[serde(default)]
    pub y: f64,
    /// Rendered width in pixels.
    #[serde(default = "default_extent")]
    pub width: f64,
    /// Rendered height in pixels.
    #[serde(default = "default_extent")]
    pub height: f64,
    /// Rotation in degrees. Accumulates in +90 steps without modulo
    /// reduction; stored values above 360 exist in older documents and must
    /// survive round-trips. Use [`Layer::display_rotation`] when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Horizontal mirror flag.
    #[serde(default)]
    pub flipped: bool,
    /// Opacity in `[0.0, 1.0]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Stacking hint. Persisted for compatibility but not reassigned by any
    /// edit; layers render in array order and the selected layer is promoted
    /// visually by the frontend, not by rewriting this field.
    #[serde(default)]
    pub z_index: i64,
    /// Set once the image has been through background removal, so renderers
    /// can draw it over a transparent backdrop.
    #[serde(default)]
    pub has_transparency: bool,
}

impl Layer {
    /// Default width and height for a freshly added layer.
    pub const DEFAULT_EXTENT: f64 = 100.0;

    /// A new layer at the canvas origin with default size and appearance.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            x: 0.0,
            y: 0.0,
            width: Self::DEFAULT_EXTENT,
            height: Self::DEFAULT_EXTENT,
            rotation: 0.0,
            flipped: false,
            opacity: 1.0,
            z_index: 0,
            has_transparency: false,
        }
    }

    /// Copy with the position replaced. No bounds checking.
    pub fn with_position(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }

    /// Copy with the size replaced. Accepts any positive numbers; clamping to
    /// the resize-handle range is the edit operation's job, not the model's.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Copy rotated a further 90 degrees clockwise. The stored value grows
    /// without bound; four rotations store 360, not 0.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation + 90.0,
            ..self.clone()
        }
    }

    /// Copy with the horizontal mirror flag toggled.
    pub fn mirrored(&self) -> Self {
        Self {
            flipped: !self.flipped,
            ..self.clone()
        }
    }

    /// Copy with the opacity replaced. The caller constrains the value to
    /// `[0, 1]`; the model does not re-clamp.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        Self {
            opacity,
            ..self.clone()
        }
    }

    /// Copy with the image swapped for a background-removed version.
    pub fn with_processed_image(&self, image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            has_transparency: true,
            ..self.clone()
        }
    }

    /// Rotation reduced to `[0, 360)` for rendering. The stored value is
    /// deliberately left accumulating.
    pub fn display_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_layer() -> Layer {
        Layer::new("https://images.example/pin-42.jpg")
    }

    #[test]
    fn new_layer_has_documented_defaults() {
        let layer = make_layer();
        assert_eq!(layer.x, 0.0);
        assert_eq!(layer.y, 0.0);
        assert_eq!(layer.width, 100.0);
        assert_eq!(layer.height, 100.0);
        assert_eq!(layer.rotation, 0.0);
        assert!(!layer.flipped);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.z_index, 0);
        assert!(!layer.has_transparency);
    }

    #[test]
    fn with_position_replaces_only_position() {
        let moved = make_layer().with_position(50.0, 75.0);
        assert_eq!(moved.x, 50.0);
        assert_eq!(moved.y, 75.0);
        assert_eq!(moved.width, 100.0);
        assert_eq!(moved.image_url, "https://images.example/pin-42.jpg");
    }

    #[test]
    fn rotation_accumulates_past_360() {
        let mut layer = make_layer();
        for _ in 0..4 {
            layer = layer.rotated();
        }
        assert_eq!(layer.rotation, 360.0);
        assert_eq!(layer.display_rotation(), 0.0);
    }

    #[test]
    fn three_rotations_store_270() {
        let layer = make_layer().rotated().rotated().rotated();
        assert_eq!(layer.rotation, 270.0);
        assert_eq!(layer.display_rotation(), 270.0);
    }

    #[test]
    fn mirrored_toggles_and_toggles_back() {
        let layer = make_layer();
        assert!(layer.mirrored().flipped);
        assert!(!layer.mirrored().mirrored().flipped);
    }

    #[test]
    fn with_processed_image_marks_transparency() {
        let processed = make_layer().with_processed_image("file:///store/processed-images/a.png");
        assert_eq!(processed.image_url, "file:///store/processed-images/a.png");
        assert!(processed.has_transparency);
        // Placement survives the swap.
        assert_eq!(processed.width, 100.0);
    }

    #[test]
    fn transforms_do_not_mutate_the_original() {
        let layer = make_layer();
        let _ = layer.with_position(10.0, 10.0);
        let _ = layer.rotated();
        let _ = layer.with_opacity(0.3);
        assert_eq!(layer, make_layer());
    }

    // ── Serde shape ───────────────────────────────────────────────────────

    #[test]
    fn layer_serde_round_trip() {
        let original = make_layer()
            .with_position(12.0, 34.0)
            .with_size(150.0, 220.0)
            .rotated()
            .with_opacity(0.7);
        let json = serde_json::to_string(&original).expect("serialize Layer");
        let recovered: Layer = serde_json::from_str(&json).expect("deserialize Layer");
        assert_eq!(original, recovered);
    }

    #[test]
    fn layer_fields_are_camel_case() {
        let value = serde_json::to_value(make_layer()).expect("to_value");
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("image_url").is_none());
        assert!(value.get("zIndex").is_some());
        assert!(value.get("hasTransparency").is_some());
    }

    #[test]
    fn missing_fields_fill_with_defaults_on_deserialize() {
        // Legacy stored layers may carry only the URL.
        let layer: Layer =
            serde_json::from_str(r#"{ "imageUrl": "a.png" }"#).expect("deserialize sparse layer");
        assert_eq!(layer, Layer::new("a.png"));
    }

    #[test]
    fn default_filling_is_idempotent() {
        let sparse = r#"{ "imageUrl": "a.png", "x": 5.0 }"#;
        let once: Layer = serde_json::from_str(sparse).expect("first pass");
        let json = serde_json::to_string(&once).expect("re-serialize");
        let twice: Layer = serde_json::from_str(&json).expect("second pass");
        assert_eq!(once, twice);
    }

    #[test]
    fn stored_rotation_above_360_survives_round_trip() {
        let json = r#"{ "imageUrl": "a.png", "rotation": 450.0 }"#;
        let layer: Layer = serde_json::from_str(json).expect("deserialize");
        assert_eq!(layer.rotation, 450.0);
        assert_eq!(layer.display_rotation(), 90.0);
        let value = serde_json::to_value(&layer).expect("serialize");
        assert_eq!(value["rotation"], 450.0);
    }
}
