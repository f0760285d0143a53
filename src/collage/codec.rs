//! Conversion between stored document shapes and the in-memory composition.
//!
//! The two stored shapes are deliberately **not** unified: existing draft and
//! published records must keep reading and writing exactly as they are. Both
//! load paths converge on [`Composition`]; the two serializers diverge again
//! on save. Default-filling for absent fields happens at deserialization (see
//! [`super::types`]), so everything leaving this module is fully normalized.

use crate::collage::types::{
    DraftDoc, LayoutDoc, PublishedCollageDoc, PublishedLayerDoc,
};
use crate::editor::Composition;
use crate::models::Layer;
use crate::state::UserIdentity;

/// Canvas width the frontend authors layouts against.
pub const CONTAINER_WIDTH: u32 = 1000;
/// Canvas height the frontend authors layouts against.
pub const CONTAINER_HEIGHT: u32 = 800;

/// Hydrate a composition from a draft. Draft layers are already flat, so
/// this is a direct mapping.
pub fn load_from_draft(doc: &DraftDoc) -> Composition {
    Composition::new(doc.collage.clone())
}

/// Hydrate a composition from a published collage, flattening each entry's
/// `layout` block into the canonical layer attributes.
pub fn load_from_published(doc: &PublishedCollageDoc) -> Composition {
    let layers = doc
        .collage
        .iter()
        .map(|entry| Layer {
            image_url: entry.image_url.clone(),
            x: entry.layout.x,
            y: entry.layout.y,
            width: entry.layout.width,
            height: entry.layout.height,
            rotation: entry.layout.rotation,
            z_index: entry.layout.z_index,
            opacity: entry.opacity,
            flipped: entry.flipped,
            has_transparency: entry.has_transparency,
        })
        .collect();
    Composition::new(layers)
}

/// Serialize a composition as a draft document with flat layer attributes.
pub fn to_draft_doc(
    name: &str,
    composition: &Composition,
    created_at: String,
    updated_at: String,
) -> DraftDoc {
    DraftDoc {
        name: name.to_string(),
        collage: composition.layers().to_vec(),
        created_at,
        updated_at,
    }
}

/// Serialize a composition as a published collage: geometry nested under
/// `layout`, ownership stamped from the identity passed by the caller, and
/// the social counters initialized. The identity is an explicit parameter —
/// this function never consults ambient authentication state.
pub fn to_published_doc(
    name: &str,
    composition: &Composition,
    identity: &UserIdentity,
    container: (u32, u32),
    created_at: String,
    updated_at: String,
) -> PublishedCollageDoc {
    let collage = composition
        .layers()
        .iter()
        .map(|layer| PublishedLayerDoc {
            image_url: layer.image_url.clone(),
            layout: LayoutDoc {
                x: layer.x,
                y: layer.y,
                width: layer.width,
                height: layer.height,
                rotation: layer.rotation,
                z_index: layer.z_index,
            },
            opacity: layer.opacity,
            flipped: layer.flipped,
            has_transparency: layer.has_transparency,
        })
        .collect();

    PublishedCollageDoc {
        name: name.to_string(),
        collage,
        container_width: container.0,
        container_height: container.1,
        posted_by: identity.uid.clone(),
        posted_by_username: identity.username.clone(),
        likes: 0,
        comments: vec![],
        views: 0,
        shares: 0,
        created_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            uid: "user-123".to_string(),
            username: "mona".to_string(),
        }
    }

    fn sample_composition() -> Composition {
        Composition::new(vec![
            Layer {
                x: 50.0,
                y: 75.0,
                width: 180.0,
                height: 140.0,
                rotation: 450.0,
                z_index: 2,
                opacity: 0.6,
                flipped: true,
                ..Layer::new("a.png")
            },
            Layer::new("b.png"),
        ])
    }

    #[test]
    fn draft_round_trip_preserves_every_layer_attribute() {
        let composition = sample_composition();
        let doc = to_draft_doc(
            "Summer",
            &composition,
            "2026-03-01T09:00:00Z".to_string(),
            "2026-03-02T10:30:00Z".to_string(),
        );
        assert_eq!(load_from_draft(&doc), composition);
    }

    #[test]
    fn published_round_trip_preserves_every_layer_attribute() {
        let composition = sample_composition();
        let doc = to_published_doc(
            "Summer",
            &composition,
            &identity(),
            (CONTAINER_WIDTH, CONTAINER_HEIGHT),
            String::new(),
            String::new(),
        );
        assert_eq!(load_from_published(&doc), composition);
    }

    #[test]
    fn published_doc_encode_decode_is_identity_on_the_wire() {
        let doc = to_published_doc(
            "Summer",
            &sample_composition(),
            &identity(),
            (CONTAINER_WIDTH, CONTAINER_HEIGHT),
            "2026-03-01T09:00:00Z".to_string(),
            "2026-03-01T09:00:00Z".to_string(),
        );
        let json = serde_json::to_string(&doc).expect("serialize");
        let recovered: PublishedCollageDoc = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(doc, recovered);
    }

    #[test]
    fn to_published_doc_stamps_ownership_and_social_defaults() {
        let doc = to_published_doc(
            "Summer",
            &sample_composition(),
            &identity(),
            (CONTAINER_WIDTH, CONTAINER_HEIGHT),
            String::new(),
            String::new(),
        );
        assert_eq!(doc.posted_by, "user-123");
        assert_eq!(doc.posted_by_username, "mona");
        assert_eq!(doc.likes, 0);
        assert_eq!(doc.views, 0);
        assert_eq!(doc.shares, 0);
        assert!(doc.comments.is_empty());
        assert_eq!(doc.container_width, 1000);
        assert_eq!(doc.container_height, 800);
    }

    #[test]
    fn published_entry_missing_layout_loads_at_defaults() {
        let raw = r#"{
            "name": "Legacy",
            "collage": [ { "imageUrl": "old.png" } ]
        }"#;
        let doc: PublishedCollageDoc = serde_json::from_str(raw).expect("deserialize");
        let composition = load_from_published(&doc);
        let layer = &composition.layers()[0];
        assert_eq!(layer.x, 0.0);
        assert_eq!(layer.y, 0.0);
        assert_eq!(layer.width, 100.0);
        assert_eq!(layer.height, 100.0);
        assert_eq!(layer.rotation, 0.0);
        assert_eq!(layer.z_index, 0);
        assert_eq!(layer.opacity, 1.0);
        assert!(!layer.flipped);
    }

    #[test]
    fn legacy_draft_with_sparse_layers_loads_normalized() {
        let raw = r#"{
            "name": "Old draft",
            "collage": [ { "imageUrl": "a.png", "x": 30.0 } ]
        }"#;
        let doc: DraftDoc = serde_json::from_str(raw).expect("deserialize");
        let composition = load_from_draft(&doc);
        let layer = &composition.layers()[0];
        assert_eq!(layer.x, 30.0);
        assert_eq!(layer.width, 100.0);
        assert_eq!(layer.opacity, 1.0);
    }
}
