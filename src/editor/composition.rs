//! The ordered layer sequence forming one collage-in-progress.
//!
//! Order is meaningful: it is the stacking order, and duplicates of the same
//! image URL are permitted. Layers are addressed by index; removing a layer
//! shifts every later index down by one, and any operation subsequently
//! addressed to a shifted index targets whichever layer now lives there.
//!
//! Every mutation returns a **new** composition. The undo history retains the
//! previous snapshots, so an edit must never touch the sequence it was given.

use crate::error::AppError;
use crate::models::Layer;

/// An immutable snapshot of the collage canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    layers: Vec<Layer>,
}

impl Composition {
    /// A composition over an already-loaded layer list.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layer at `index`, or [`AppError::NotFound`] when out of range.
    pub fn layer(&self, index: usize) -> Result<&Layer, AppError> {
        self.layers
            .get(index)
            .ok_or_else(|| AppError::NotFound(format!("no layer at index {index}")))
    }

    /// New composition with `layer` appended at the end. New layers render on
    /// top by virtue of array order, not via `zIndex`.
    pub fn appended(&self, layer: Layer) -> Self {
        let mut layers = self.layers.clone();
        layers.push(layer);
        Self { layers }
    }

    /// New composition with `extra` appended in order, as a single step.
    pub fn extended(&self, extra: impl IntoIterator<Item = Layer>) -> Self {
        let mut layers = self.layers.clone();
        layers.extend(extra);
        Self { layers }
    }

    /// New composition with the layer at `index` removed. All later indices
    /// shift down by one; the caller is responsible for clearing a selection
    /// that may now reference a different layer.
    pub fn removed(&self, index: usize) -> Result<Self, AppError> {
        if index >= self.layers.len() {
            return Err(AppError::NotFound(format!("no layer at index {index}")));
        }
        let mut layers = self.layers.clone();
        layers.remove(index);
        Ok(Self { layers })
    }

    /// New composition where the layer at `index` is replaced by
    /// `update(old)`. All other layers are carried over unchanged.
    pub fn replaced(
        &self,
        index: usize,
        update: impl FnOnce(&Layer) -> Layer,
    ) -> Result<Self, AppError> {
        if index >= self.layers.len() {
            return Err(AppError::NotFound(format!("no layer at index {index}")));
        }
        let mut layers = self.layers.clone();
        layers[index] = update(&layers[index]);
        Ok(Self { layers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(url: &str) -> Layer {
        Layer::new(url)
    }

    fn abc() -> Composition {
        Composition::new(vec![layer("a.png"), layer("b.png"), layer("c.png")])
    }

    #[test]
    fn appended_places_layer_last() {
        let comp = Composition::default().appended(layer("a.png")).appended(layer("b.png"));
        assert_eq!(comp.len(), 2);
        assert_eq!(comp.layers()[1].image_url, "b.png");
    }

    #[test]
    fn duplicates_of_the_same_image_are_permitted() {
        let comp = Composition::default().appended(layer("a.png")).appended(layer("a.png"));
        assert_eq!(comp.len(), 2);
    }

    #[test]
    fn removed_shifts_later_indices_down() {
        let comp = abc().removed(1).expect("remove B");
        assert_eq!(comp.len(), 2);
        assert_eq!(comp.layers()[0].image_url, "a.png");
        // C moved from index 2 to index 1; addressing the shifted index
        // targets C, it is not rejected.
        assert_eq!(comp.layer(1).expect("layer 1").image_url, "c.png");
        assert!(comp.layer(2).is_err());
    }

    #[test]
    fn removed_out_of_range_is_not_found() {
        assert!(matches!(abc().removed(3), Err(AppError::NotFound(_))));
    }

    #[test]
    fn replaced_touches_only_the_addressed_layer() {
        let comp = abc();
        let next = comp
            .replaced(1, |l| l.with_position(40.0, 60.0))
            .expect("replace B");
        assert_eq!(next.layers()[1].x, 40.0);
        assert_eq!(next.layers()[0], comp.layers()[0]);
        assert_eq!(next.layers()[2], comp.layers()[2]);
    }

    #[test]
    fn replaced_out_of_range_is_not_found() {
        let result = abc().replaced(7, |l| l.clone());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn mutations_leave_the_source_composition_untouched() {
        let comp = abc();
        let _ = comp.appended(layer("d.png"));
        let _ = comp.removed(0).expect("remove");
        let _ = comp.replaced(0, |l| l.rotated()).expect("replace");
        assert_eq!(comp, abc());
    }

    #[test]
    fn extended_appends_all_in_order_as_one_step() {
        let comp = abc().extended(vec![layer("d.png"), layer("e.png")]);
        assert_eq!(comp.len(), 5);
        assert_eq!(comp.layers()[3].image_url, "d.png");
        assert_eq!(comp.layers()[4].image_url, "e.png");
    }
}
