//! Ordered in-memory store of locally accepted shapes.
//!
//! The newest entry is the active selection and the only one any
//! downstream decision consults. Appending never fails; validation has
//! already happened by the time a shape reaches the store.

use satwatch_geometry::Shape;

/// Confirmed shapes in draw order.
#[derive(Debug, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Appends an accepted shape, making it the active selection.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// The active selection: the most recently drawn shape.
    #[must_use]
    pub fn current(&self) -> Option<&Shape> {
        self.shapes.last()
    }

    /// All shapes in draw order.
    #[must_use]
    pub fn all(&self) -> &[Shape] {
        &self.shapes
    }

    /// Whether no shape has been drawn yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use satwatch_geometry::{LatLng, validate};

    use super::*;

    fn shape(offset: f64) -> Shape {
        validate(
            &[
                LatLng::new(offset, 0.0),
                LatLng::new(offset, 0.01),
                LatLng::new(offset + 0.01, 0.01),
            ],
            14,
        )
        .unwrap()
    }

    #[test]
    fn empty_store_has_no_current() {
        let store = ShapeStore::new();
        assert!(store.is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn newest_shape_is_current() {
        let mut store = ShapeStore::new();
        let first = shape(0.0);
        let second = shape(1.0);
        store.append(first.clone());
        store.append(second.clone());

        assert_eq!(store.current(), Some(&second));
        assert_eq!(store.all(), &[first, second]);
    }
}
