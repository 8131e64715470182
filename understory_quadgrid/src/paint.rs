// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only visualization hook.
//!
//! [`Quadtree::paint`](crate::Quadtree::paint) and
//! [`SpatialHashGrid::paint`](crate::SpatialHashGrid::paint) walk the structure
//! and describe it to a [`Painter`]. The painter owns every stylistic decision
//! (colors, line widths, fonts, light or dark palette); the index only reports
//! which [`Layer`] each primitive belongs to.

use crate::types::Rect;

/// Which part of the structure a primitive describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// A grid cell outline and its `"col,row"` label.
    Cell,
    /// A quadtree node boundary.
    Node,
    /// A stored item's bounds.
    Item,
}

/// A drawing surface driven by the index's `paint` methods.
pub trait Painter {
    /// Outline `rect`.
    fn stroke_rect(&mut self, rect: &Rect, layer: Layer);

    /// Fill `rect`.
    fn fill_rect(&mut self, rect: &Rect, layer: Layer);

    /// Draw `text` anchored at the top-left point `(x, y)`.
    ///
    /// Where the baseline goes relative to the anchor is up to the painter.
    fn label(&mut self, text: &str, x: f64, y: f64, layer: Layer);
}
