// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

/// Axis-aligned rectangle given by its origin and size.
///
/// The origin is the top-left corner in a y-down coordinate space. Width and
/// height are not validated: negative or non-finite values are stored as given
/// and take part in [`intersects`] with plain IEEE comparison semantics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline(always)]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether this rectangle overlaps `other`. See [`intersects`].
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        intersects(self, other)
    }

    /// Split into four equal quadrants anchored at the origin.
    ///
    /// Order is top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Self; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;
        [
            Self::new(self.x, self.y, w, h),
            Self::new(self.x + w, self.y, w, h),
            Self::new(self.x, self.y + h, w, h),
            Self::new(self.x + w, self.y + h, w, h),
        ]
    }
}

/// Strict axis-aligned overlap test.
///
/// Two rectangles overlap unless one's far edge is at or before the other's
/// near edge on either axis, so rectangles that only share an edge do not
/// overlap. The test is symmetric.
///
/// # Examples
///
/// ```
/// use understory_quadgrid::{Rect, intersects};
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(intersects(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
/// // Touching edges do not count.
/// assert!(!intersects(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
/// ```
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(a.x + a.width <= b.x
        || b.x + b.width <= a.x
        || a.y + a.height <= b.y
        || b.y + b.height <= a.y)
}

/// A rectangle paired with a user payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Item<T> {
    /// Geometry used for placement and queries.
    pub bounds: Rect,
    /// Opaque payload.
    pub data: T,
}

impl<T> Item<T> {
    /// Pair `bounds` with `data`.
    #[inline]
    pub const fn new(bounds: Rect, data: T) -> Self {
        Self { bounds, data }
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Rect {
    fn from(r: kurbo::Rect) -> Self {
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

/// The resulting `kurbo::Rect` is normalized, so negative sizes flip the origin.
#[cfg(feature = "kurbo")]
impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        Self::from_origin_size((r.x, r.y), (r.width, r.height))
    }
}
