// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial hash grid whose cells each own an independent quadtree.
//!
//! Inserts hash the item's origin to a cell and hand the item to that cell's
//! quadtree, creating the cell on first use. Hashing rounds to the nearest cell
//! index (ties away from zero), so cell keys are centered on multiples of the
//! cell size while each cell's quadtree boundary starts at that multiple. An
//! item whose origin rounds up to the next cell but does not reach that cell's
//! boundary is rejected by the cell's quadtree and not stored.
//!
//! Queries snap the range origin to a cell multiple the same way, keep the
//! range size, and then ask every occupied cell. The hash only partitions items
//! into independently sized quadtrees; it does not prune cells at query time.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::paint::{Layer, Painter};
use crate::quadtree::{DEFAULT_CAPACITY, Quadtree};
use crate::types::{Item, Rect};
use crate::util::sign_round;

/// Integer coordinates of a grid cell.
///
/// Displays as `"col,row"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    /// Column index along x.
    pub col: i64,
    /// Row index along y.
    pub row: i64,
}

impl CellKey {
    /// Create a key from column and row indices.
    #[inline]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// Uniform grid of lazily created quadtree cells.
pub struct SpatialHashGrid<T> {
    cell_size: f64,
    capacity: usize,
    cells: HashMap<CellKey, Quadtree<T>>,
}

impl<T> fmt::Debug for SpatialHashGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialHashGrid")
            .field("cell_size", &self.cell_size)
            .field("capacity", &self.capacity)
            .field("cells", &self.cells.len())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for SpatialHashGrid<T> {
    /// A grid with unit cells.
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<T> SpatialHashGrid<T> {
    /// Create an empty grid whose cell quadtrees use [`DEFAULT_CAPACITY`].
    pub fn new(cell_size: f64) -> Self {
        Self::with_capacity(cell_size, DEFAULT_CAPACITY)
    }

    /// Create an empty grid whose cell quadtrees hold `capacity` items per node.
    ///
    /// `capacity` must be positive; a zero capacity is treated as 1.
    pub fn with_capacity(cell_size: f64, capacity: usize) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
        debug_assert!(capacity > 0, "grid capacity must be positive");
        Self {
            cell_size,
            capacity: capacity.max(1),
            cells: HashMap::new(),
        }
    }

    /// Side length of every cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Per-node capacity of the cell quadtrees.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of stored items across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Quadtree::len).sum()
    }

    /// Whether no items are stored.
    ///
    /// A grid can have cells and still be empty when every insert into those
    /// cells was rejected.
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Quadtree::is_empty)
    }

    /// Drop every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Occupied cells and their quadtrees, in unspecified order.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &Quadtree<T>)> + '_ {
        self.cells.iter().map(|(k, qt)| (*k, qt))
    }

    /// The quadtree of an occupied cell.
    pub fn cell(&self, key: CellKey) -> Option<&Quadtree<T>> {
        self.cells.get(&key)
    }

    /// The cell a rectangle hashes to, from its origin alone.
    ///
    /// Each axis is `origin / cell_size` rounded to the nearest integer with
    /// ties away from zero, so with a cell size of 100 the origin `(250, -49)`
    /// hashes to `3,0` and `(-50, 149)` to `-1,1`.
    pub fn hash(&self, bounds: &Rect) -> CellKey {
        CellKey::new(
            sign_round(bounds.x / self.cell_size),
            sign_round(bounds.y / self.cell_size),
        )
    }

    /// The boundary a cell's quadtree covers: one cell-sized square whose
    /// top-left corner is `(col * cell_size, row * cell_size)`.
    pub fn cell_boundary(&self, key: CellKey) -> Rect {
        Rect::new(
            key.col as f64 * self.cell_size,
            key.row as f64 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// `range` with its origin moved to the corner of the cell it hashes to.
    ///
    /// Width and height are kept as given. A non-finite origin coordinate is
    /// not snapped, so a NaN origin stays NaN and the snapped range overlaps
    /// every cell on that axis.
    pub fn snap_range(&self, range: &Rect) -> Rect {
        Rect::new(
            self.snap_coord(range.x),
            self.snap_coord(range.y),
            range.width,
            range.height,
        )
    }

    fn snap_coord(&self, v: f64) -> f64 {
        let index = v / self.cell_size;
        if index.is_finite() {
            sign_round(index) as f64 * self.cell_size
        } else {
            index * self.cell_size
        }
    }

    /// Insert an item.
    ///
    /// The cell is created on first use and the item is handed to its quadtree
    /// whether or not it fits inside the cell. Items the quadtree rejects are
    /// dropped.
    pub fn insert(&mut self, bounds: Rect, data: T) {
        let key = self.hash(&bounds);
        let boundary = self.cell_boundary(key);
        let capacity = self.capacity;
        let root = self.cells.entry(key).or_insert_with(|| {
            trace!(cell = %key, ?boundary, "creating grid cell");
            Quadtree::new(boundary, capacity)
        });
        if let Err(rejected) = root.try_insert(Item::new(bounds, data)) {
            debug!(
                cell = %key,
                bounds = ?rejected.bounds,
                "item does not overlap its cell; not stored"
            );
        }
    }

    /// Collect items overlapping the snapped `range` from every cell.
    ///
    /// See [`SpatialHashGrid::snap_range`]. Cells are visited in unspecified
    /// order; within a cell results follow [`Quadtree::query`].
    pub fn query(&self, range: &Rect) -> Vec<&Item<T>> {
        let mut found = Vec::new();
        self.visit_rect(range, |item| found.push(item));
        found
    }

    /// Visit items overlapping the snapped `range` (does not allocate result storage).
    pub fn visit_rect<'a, F: FnMut(&'a Item<T>)>(&'a self, range: &Rect, mut f: F) {
        let snapped = self.snap_range(range);
        for root in self.cells.values() {
            root.visit_rect(&snapped, &mut f);
        }
    }

    /// Describe the grid to `painter`.
    ///
    /// Cells are painted in key order. For each cell this paints its quadtree,
    /// then labels the cell at its top-left corner and strokes its boundary
    /// with [`Layer::Cell`].
    pub fn paint<P: Painter + ?Sized>(&self, painter: &mut P) {
        let mut cells: Vec<_> = self.cells().collect();
        cells.sort_unstable_by_key(|(key, _)| *key);
        for (key, root) in cells {
            root.paint(painter);
            let boundary = self.cell_boundary(key);
            let label = alloc::format!("{key}");
            painter.label(&label, boundary.x, boundary.y, Layer::Cell);
            painter.stroke_rect(&boundary, Layer::Cell);
        }
    }
}
