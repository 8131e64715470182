// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadgrid --heading-base-level=0

//! Understory Quadgrid: a spatial hash grid of quadtrees for 2D rectangles.
//!
//! Understory Quadgrid answers "which items overlap this region?" for
//! axis-aligned rectangles carrying a user payload.
//!
//! - A uniform grid hashes each item's origin to a cell.
//! - Every occupied cell owns its own [`Quadtree`] that splits into quadrants
//!   once a node holds more than its capacity.
//! - Items are inserted once and never updated or removed.
//!
//! Geometry is plain `f64` origin + size ([`Rect`]) and the crate does not
//! depend on a geometry library. Enable the `kurbo` feature for conversions to
//! and from `kurbo::Rect`.
//!
//! # Example
//!
//! ```rust
//! use understory_quadgrid::{CellKey, Rect, SpatialHashGrid};
//!
//! let mut grid = SpatialHashGrid::new(100.0);
//! for i in 0..5 {
//!     grid.insert(Rect::new(10.0, 10.0, 1.0, 1.0), i);
//! }
//!
//! // All five share cell 0,0, whose quadtree split on the fifth insert.
//! let cell = grid.cell(CellKey::new(0, 0)).unwrap();
//! assert!(cell.is_divided());
//!
//! let hits = grid.query(&Rect::new(0.0, 0.0, 100.0, 100.0));
//! assert_eq!(hits.len(), 5);
//! ```
//!
//! A [`Quadtree`] can also be used on its own:
//!
//! ```rust
//! use understory_quadgrid::{Item, Quadtree, Rect};
//!
//! let mut qt = Quadtree::new(Rect::new(0.0, 0.0, 64.0, 64.0), 2);
//! assert!(qt.insert(Item::new(Rect::new(1.0, 1.0, 4.0, 4.0), "a")));
//! assert!(!qt.insert(Item::new(Rect::new(90.0, 1.0, 4.0, 4.0), "outside")));
//!
//! // `None` means the range missed the boundary and nothing was searched.
//! assert!(qt.query(&Rect::new(100.0, 100.0, 1.0, 1.0)).is_none());
//! assert_eq!(qt.query(&Rect::new(0.0, 0.0, 8.0, 8.0)).unwrap().len(), 1);
//! ```
//!
//! ## Hashing and queries
//!
//! [`SpatialHashGrid::hash`] rounds `origin / cell_size` to the nearest
//! integer with ties away from zero; it is not floor division. Cell keys are
//! therefore centered on multiples of the cell size, while a cell's quadtree
//! boundary starts at that multiple and spans one cell. Items are handed to
//! their cell's quadtree even if they do not fit it; the quadtree keeps any
//! item that overlaps its boundary and drops the rest.
//!
//! [`SpatialHashGrid::query`] moves the range origin to its cell corner the
//! same way and asks every occupied cell. The hash bounds the size of each
//! quadtree but does not prune cells at query time.
//!
//! ## Recall
//!
//! Placement and queries use a strict overlap test ([`intersects`]): touching
//! edges do not count. An item is stored exactly once, in the first quadrant
//! (top-left, top-right, bottom-left, bottom-right) it overlaps. A range that
//! overlaps the item but misses the cell or quadrant that stores it will not
//! report it. This is inherent to the structure and is not corrected.
//!
//! ## Visualization
//!
//! [`SpatialHashGrid::paint`] and [`Quadtree::paint`] describe cells, node
//! boundaries, and item rectangles to a [`Painter`] without touching state.
//!
//! ### Float semantics
//!
//! Inputs are not validated. NaN and infinite coordinates take part in the
//! overlap test with ordinary IEEE comparisons; NaN origins hash to cell `0,0`.
//! Query ranges are snapped only on finite axes, so a NaN query origin leaves
//! that axis unconstrained and the range reaches every cell along it.
//!
//! ## Logging
//!
//! Quadtree splits and cell creation are reported as `tracing` events at
//! `trace` level, and inserts that end up not stored at `debug` level. Nothing
//! is emitted unless the application installs a subscriber.

#![no_std]

extern crate alloc;

mod grid;
mod paint;
mod quadtree;
mod types;
pub(crate) mod util;

pub use grid::{CellKey, SpatialHashGrid};
pub use paint::{Layer, Painter};
pub use quadtree::{DEFAULT_CAPACITY, Quadtree};
pub use types::{Item, Rect, intersects};
