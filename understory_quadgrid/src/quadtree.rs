// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity-bounded quadtree over a fixed boundary.
//!
//! Each node stores up to `capacity` items directly. The first insert past
//! capacity splits the node into four equal quadrants, and that and every
//! later overflow item is handed to the first quadrant (top-left, top-right,
//! bottom-left, bottom-right) it overlaps.
//!
//! Placement uses the strict overlap test, not containment. An item that
//! straddles a split line lives in exactly one quadrant, the first one it
//! touches, and is never copied into the others. A query whose range misses
//! that quadrant's boundary will not report the item even when the range
//! overlaps the item itself; this is a known recall gap of the structure.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;
use tracing::trace;

use crate::paint::{Layer, Painter};
use crate::types::{Item, Rect};

/// Default number of items a node holds before it splits.
pub const DEFAULT_CAPACITY: usize = 4;

/// A recursively subdividing quadtree node.
///
/// The root of a tree is an ordinary node; children are owned exclusively by
/// their parent, created once on split and never resized or dropped
/// individually.
pub struct Quadtree<T> {
    boundary: Rect,
    capacity: usize,
    items: SmallVec<[Item<T>; DEFAULT_CAPACITY]>,
    // Top-left, top-right, bottom-left, bottom-right. `None` until split.
    children: Option<Box<[Self; 4]>>,
}

impl<T> Debug for Quadtree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Quadtree")
            .field("boundary", &self.boundary)
            .field("capacity", &self.capacity)
            .field("items", &self.items.len())
            .field("divided", &self.is_divided())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> Quadtree<T> {
    /// Create an empty leaf covering `boundary`.
    ///
    /// `capacity` must be positive; a zero capacity is treated as 1.
    pub fn new(boundary: Rect, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "quadtree capacity must be positive");
        Self {
            boundary,
            capacity: capacity.max(1),
            items: SmallVec::new(),
            children: None,
        }
    }

    /// Create an empty leaf covering `boundary` with [`DEFAULT_CAPACITY`].
    pub fn with_boundary(boundary: Rect) -> Self {
        Self::new(boundary, DEFAULT_CAPACITY)
    }

    /// The rectangle this node is responsible for.
    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Maximum number of items held directly before splitting.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items held directly by this node, in insertion order.
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Whether this node has split into quadrants.
    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// The four quadrants (top-left, top-right, bottom-left, bottom-right), once split.
    pub fn children(&self) -> Option<&[Self; 4]> {
        self.children.as_deref()
    }

    /// Number of items stored in this subtree.
    pub fn len(&self) -> usize {
        self.items.len()
            + self
                .children
                .as_deref()
                .map_or(0, |c| c.iter().map(Self::len).sum::<usize>())
    }

    /// Whether this subtree stores no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |c| c.iter().map(Self::depth).max().unwrap_or(0))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |c| c.iter().map(Self::node_count).sum::<usize>())
    }

    /// Insert `item`, returning whether some node in this subtree accepted it.
    ///
    /// Returns `false` only if `item.bounds` does not overlap this node's
    /// boundary. See [`Quadtree::try_insert`] to get a rejected item back.
    pub fn insert(&mut self, item: Item<T>) -> bool {
        self.try_insert(item).is_ok()
    }

    /// Insert `item`, handing it back if no node in this subtree accepts it.
    pub fn try_insert(&mut self, item: Item<T>) -> Result<(), Item<T>> {
        if !self.boundary.intersects(&item.bounds) {
            return Err(item);
        }

        if self.items.len() < self.capacity {
            self.items.push(item);
            return Ok(());
        }

        let (boundary, capacity) = (self.boundary, self.capacity);
        let children = self
            .children
            .get_or_insert_with(|| Self::split(boundary, capacity));

        let mut item = item;
        for child in children.iter_mut() {
            match child.try_insert(item) {
                Ok(()) => return Ok(()),
                Err(rejected) => item = rejected,
            }
        }
        Err(item)
    }

    fn split(boundary: Rect, capacity: usize) -> Box<[Self; 4]> {
        trace!(?boundary, capacity, "splitting quadtree node");
        Box::new(boundary.quadrants().map(|q| Self::new(q, capacity)))
    }

    /// Collect items whose bounds overlap `range`.
    ///
    /// Returns `None` when `range` misses this node's boundary entirely, so
    /// callers can tell a pruned subtree from one that was searched and came
    /// up empty. Results are ordered node-first, then quadrants in
    /// top-left, top-right, bottom-left, bottom-right order.
    pub fn query(&self, range: &Rect) -> Option<Vec<&Item<T>>> {
        if !self.boundary.intersects(range) {
            return None;
        }
        let mut found = Vec::new();
        self.visit_rect(range, |item| found.push(item));
        Some(found)
    }

    /// Visit items whose bounds overlap `range` (does not allocate result storage).
    ///
    /// Visits in the same order as [`Quadtree::query`] returns.
    pub fn visit_rect<'a, F: FnMut(&'a Item<T>)>(&'a self, range: &Rect, mut f: F) {
        self.visit_rect_inner(range, &mut f);
    }

    fn visit_rect_inner<'a, F: FnMut(&'a Item<T>)>(&'a self, range: &Rect, f: &mut F) {
        if !self.boundary.intersects(range) {
            return;
        }
        for item in &self.items {
            if item.bounds.intersects(range) {
                f(item);
            }
        }
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.visit_rect_inner(range, f);
            }
        }
    }

    /// Describe this subtree to `painter`.
    ///
    /// Strokes the node boundary ([`Layer::Node`]), fills each directly held
    /// item ([`Layer::Item`]), then recurses into the quadrants.
    pub fn paint<P: Painter + ?Sized>(&self, painter: &mut P) {
        painter.stroke_rect(&self.boundary, Layer::Node);
        for item in &self.items {
            painter.fill_rect(&item.bounds, Layer::Item);
        }
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.paint(painter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn boxed(x: f64, y: f64, size: f64, data: u32) -> Item<u32> {
        Item::new(Rect::new(x, y, size, size), data)
    }

    fn data_of(items: &[&Item<u32>]) -> Vec<u32> {
        items.iter().map(|i| i.data).collect()
    }

    #[test]
    fn contained_item_is_found_by_its_own_bounds() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        let item = boxed(20.0, 30.0, 5.0, 7);
        assert!(qt.insert(item));

        let hits = qt.query(&item.bounds).expect("range overlaps the boundary");
        assert_eq!(data_of(&hits), vec![7]);
    }

    #[test]
    fn rejects_items_outside_boundary() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!qt.insert(boxed(150.0, 150.0, 5.0, 1)));
        // Touching the right edge is not overlapping it.
        assert!(!qt.insert(boxed(100.0, 50.0, 5.0, 2)));
        let rejected = qt
            .try_insert(boxed(-10.0, 0.0, 10.0, 3))
            .expect_err("touches the left edge only");
        assert_eq!(rejected.data, 3);
        assert!(qt.is_empty());
    }

    #[test]
    fn splits_once_past_capacity() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        let corners = [(10.0, 10.0), (60.0, 10.0), (10.0, 60.0), (60.0, 60.0)];
        for (i, (x, y)) in (0_u32..).zip(corners) {
            assert!(qt.insert(boxed(x, y, 5.0, i)));
        }
        assert!(!qt.is_divided(), "exactly at capacity does not split");

        assert!(qt.insert(boxed(70.0, 70.0, 5.0, 4)));
        assert!(qt.is_divided());
        assert_eq!(qt.items().len(), 4);
        assert_eq!(qt.node_count(), 5, "one split creates four children");
        assert_eq!(qt.depth(), 2);

        let children = qt.children().expect("divided");
        let counts: Vec<usize> = children.iter().map(|c| c.items().len()).collect();
        assert_eq!(counts, vec![0, 0, 0, 1], "overflow lands bottom-right");
        assert_eq!(children[3].items()[0].data, 4);
        assert_eq!(children[3].boundary(), Rect::new(50.0, 50.0, 50.0, 50.0));
        assert!(children.iter().all(|c| c.capacity() == 4));

        // Further overflow reuses the existing children.
        assert!(qt.insert(boxed(20.0, 20.0, 5.0, 5)));
        assert_eq!(qt.node_count(), 5);
        assert_eq!(qt.children().expect("divided")[0].items()[0].data, 5);
    }

    #[test]
    fn straddling_item_goes_to_first_overlapping_quadrant_only() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        for i in 0..4 {
            qt.insert(boxed(1.0, 1.0, 1.0, i));
        }
        // Overlaps all four quadrants around the center.
        assert!(qt.insert(boxed(45.0, 45.0, 10.0, 99)));

        let children = qt.children().expect("divided");
        assert_eq!(children[0].len(), 1);
        assert_eq!(children[1].len(), 0);
        assert_eq!(children[2].len(), 0);
        assert_eq!(children[3].len(), 0);
        assert_eq!(qt.len(), 5);
    }

    #[test]
    fn straddling_item_is_missed_outside_its_quadrant() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        for i in 0..4 {
            qt.insert(boxed(1.0, 1.0, 1.0, i));
        }
        qt.insert(boxed(45.0, 45.0, 10.0, 99));

        // Overlaps the top-left part of the item: found.
        let hits = qt.query(&Rect::new(46.0, 46.0, 1.0, 1.0)).expect("inside");
        assert_eq!(data_of(&hits), vec![99]);

        // Overlaps the bottom-right part of the item only: the top-left
        // quadrant that stores it is pruned.
        let hits = qt.query(&Rect::new(52.0, 52.0, 1.0, 1.0)).expect("inside");
        assert!(hits.is_empty());
    }

    #[test]
    fn identical_items_overflow_into_one_child() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        for i in 0..9 {
            assert!(qt.insert(boxed(10.0, 10.0, 1.0, i)));
        }
        // Four on the root, four on the top-left child, one more level down.
        assert_eq!(qt.items().len(), 4);
        assert_eq!(qt.children().expect("divided")[0].items().len(), 4);
        assert_eq!(qt.depth(), 3);

        let hits = qt.query(&Rect::new(0.0, 0.0, 100.0, 100.0)).expect("inside");
        assert_eq!(data_of(&hits), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn query_prunes_disjoint_ranges() {
        let mut qt = Quadtree::with_boundary(Rect::new(0.0, 0.0, 100.0, 100.0));
        qt.insert(boxed(10.0, 10.0, 5.0, 1));
        assert!(qt.query(&Rect::new(200.0, 200.0, 10.0, 10.0)).is_none());
        assert!(qt.query(&Rect::new(100.0, 0.0, 10.0, 10.0)).is_none());

        let searched = qt.query(&Rect::new(50.0, 50.0, 10.0, 10.0));
        assert_eq!(searched.map(|v| v.len()), Some(0));
    }

    #[test]
    fn visit_and_query_agree() {
        let mut qt = Quadtree::new(Rect::new(0.0, 0.0, 64.0, 64.0), 2);
        for i in 0..20_u32 {
            let v = f64::from(i) * 3.0;
            qt.insert(boxed(v, 63.0 - v, 2.0, i));
        }
        let range = Rect::new(10.0, 10.0, 40.0, 40.0);
        let queried = data_of(&qt.query(&range).expect("inside"));
        let mut visited = Vec::new();
        qt.visit_rect(&range, |item| visited.push(item.data));
        assert_eq!(queried, visited);
        assert!(!visited.is_empty());
    }

    #[test]
    fn whole_boundary_query_reports_each_item_once() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let boundary = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let mut qt = Quadtree::with_boundary(boundary);
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut accepted = 0;
        for i in 0..2000_u32 {
            let bounds = Rect::new(
                rng.random_range(-50.0..1000.0),
                rng.random_range(-50.0..1000.0),
                rng.random_range(0.5..40.0),
                rng.random_range(0.5..40.0),
            );
            if qt.insert(Item::new(bounds, i)) {
                accepted += 1;
            }
        }
        assert_eq!(qt.len(), accepted);

        let mut hits = data_of(&qt.query(&boundary).expect("inside"));
        assert_eq!(hits.len(), accepted);
        hits.sort_unstable();
        hits.dedup();
        assert_eq!(hits.len(), accepted, "no item is stored twice");
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Painter for Recorder {
        fn stroke_rect(&mut self, rect: &Rect, layer: Layer) {
            self.0.push(alloc::format!("stroke {layer:?} {} {}", rect.x, rect.y));
        }

        fn fill_rect(&mut self, rect: &Rect, layer: Layer) {
            self.0.push(alloc::format!("fill {layer:?} {} {}", rect.x, rect.y));
        }

        fn label(&mut self, text: &str, _x: f64, _y: f64, layer: Layer) {
            self.0.push(alloc::format!("label {layer:?} {text}"));
        }
    }

    #[test]
    fn paint_walks_node_then_items_then_quadrants() {
        let mut qt = Quadtree::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        qt.insert(boxed(1.0, 1.0, 1.0, 0));
        qt.insert(boxed(6.0, 6.0, 1.0, 1));

        let mut rec = Recorder::default();
        qt.paint(&mut rec);
        assert_eq!(
            rec.0,
            vec![
                "stroke Node 0 0",
                "fill Item 1 1",
                "stroke Node 0 0",
                "stroke Node 5 0",
                "stroke Node 0 5",
                "stroke Node 5 5",
                "fill Item 6 6",
            ]
        );
    }
}
