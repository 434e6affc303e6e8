// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect};

use crate::Id;

/// Spatial index mapping arena [`Id`]s to their current bounds, used by the
/// cell marker (F) for pointer hit-testing and by rubberband selection (I)
/// for rectangle-intersection queries.
///
/// Grounded on the `Backend` trait abstraction of the teacher's spatial
/// indexing crate (insert/update/remove/clear plus point/rect visitors);
/// this implementation keeps the same surface with a linear-scan backing
/// store rather than a tree, which is adequate at diagram scale and keeps
/// the engine core free of a bulk-loading/rebalancing dependency.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    entries: Vec<(Id, Rect)>,
}

impl SpatialIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or updates the bounds tracked for `id`.
    pub fn set(&mut self, id: Id, bounds: Rect) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = bounds;
        } else {
            self.entries.push((id, bounds));
        }
    }

    /// Removes `id` from the index, if present.
    pub fn remove(&mut self, id: Id) {
        self.entries.retain(|(existing, _)| *existing != id);
    }

    /// Drops every tracked entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of tracked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every id whose bounds contain `point`, topmost (most
    /// recently inserted/updated) first — a reasonable default z-order
    /// proxy for a freshly built index; callers that need exact z-order
    /// should intersect this result with the model's child order.
    pub fn query_point(&self, point: Point) -> impl Iterator<Item = Id> + '_ {
        self.entries
            .iter()
            .rev()
            .filter(move |(_, bounds)| bounds.contains(point))
            .map(|(id, _)| *id)
    }

    /// Returns every id whose bounds intersect `rect`.
    pub fn query_rect(&self, rect: Rect) -> impl Iterator<Item = Id> + '_ {
        self.entries
            .iter()
            .filter(move |(_, bounds)| bounds.intersect(rect).area() > 0.0)
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_geom::Rect;

    fn ids(n: usize) -> Vec<Id> {
        let mut arena = crate::Arena::new();
        (0..n).map(|i| arena.insert(i)).collect()
    }

    #[test]
    fn query_point_finds_containing_entries() {
        let handles = ids(2);
        let mut index = SpatialIndex::new();
        index.set(handles[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        index.set(handles[1], Rect::new(5.0, 5.0, 15.0, 15.0));

        let hits: Vec<_> = index.query_point(Point::new(7.0, 7.0)).collect();
        assert_eq!(hits.len(), 2);

        let hits: Vec<_> = index.query_point(Point::new(1.0, 1.0)).collect();
        assert_eq!(hits, alloc::vec![handles[0]]);
    }

    #[test]
    fn query_rect_matches_scenario_8_2_5() {
        // A(0,0,10,10), B(50,0,10,10), C(0,50,10,10); rubberband (-5,-5)..(55,5).
        let handles = ids(3);
        let mut index = SpatialIndex::new();
        index.set(handles[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        index.set(handles[1], Rect::new(50.0, 0.0, 60.0, 10.0));
        index.set(handles[2], Rect::new(0.0, 50.0, 10.0, 60.0));

        let band = Rect::new(-5.0, -5.0, 55.0, 5.0);
        let mut hits: Vec<_> = index.query_rect(band).collect();
        hits.sort_by_key(Id::slot);
        let mut expected = alloc::vec![handles[0], handles[1]];
        expected.sort_by_key(Id::slot);
        assert_eq!(hits, expected);
    }

    #[test]
    fn remove_drops_entry_from_queries() {
        let handles = ids(1);
        let mut index = SpatialIndex::new();
        index.set(handles[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        index.remove(handles[0]);
        assert!(index.query_point(Point::new(5.0, 5.0)).next().is_none());
    }
}
