// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect};

use crate::{Endpoint, Hints, Orientation};

/// Coincidence tolerance for hint snapping and trailing-point merging, in
/// scaled pixels (§9 OQ2, fixed in `SPEC_FULL.md`: the tolerance check runs
/// in scaled units, quantizing to tenths only afterward).
const TOLERANCE: f64 = 1.0;

/// Routes an edge through user-placed hints using the segment strategy
/// (§4.3.4): an orthogonal path that snaps each hint to a coincident
/// endpoint, alternates orientation at each hint starting from whichever
/// channel the first hint falls in, then trims points that land inside
/// either endpoint's terminal rectangle and merges a trailing point that's
/// within tolerance of the target.
///
/// `source` and `target` are already in scaled coordinates, matching every
/// router but [`orth_route`](crate::orth_route).
#[must_use]
pub fn segment_route(source: &Endpoint, target: &Endpoint, hints: &Hints) -> Vec<Point> {
    let source_anchor = source.anchor();
    let target_anchor = target.anchor();
    let source_bounds = source.effective_bounds();
    let target_bounds = target.effective_bounds();

    let snapped: Vec<Point> = hints
        .iter()
        .map(|&hint| snap(hint, source_anchor, target_anchor))
        .collect();

    let mut orientation = snapped.first().map_or(Orientation::Horizontal, |&first| {
        start_orientation(source_bounds, target_bounds, first)
    });

    let mut path = alloc::vec![source_anchor];
    let mut prev = source_anchor;
    for &hint in &snapped {
        let corner = corner_point(prev, hint, orientation);
        if corner != prev && corner != hint {
            path.push(corner);
        }
        path.push(hint);
        prev = hint;
        orientation = flip(orientation);
    }
    let corner = corner_point(prev, target_anchor, orientation);
    if corner != prev && corner != target_anchor {
        path.push(corner);
    }
    path.push(target_anchor);

    path.retain(|&p| {
        p == source_anchor || p == target_anchor || (!strictly_inside(p, source_bounds) && !strictly_inside(p, target_bounds))
    });
    path.dedup();

    if path.len() >= 2 {
        let last = path.len() - 1;
        if path[last - 1].distance(path[last]) < TOLERANCE {
            path.remove(last - 1);
        }
    }

    path.into_iter().map(quantize).collect()
}

fn snap(hint: Point, source_anchor: Point, target_anchor: Point) -> Point {
    if hint.distance(source_anchor) < TOLERANCE {
        source_anchor
    } else if hint.distance(target_anchor) < TOLERANCE {
        target_anchor
    } else {
        hint
    }
}

fn channel(bounds: Rect, point: Point) -> (bool, bool) {
    let horizontal = point.y >= bounds.y0 && point.y <= bounds.y1;
    let vertical = point.x >= bounds.x0 && point.x <= bounds.x1;
    (horizontal, vertical)
}

/// Picks the starting orientation from the first hint's channel against
/// `source`, deferring a tie (or a miss on both channels) to `target`, and
/// falling through to horizontal if `target` is equally undecided.
fn start_orientation(source_bounds: Rect, target_bounds: Rect, first_hint: Point) -> Orientation {
    let (h, v) = channel(source_bounds, first_hint);
    if h && !v {
        return Orientation::Horizontal;
    }
    if v && !h {
        return Orientation::Vertical;
    }
    let (h, v) = channel(target_bounds, first_hint);
    if h && !v {
        Orientation::Horizontal
    } else if v && !h {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

fn flip(orientation: Orientation) -> Orientation {
    match orientation {
        Orientation::Horizontal => Orientation::Vertical,
        Orientation::Vertical => Orientation::Horizontal,
    }
}

fn corner_point(from: Point, to: Point, orientation: Orientation) -> Point {
    match orientation {
        Orientation::Horizontal => Point::new(to.x, from.y),
        Orientation::Vertical => Point::new(from.x, to.y),
    }
}

fn strictly_inside(p: Point, bounds: Rect) -> bool {
    p.x > bounds.x0 && p.x < bounds.x1 && p.y > bounds.y0 && p.y < bounds.y1
}

fn quantize(p: Point) -> Point {
    Point::new((p.x * 10.0).round() / 10.0, (p.y * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hint_produces_orthogonal_detour() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 200.0, 240.0, 240.0));
        let hints = alloc::vec![Point::new(20.0, 120.0)];
        let points = segment_route(&source, &target, &hints);
        assert_eq!(points.first(), Some(&source.anchor()));
        assert_eq!(points.last(), Some(&target.anchor()));
        assert!(points.contains(&Point::new(20.0, 120.0)));
    }

    #[test]
    fn hint_within_tolerance_of_source_snaps_to_it() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 0.0, 240.0, 40.0));
        let hints = alloc::vec![Point::new(source.anchor().x + 0.2, source.anchor().y)];
        let points = segment_route(&source, &target, &hints);
        // The snapped hint collapses into the source anchor itself, so no
        // stray near-duplicate point remains at the path's start.
        assert_eq!(points[0], source.anchor());
        assert_ne!(points.get(1), Some(&Point::new(source.anchor().x + 0.2, source.anchor().y)));
    }

    #[test]
    fn no_hints_produces_direct_orthogonal_corner() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 200.0, 240.0, 240.0));
        let points = segment_route(&source, &target, &Vec::new());
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn no_interior_waypoint_lands_inside_either_terminal() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 200.0, 240.0, 240.0));
        let hints = alloc::vec![Point::new(20.0, 20.0)];
        let points = segment_route(&source, &target, &hints);
        for &p in &points[1..points.len() - 1] {
            assert!(!strictly_inside(p, source.effective_bounds()));
            assert!(!strictly_inside(p, target.effective_bounds()));
        }
    }
}
