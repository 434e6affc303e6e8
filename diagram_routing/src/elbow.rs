// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::Point;

use crate::{Endpoint, Hints, Orientation};

/// Routes an edge using the elbow (single right-angle bend) strategy
/// (§4.3.3).
///
/// The bend's orientation comes from, in precedence order: (a) `override_orientation`
/// (the style's `elbow` key), (b) whether the two endpoints' bounds overlap
/// horizontally or vertically — an overlap on one axis forces the bend onto
/// the other axis so the path doesn't cut back through either vertex — or
/// (c), with no overlap on either axis, the position of the first hint
/// relative to the union of both bounds.
#[must_use]
pub fn elbow_route(
    source: &Endpoint,
    target: &Endpoint,
    override_orientation: Option<Orientation>,
    hints: &Hints,
) -> Vec<Point> {
    let source_bounds = source.effective_bounds();
    let target_bounds = target.effective_bounds();
    let orientation = override_orientation.unwrap_or_else(|| {
        resolve_orientation(source_bounds, target_bounds, hints.first().copied())
    });

    let from = source.anchor();
    let to = target.anchor();
    let bend = match orientation {
        Orientation::Horizontal => Point::new(to.x, from.y),
        Orientation::Vertical => Point::new(from.x, to.y),
    };

    if bend == from || bend == to {
        alloc::vec![from, to]
    } else {
        alloc::vec![from, bend, to]
    }
}

fn resolve_orientation(
    source_bounds: diagram_geom::Rect,
    target_bounds: diagram_geom::Rect,
    first_hint: Option<Point>,
) -> Orientation {
    let overlaps_horizontally =
        source_bounds.x0 < target_bounds.x1 && target_bounds.x0 < source_bounds.x1;
    let overlaps_vertically =
        source_bounds.y0 < target_bounds.y1 && target_bounds.y0 < source_bounds.y1;

    if overlaps_horizontally {
        return Orientation::Vertical;
    }
    if overlaps_vertically {
        return Orientation::Horizontal;
    }

    let Some(hint) = first_hint else {
        return Orientation::Horizontal;
    };
    let union = source_bounds.union(target_bounds);
    if hint.x > union.x0 && hint.x < union.x1 {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_geom::Rect;

    #[test]
    fn side_by_side_vertices_bend_horizontal_first() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 0.0, 240.0, 40.0));
        let points = elbow_route(&source, &target, None, &Vec::new());
        assert_eq!(points.len(), 2, "level centers collapse the bend");
    }

    #[test]
    fn stacked_vertices_overlap_horizontally_and_bend_vertical() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(0.0, 200.0, 40.0, 240.0));
        let points = elbow_route(&source, &target, None, &Vec::new());
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn diagonal_vertices_produce_a_single_bend() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 200.0, 240.0, 240.0));
        let points = elbow_route(&source, &target, None, &Vec::new());
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point::new(points[2].x, points[0].y));
    }

    #[test]
    fn override_orientation_wins_even_when_overlapping() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 40.0, 40.0));
        let target = Endpoint::vertex(Rect::new(0.0, 200.0, 40.0, 240.0));
        let points = elbow_route(&source, &target, Some(Orientation::Horizontal), &Vec::new());
        assert_eq!(points[1], Point::new(points[2].x, points[0].y));
    }
}
