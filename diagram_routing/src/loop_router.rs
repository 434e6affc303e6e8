// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Side};

use crate::Hints;

/// Routes a self-edge (source and target are the same vertex) using the
/// loop strategy (§4.3.2).
///
/// Unlike the other four routers this one only needs a single vertex — a
/// self-edge's source and target `Endpoint`s are identical — so it takes
/// the vertex directly plus the exit `direction` (§6.1 `direction` style
/// key) rather than a `(source, target)` pair.
///
/// Produces two waypoints on the requested side: the vertex's own edge on
/// that side, and a point `segment` further out, both held at the vertex's
/// center on the perpendicular axis (§8.2 scenario 2). A user-placed first
/// hint that lies outside the vertex bounds overrides the perpendicular
/// coordinate and becomes the far point, letting the caller drag the loop's
/// apex away from dead center while keeping the near point on the vertex's
/// own edge at the same perpendicular offset.
#[must_use]
pub fn loop_route(bounds: diagram_geom::Rect, direction: Side, segment: f64, hints: &Hints) -> Vec<Point> {
    let center = Point::new(bounds.x0 + bounds.width() / 2.0, bounds.y0 + bounds.height() / 2.0);
    let hint = hints.first().copied().filter(|p| !bounds.contains(*p));

    let (near, far) = match direction {
        Side::NORTH => {
            let perp = hint.map_or(center.x, |h| h.x);
            (Point::new(perp, bounds.y0), Point::new(perp, bounds.y0 - segment))
        }
        Side::EAST => {
            let perp = hint.map_or(center.y, |h| h.y);
            (Point::new(bounds.x1, perp), Point::new(bounds.x1 + segment, perp))
        }
        Side::SOUTH => {
            let perp = hint.map_or(center.x, |h| h.x);
            (Point::new(perp, bounds.y1), Point::new(perp, bounds.y1 + segment))
        }
        // West is the default for any other (including multi-bit or empty) mask.
        _ => {
            let perp = hint.map_or(center.y, |h| h.y);
            (Point::new(bounds.x0, perp), Point::new(bounds.x0 - segment, perp))
        }
    };

    alloc::vec![far, near]
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_geom::Rect;

    #[test]
    fn default_west_direction_matches_scenario_8_2_2() {
        let bounds = Rect::new(100.0, 100.0, 160.0, 140.0);
        let points = loop_route(bounds, Side::WEST, 20.0, &Vec::new());
        assert_eq!(points, alloc::vec![Point::new(80.0, 120.0), Point::new(100.0, 120.0)]);
    }

    #[test]
    fn east_direction_exits_opposite_side() {
        let bounds = Rect::new(0.0, 0.0, 60.0, 40.0);
        let points = loop_route(bounds, Side::EAST, 10.0, &Vec::new());
        assert_eq!(points, alloc::vec![Point::new(70.0, 20.0), Point::new(60.0, 20.0)]);
    }

    #[test]
    fn hint_outside_vertex_overrides_perpendicular_offset() {
        let bounds = Rect::new(100.0, 100.0, 160.0, 140.0);
        let hint = Point::new(100.0, 200.0);
        let points = loop_route(bounds, Side::WEST, 20.0, &alloc::vec![hint]);
        assert_eq!(points[1].y, 200.0);
        assert_eq!(points[0].y, 200.0);
    }

    #[test]
    fn hint_inside_vertex_is_ignored() {
        let bounds = Rect::new(100.0, 100.0, 160.0, 140.0);
        let hint = Point::new(120.0, 110.0);
        let points = loop_route(bounds, Side::WEST, 20.0, &alloc::vec![hint]);
        assert_eq!(points, alloc::vec![Point::new(80.0, 120.0), Point::new(100.0, 120.0)]);
    }
}
