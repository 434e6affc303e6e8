// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Side};

use crate::{Endpoint, Hints};

/// Routes an edge using the entity-relation strategy (§4.3.1).
///
/// Chooses a horizontal exit side for each endpoint independently: for a
/// relative-geometry vertex, the side nearer `x = 0.5` of its parent; for a
/// fixed vertex, a side decided by its position relative to the other
/// endpoint's center; a `port_constraint` style override always wins. When
/// both endpoints choose the side facing *away* from the other ("opposite
/// sides"), the path needs two additional waypoints at the midpoint between
/// the routing-center heights to avoid cutting back through either vertex;
/// otherwise ("same side") the two exit points connect directly.
///
/// `segment` is the style's `segment` value already multiplied by the view
/// scale (§4.3.1 "Segment length is the style's 'segment' value × view
/// scale"); `hints` is accepted for signature uniformity with the other
/// routers but ignored, matching the source algorithm.
#[must_use]
pub fn entity_relation_route(
    source: &Endpoint,
    target: &Endpoint,
    segment: f64,
    _hints: &Hints,
) -> Vec<Point> {
    let source_left = exits_left(source, target);
    let target_left = exits_left(target, source);

    let source_bounds = source.effective_bounds();
    let target_bounds = target.effective_bounds();
    let source_y = routing_center_y(source);
    let target_y = routing_center_y(target);

    let source_x = if source_left {
        source_bounds.x0
    } else {
        source_bounds.x1
    };
    let target_x = if target_left {
        target_bounds.x0
    } else {
        target_bounds.x1
    };

    let dep = Point::new(source_x + side_offset(source_left, segment), source_y);
    let arr = Point::new(target_x + side_offset(target_left, segment), target_y);

    if source_left == target_left {
        alloc::vec![dep, arr]
    } else {
        let mid_y = source_y + (target_y - source_y) / 2.0;
        alloc::vec![dep, Point::new(dep.x, mid_y), Point::new(arr.x, mid_y), arr]
    }
}

/// `true` if `endpoint` should exit from its own west (left) side, given
/// the position of `other` (§4.3.1 rules (a)/(b)/(c), in that precedence
/// order).
fn exits_left(endpoint: &Endpoint, other: &Endpoint) -> bool {
    if let Some(constraint) = endpoint.port_constraint {
        if constraint.is_horizontal() && !constraint.is_vertical() {
            return constraint == Side::WEST;
        }
    }
    if let Some(fraction) = endpoint.relative_x {
        return fraction <= 0.5;
    }
    endpoint.anchor().x <= other.anchor().x
}

/// The offset applied past the chosen exit edge: away from the vertex
/// (negative x) when exiting west, away (positive x) when exiting east.
fn side_offset(exits_left: bool, segment: f64) -> f64 {
    if exits_left { -segment } else { segment }
}

fn routing_center_y(endpoint: &Endpoint) -> f64 {
    let bounds = endpoint.effective_bounds();
    bounds.y0 + bounds.height() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_geom::Rect;

    #[test]
    fn opposite_sides_four_point_path_matches_scenario_8_2_3() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 80.0, 40.0));
        let target = Endpoint::vertex(Rect::new(200.0, 0.0, 280.0, 40.0));
        let points = entity_relation_route(&source, &target, 40.0, &Vec::new());
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Point::new(-40.0, 20.0));
        assert_eq!(points[3], Point::new(320.0, 20.0));
        assert_eq!(points[1].y, 20.0);
        assert_eq!(points[2].y, 20.0);
    }

    #[test]
    fn same_side_produces_direct_two_point_path() {
        // Both vertices stacked with the same x range: both nearer their
        // own west side relative to the other's center at the same x.
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 80.0, 30.0));
        let target = Endpoint::vertex(Rect::new(0.0, 100.0, 80.0, 30.0));
        let points = entity_relation_route(&source, &target, 10.0, &Vec::new());
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn relative_vertex_uses_fraction_not_position() {
        let source = Endpoint::vertex(Rect::new(0.0, 0.0, 80.0, 30.0)).with_relative_x(0.9);
        let target = Endpoint::vertex(Rect::new(500.0, 0.0, 580.0, 30.0));
        // source's own fraction (0.9 > 0.5) forces an east exit even though
        // its absolute position is far to target's west.
        let points = entity_relation_route(&source, &target, 10.0, &Vec::new());
        assert_eq!(points[0].x, 90.0);
    }

    #[test]
    fn port_constraint_overrides_position_rule() {
        let source =
            Endpoint::vertex(Rect::new(0.0, 0.0, 80.0, 30.0)).with_port_constraint(Side::EAST);
        let target = Endpoint::vertex(Rect::new(500.0, 0.0, 580.0, 30.0));
        let points = entity_relation_route(&source, &target, 10.0, &Vec::new());
        assert_eq!(points[0].x, 90.0);
    }
}
