// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect, rotated_rect_aabb};

/// One end of an edge being routed, in the router's working coordinate
/// space (scaled, except for [`orth_route`](crate::orth_route) — see its
/// module doc).
///
/// Both a connected vertex and a dangling (unconnected) edge end are
/// represented uniformly: `bounds` is the vertex's rectangle for a
/// connected endpoint, or a zero-size rectangle at the dangling point for
/// an unconnected one. `recorded_point`, when present, always wins as the
/// anchor (§9 OQ1) — this is how a router keeps treating a routed edge's
/// *previous* endpoint stable across small upstream geometry changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint {
    /// The terminal's rectangle (vertex bounds, or a degenerate point-rect
    /// for a dangling end).
    pub bounds: Rect,
    /// A previously recorded absolute terminal point, if any.
    pub recorded_point: Option<Point>,
    /// Rotation in degrees around `bounds`' center (§6.1 `rotation`).
    pub rotation: f64,
    /// Allowed exit sides (§6.1 `portConstraint`); `None` means all sides.
    pub port_constraint: Option<crate::Side>,
    /// `true` if this terminal is itself an edge cell (used by the
    /// orthogonal router's short-circuit, §4.3.5 step 1).
    pub is_edge: bool,
    /// For a vertex with relative geometry, its fractional x position in
    /// `[0, 1]` within its parent (§4.3.1 entity-relation side rule (a)).
    /// `None` for a non-relative vertex or a dangling endpoint.
    pub relative_x: Option<f64>,
}

impl Endpoint {
    /// A connected endpoint at a vertex's bounds.
    #[must_use]
    pub const fn vertex(bounds: Rect) -> Self {
        Self {
            bounds,
            recorded_point: None,
            rotation: 0.0,
            port_constraint: None,
            is_edge: false,
            relative_x: None,
        }
    }

    /// A dangling endpoint at a bare point, with no real vertex.
    #[must_use]
    pub fn dangling(point: Point) -> Self {
        Self {
            bounds: Rect::new(point.x, point.y, point.x, point.y),
            recorded_point: Some(point),
            rotation: 0.0,
            port_constraint: None,
            is_edge: false,
            relative_x: None,
        }
    }

    /// Returns `self` with `relative_x` set, for a vertex whose geometry
    /// is relative to its parent (§3.2, §4.3.1 rule (a)).
    #[must_use]
    pub const fn with_relative_x(mut self, fraction: f64) -> Self {
        self.relative_x = Some(fraction);
        self
    }

    /// Returns `self` with a port constraint (§6.1 `portConstraint`) set.
    #[must_use]
    pub const fn with_port_constraint(mut self, side: crate::Side) -> Self {
        self.port_constraint = Some(side);
        self
    }

    /// `bounds`, replaced with its rotated axis-aligned bounding box if
    /// `rotation` is non-zero (§4.3.5 "Rotation").
    #[must_use]
    pub fn effective_bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            self.bounds
        } else {
            let center = Point::new(
                self.bounds.x0 + self.bounds.width() / 2.0,
                self.bounds.y0 + self.bounds.height() / 2.0,
            );
            rotated_rect_aabb(self.bounds, self.rotation, center)
        }
    }

    /// The anchor point a router should treat this endpoint as being at:
    /// the recorded point if present, else the center of `effective_bounds`
    /// (§9 OQ1).
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.recorded_point.unwrap_or_else(|| {
            let b = self.effective_bounds();
            Point::new(b.x0 + b.width() / 2.0, b.y0 + b.height() / 2.0)
        })
    }
}

/// User-placed waypoint hints (relative control points) a router may
/// consult or ignore.
pub type Hints = Vec<Point>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_endpoint_has_no_relative_fraction_by_default() {
        let e = Endpoint::vertex(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(e.relative_x, None);
        let relative = e.with_relative_x(0.25);
        assert_eq!(relative.relative_x, Some(0.25));
    }

    #[test]
    fn dangling_anchor_is_recorded_point() {
        let p = Point::new(3.0, 4.0);
        let e = Endpoint::dangling(p);
        assert_eq!(e.anchor(), p);
    }
}
