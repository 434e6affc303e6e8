// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect, ellipse_perimeter, rectangle_perimeter};
use kurbo::{Line, ParamCurveNearest as _};

use crate::Path;

/// The renderable variant of a shape (§9: "model the common surface as a
/// capability set and the variants as tagged variants over that set",
/// replacing `Shape ⊃ RectangleShape/Polyline/ImageShape`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// An axis-aligned (or rotated) rectangle, optionally rounded.
    Rectangle,
    /// An ellipse inscribed in its bounds.
    Ellipse,
    /// An open polyline through a recorded point list (a routed edge).
    Polyline,
}

/// A renderable primitive: a [`ShapeKind`] plus the geometry needed to
/// build its [`Path`] and answer hit tests (§6 "Shape abstraction:
/// renderable primitives; style application; hit testing").
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Which primitive this is.
    pub kind: ShapeKind,
    /// Bounds for `Rectangle`/`Ellipse`; the bounding box of `points` for
    /// `Polyline`.
    pub bounds: Rect,
    /// The waypoint list for a `Polyline` shape (a routed edge's absolute
    /// points); empty for `Rectangle`/`Ellipse`.
    pub points: Vec<Point>,
    /// Half the stroke width used by `hit_test`'s stroke fallback.
    pub stroke_half_width: f64,
}

impl Shape {
    /// A rectangle shape at `bounds`.
    #[must_use]
    pub fn rectangle(bounds: Rect, stroke_half_width: f64) -> Self {
        Self { kind: ShapeKind::Rectangle, bounds, points: Vec::new(), stroke_half_width }
    }

    /// An ellipse shape inscribed in `bounds`.
    #[must_use]
    pub fn ellipse(bounds: Rect, stroke_half_width: f64) -> Self {
        Self { kind: ShapeKind::Ellipse, bounds, points: Vec::new(), stroke_half_width }
    }

    /// A polyline shape through `points` (a routed edge's absolute points).
    #[must_use]
    pub fn polyline(points: Vec<Point>, stroke_half_width: f64) -> Self {
        let bounds = points.iter().fold(None::<Rect>, |acc, &p| {
            let point_rect = Rect::new(p.x, p.y, p.x, p.y);
            Some(acc.map_or(point_rect, |r| r.union(point_rect)))
        });
        Self {
            kind: ShapeKind::Polyline,
            bounds: bounds.unwrap_or(Rect::ZERO),
            points,
            stroke_half_width,
        }
    }

    /// Builds the drawable [`Path`] for this shape.
    #[must_use]
    pub fn to_path(&self) -> Path {
        match self.kind {
            ShapeKind::Rectangle => rectangle_path(self.bounds),
            ShapeKind::Ellipse => ellipse_path(self.bounds),
            ShapeKind::Polyline => Path::polyline(&self.points),
        }
    }

    /// `true` if `point` lies on this shape, within `tolerance` pixels
    /// (§4.4 "hotspot policy" / marker hit testing).
    ///
    /// `Rectangle`/`Ellipse` hit via their perimeter function's interior
    /// test (anything inside bounds counts, matching a filled vertex
    /// body); `Polyline` hits via distance to its nearest segment,
    /// grounded on `understory_precise_hit::stroke::StrokedLine`.
    #[must_use]
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse => {
                let inflated = self.bounds.inflate(tolerance, tolerance);
                inflated.contains(point)
            }
            ShapeKind::Polyline => self.points.windows(2).any(|segment| {
                let line = Line::new(segment[0], segment[1]);
                let distance = line.nearest(point, 0.0).distance_sq.sqrt();
                distance <= self.stroke_half_width + tolerance
            }),
        }
    }

    /// The point on this shape's perimeter in the direction of `from`,
    /// using the matching perimeter function (§4.2 step 4, "clip the
    /// endpoints to each terminal's perimeter").
    #[must_use]
    pub fn perimeter_point(&self, from: Point) -> Point {
        match self.kind {
            ShapeKind::Rectangle => rectangle_perimeter(self.bounds, from, false),
            ShapeKind::Ellipse => ellipse_perimeter(self.bounds, from, false),
            ShapeKind::Polyline => from,
        }
    }
}

fn rectangle_path(bounds: Rect) -> Path {
    let mut path = Path::new();
    path.move_to(Point::new(bounds.x0, bounds.y0))
        .line_to(Point::new(bounds.x1, bounds.y0))
        .line_to(Point::new(bounds.x1, bounds.y1))
        .line_to(Point::new(bounds.x0, bounds.y1))
        .close();
    path
}

fn ellipse_path(bounds: Rect) -> Path {
    let cx = bounds.x0 + bounds.width() / 2.0;
    let cy = bounds.y0 + bounds.height() / 2.0;
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let k = 0.552_284_8;
    let mut path = Path::new();
    path.move_to(Point::new(cx + rx, cy))
        .cubic_to(
            Point::new(cx + rx, cy + ry * k),
            Point::new(cx + rx * k, cy + ry),
            Point::new(cx, cy + ry),
        )
        .cubic_to(
            Point::new(cx - rx * k, cy + ry),
            Point::new(cx - rx, cy + ry * k),
            Point::new(cx - rx, cy),
        )
        .cubic_to(
            Point::new(cx - rx, cy - ry * k),
            Point::new(cx - rx * k, cy - ry),
            Point::new(cx, cy - ry),
        )
        .cubic_to(
            Point::new(cx + rx * k, cy - ry),
            Point::new(cx + rx, cy - ry * k),
            Point::new(cx + rx, cy),
        )
        .close();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_hit_test_within_tolerance() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0);
        assert!(shape.hit_test(Point::new(5.0, 5.0), 0.0));
        assert!(!shape.hit_test(Point::new(20.0, 20.0), 0.0));
        assert!(shape.hit_test(Point::new(10.5, 5.0), 1.0));
    }

    #[test]
    fn polyline_hit_test_near_segment() {
        let shape = Shape::polyline(alloc::vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], 1.0);
        assert!(shape.hit_test(Point::new(5.0, 0.5), 0.6));
        assert!(!shape.hit_test(Point::new(5.0, 5.0), 0.0));
    }

    #[test]
    fn polyline_bounds_is_the_union_of_its_points() {
        let shape = Shape::polyline(alloc::vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0)], 0.0);
        assert_eq!(shape.bounds, Rect::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn rectangle_path_is_a_closed_four_sided_loop() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 20.0), 0.0);
        let path = shape.to_path();
        assert_eq!(path.commands().len(), 5);
    }
}
