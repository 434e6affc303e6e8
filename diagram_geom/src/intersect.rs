// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// Returns the axis-aligned bounding box of `rect` rotated by `degrees`
/// around `center`.
///
/// Used by the orthogonal router (§4.3.5) when a terminal's style carries a
/// non-zero `rotation`: quadrant and limit computation operate against this
/// box rather than the unrotated rectangle.
#[must_use]
pub fn rotated_rect_aabb(rect: Rect, degrees: f64, center: Point) -> Rect {
    if degrees == 0.0 {
        return rect;
    }
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin(), radians.cos());
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in corners {
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        let rx = center.x + dx * cos - dy * sin;
        let ry = center.y + dx * sin + dy * cos;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Intersection point of two line segments, or `None` if they are parallel
/// or don't overlap within their endpoints.
#[must_use]
pub fn segment_intersection(
    a0: Point,
    a1: Point,
    b0: Point,
    b1: Point,
) -> Option<Point> {
    let d1x = a1.x - a0.x;
    let d1y = a1.y - a0.y;
    let d2x = b1.x - b0.x;
    let d2y = b1.y - b0.y;

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < 1e-12 {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * d2y - dy * d2x) / denom;
    let u = (dx * d1y - dy * d1x) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(a0.x + t * d1x, a0.y + t * d1y))
    } else {
        None
    }
}

/// `true` if the segment `(p0, p1)` intersects the boundary of, or lies
/// within, `rect`.
#[must_use]
pub fn rect_intersects_segment(rect: Rect, p0: Point, p1: Point) -> bool {
    if rect.contains(p0) || rect.contains(p1) {
        return true;
    }
    let corners = [
        (Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y0)),
        (Point::new(rect.x1, rect.y0), Point::new(rect.x1, rect.y1)),
        (Point::new(rect.x1, rect.y1), Point::new(rect.x0, rect.y1)),
        (Point::new(rect.x0, rect.y1), Point::new(rect.x0, rect.y0)),
    ];
    corners
        .into_iter()
        .any(|(c0, c1)| segment_intersection(p0, p1, c0, c1).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrotated_aabb_is_identity() {
        let rect = Rect::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(rotated_rect_aabb(rect, 0.0, Point::new(5.0, 10.0)), rect);
    }

    #[test]
    fn ninety_degree_rotation_swaps_extents() {
        let rect = Rect::new(0.0, 0.0, 10.0, 20.0);
        let center = Point::new(5.0, 10.0);
        let aabb = rotated_rect_aabb(rect, 90.0, center);
        assert!((aabb.width() - 20.0).abs() < 1e-9);
        assert!((aabb.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_segments_intersect() {
        let p = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(p, Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let p = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn rect_intersects_crossing_segment() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_intersects_segment(rect, Point::new(-5.0, 5.0), Point::new(15.0, 5.0)));
        assert!(!rect_intersects_segment(rect, Point::new(-5.0, 50.0), Point::new(15.0, 50.0)));
    }
}
