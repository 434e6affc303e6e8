// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// A pure function mapping a shape's bounds and a point of interest to the
/// point on that shape's perimeter nearest the line from its center to
/// `point`.
///
/// Per §9's design note, perimeter functions are pure functions in a named
/// registry rather than virtual methods on a shape class hierarchy; shapes
/// reference one by style key (`diagram_style`) and the router/view look it
/// up when clipping a terminal point (§4.2 step 4).
pub type PerimeterFn = fn(bounds: Rect, point: Point, nearest: bool) -> Point;

/// The default perimeter function: clips `point` to the border of an
/// axis-aligned rectangle along the ray from its center.
///
/// If `nearest` is `false` and `point` lies on the center (degenerate), the
/// east side midpoint is returned rather than dividing by zero.
#[must_use]
pub fn rectangle_perimeter(bounds: Rect, point: Point, nearest: bool) -> Point {
    let cx = bounds.x0 + bounds.width() / 2.0;
    let cy = bounds.y0 + bounds.height() / 2.0;
    let dx = point.x - cx;
    let dy = point.y - cy;

    if dx == 0.0 && dy == 0.0 {
        return Point::new(bounds.x1, cy);
    }

    let half_w = bounds.width() / 2.0;
    let half_h = bounds.height() / 2.0;
    if half_w == 0.0 || half_h == 0.0 {
        return if nearest {
            Point::new(cx.clamp(bounds.x0, bounds.x1), cy.clamp(bounds.y0, bounds.y1))
        } else {
            Point::new(bounds.x1, cy)
        };
    }

    // Scale so the larger of |dx|/half_w, |dy|/half_h reaches exactly 1: the
    // ray from center through `point` exits the rectangle at that scale.
    let scale_x = if dx != 0.0 { (dx / half_w).abs() } else { 0.0 };
    let scale_y = if dy != 0.0 { (dy / half_h).abs() } else { 0.0 };
    let scale = scale_x.max(scale_y);
    if scale == 0.0 {
        return Point::new(cx, cy);
    }
    Point::new(cx + dx / scale, cy + dy / scale)
}

/// Perimeter function for an ellipse inscribed in `bounds`.
#[must_use]
pub fn ellipse_perimeter(bounds: Rect, point: Point, _nearest: bool) -> Point {
    let cx = bounds.x0 + bounds.width() / 2.0;
    let cy = bounds.y0 + bounds.height() / 2.0;
    let a = bounds.width() / 2.0;
    let b = bounds.height() / 2.0;
    let dx = point.x - cx;
    let dy = point.y - cy;

    if a == 0.0 || b == 0.0 {
        return Point::new(cx, cy);
    }
    if dx == 0.0 && dy == 0.0 {
        return Point::new(bounds.x1, cy);
    }

    // Solve for t such that (t*dx/a)^2 + (t*dy/b)^2 = 1.
    let denom = (dx / a).powi(2) + (dy / b).powi(2);
    let t = 1.0 / denom.sqrt();
    Point::new(cx + dx * t, cy + dy * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_perimeter_clips_east() {
        let bounds = Rect::new(0.0, 0.0, 80.0, 30.0);
        let p = rectangle_perimeter(bounds, Point::new(200.0, 15.0), false);
        assert_eq!(p, Point::new(80.0, 15.0));
    }

    #[test]
    fn rectangle_perimeter_clips_corner() {
        let bounds = Rect::new(0.0, 0.0, 40.0, 40.0);
        let p = rectangle_perimeter(bounds, Point::new(100.0, 100.0), false);
        assert!((p.x - 40.0).abs() < 1e-9);
        assert!((p.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ellipse_perimeter_on_axis() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let p = ellipse_perimeter(bounds, Point::new(1000.0, 25.0), false);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 25.0).abs() < 1e-9);
    }
}
