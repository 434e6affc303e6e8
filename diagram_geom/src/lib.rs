// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric primitives shared by the diagram engine: points and rectangles
//! (reexported from `kurbo`), rectangle sides, perimeter functions, rotation,
//! and segment/rectangle intersection helpers used by the routing and
//! view-derivation layers.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` by default and uses `alloc`. Enable the `std`
//! feature to forward to `kurbo`'s `std` feature (faster trig); otherwise
//! enable `libm` for `no_std` floating point.

#![no_std]

extern crate alloc;

mod intersect;
mod perimeter;
mod quadrant;
mod side;

pub use intersect::{rect_intersects_segment, rotated_rect_aabb, segment_intersection};
pub use kurbo::{Affine, Point, Rect, Vec2};
pub use perimeter::{PerimeterFn, ellipse_perimeter, rectangle_perimeter};
pub use quadrant::Quadrant;
pub use side::Side;

/// A point expressed as a fraction of a rectangle's width/height, e.g. a
/// fixed connection constraint ("top-center" = `(0.5, 0.0)`) or a relative
/// vertex geometry anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fractional {
    /// Fractional x position in `[0, 1]` (not strictly clamped).
    pub x: f64,
    /// Fractional y position in `[0, 1]` (not strictly clamped).
    pub y: f64,
}

impl Fractional {
    /// Creates a new fractional anchor.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Resolves this fraction against a rectangle's bounds, in absolute
    /// coordinates.
    #[must_use]
    pub fn resolve(self, bounds: Rect) -> Point {
        Point::new(
            bounds.x0 + self.x * bounds.width(),
            bounds.y0 + self.y * bounds.height(),
        )
    }
}
