// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diagram_geom::{Point, Vec2};

/// The view's global scale and translate (§4.2: "The view maintains a
/// mapping from cell → `CellState` plus a global scale and translate").
///
/// A deliberately narrower cousin of `understory_view2d::Viewport2D`: no
/// zoom-limit clamping, fit modes, or device view-rect tracking, since the
/// spec only names uniform scale plus translate as view-level state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    translate: Vec2,
}

impl ViewTransform {
    /// A transform at scale `1.0` with no translation.
    #[must_use]
    pub const fn identity() -> Self {
        Self { scale: 1.0, translate: Vec2::new(0.0, 0.0) }
    }

    /// Creates a transform at the given scale and translate.
    #[must_use]
    pub const fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// The current scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// The current translate.
    #[must_use]
    pub const fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Sets the scale factor, returning `true` if it actually changed (the
    /// caller uses this to decide whether to invalidate every cached state,
    /// §3.3 "invalidated on ... scale/translate change").
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if self.scale == scale {
            return false;
        }
        self.scale = scale;
        true
    }

    /// Sets the translate, returning `true` if it actually changed.
    pub fn set_translate(&mut self, translate: Vec2) -> bool {
        if self.translate == translate {
            return false;
        }
        self.translate = translate;
        true
    }

    /// Maps a world (model) point to view (scaled, translated) coordinates.
    #[must_use]
    pub fn world_to_view_point(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.translate.x,
            point.y * self.scale + self.translate.y,
        )
    }

    /// Maps a view point back to world (model) coordinates.
    #[must_use]
    pub fn view_to_world_point(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.translate.x) / self.scale,
            (point.y - self.translate.y) / self.scale,
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
