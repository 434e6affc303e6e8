// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect, Vec2};

/// Relative-model geometry of a cell (§3.2).
///
/// One type covers both vertices and edges, matching the source model: a
/// vertex uses `x`/`y`/`width`/`height` (plus `alternate_bounds` for
/// collapse) and ignores the edge-only fields; an edge uses
/// `source_point`/`target_point`/`points` and ignores `width`/`height`.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    /// X position. For a vertex with `relative` set, a fraction of the
    /// parent's width instead of an absolute coordinate.
    pub x: f64,
    /// Y position, subject to the same `relative` reinterpretation as `x`.
    pub y: f64,
    /// Width. Unused for edges.
    pub width: f64,
    /// Height. Unused for edges.
    pub height: f64,
    /// Bounds used in place of `(x, y, width, height)` while the cell is
    /// collapsed.
    pub alternate_bounds: Option<Rect>,
    /// Additional pixel offset applied after position resolution (vertex
    /// label/position nudge, or edge label position).
    pub offset: Option<Vec2>,
    /// For a vertex: `x`/`y` are fractions of the parent's bounds rather
    /// than absolute coordinates. For an edge: controls label-position
    /// semantics along the routed path rather than vertex placement.
    pub relative: bool,
    /// Informational source terminal point (edges only). Per §4.2's
    /// invariant, this is never authoritative once an endpoint is
    /// connected — the routing pipeline derives the real endpoint — but it
    /// is consulted per the "absolute terminal point wins" rule fixed in
    /// `SPEC_FULL.md`.
    pub source_point: Option<Point>,
    /// Informational target terminal point (edges only); see
    /// `source_point`.
    pub target_point: Option<Point>,
    /// User-placed waypoint hints, in relative (unscaled, model) coordinates
    /// (edges only).
    pub points: Vec<Point>,
}

impl Geometry {
    /// Creates vertex geometry at the given absolute bounds.
    #[must_use]
    pub fn vertex(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            alternate_bounds: None,
            offset: None,
            relative: false,
            source_point: None,
            target_point: None,
            points: Vec::new(),
        }
    }

    /// Creates empty edge geometry (no terminal points, no hints).
    #[must_use]
    pub fn edge() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            alternate_bounds: None,
            offset: None,
            relative: true,
            source_point: None,
            target_point: None,
            points: Vec::new(),
        }
    }

    /// The vertex bounds as a rectangle, ignoring `relative`/`offset`
    /// reinterpretation (callers resolving relative geometry against a
    /// parent do that in `diagram_view`).
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Bounds to use while the owning cell is collapsed: `alternate_bounds`
    /// if present, else the normal bounds.
    #[must_use]
    pub fn effective_bounds(&self, collapsed: bool) -> Rect {
        if collapsed {
            self.alternate_bounds.unwrap_or_else(|| self.bounds())
        } else {
            self.bounds()
        }
    }
}
