// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Rect};
use diagram_model::Handle;
use diagram_style::Style;

bitflags::bitflags! {
    /// Why a cached [`CellState`] needs to be recomputed before it is next
    /// read (§3.3: "invalidation flags {invalid-layout, invalid-style}").
    ///
    /// A freshly validated state carries no bits set. [`crate::View::invalidate`]
    /// sets `LAYOUT` on a structural/geometry change and `STYLE` on a style
    /// change; [`crate::View::ensure_valid`] recomputes (and clears) whichever
    /// bits are set rather than dropping the cache entry outright, so the
    /// previous geometry stays available as a "last known" value until the
    /// next validation pass completes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InvalidFlags: u8 {
        /// Absolute geometry (origin, bounds, waypoints) is stale.
        const LAYOUT = 0b01;
        /// The resolved style dictionary is stale.
        const STYLE = 0b10;
    }
}

/// A derived, per-visible-cell view node (§3.3 "CellState").
///
/// One `CellState` is cached per visible, reachable cell; it is recomputed
/// lazily by [`crate::View::ensure_valid`] whenever `invalid` is non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct CellState {
    /// The cell this state derives from.
    pub cell: Handle,
    /// The resolved style dictionary for this cell.
    pub style: Style,
    /// Absolute (view-space) origin: top-left of `bounds` for a vertex, or
    /// the first point of `absolute_points` for an edge.
    pub origin: Point,
    /// Absolute (scaled) width.
    pub width: f64,
    /// Absolute (scaled) height.
    pub height: f64,
    /// Width before view scale is applied.
    pub unscaled_width: f64,
    /// Height before view scale is applied.
    pub unscaled_height: f64,
    /// Rotation in degrees, carried from style.
    pub rotation: f64,
    /// Ordered absolute waypoints; empty for a vertex, at least two points
    /// for a routed edge with `absolute_points[0]`/`[last]` as the resolved
    /// terminal points (§3.3 invariant).
    pub absolute_points: Vec<Point>,
    /// Absolute label offset (vertex label nudge, or edge label position).
    pub absolute_offset: Option<Point>,
    /// The bounding box of this state (vertex bounds, or the bounding box of
    /// `absolute_points` for an edge).
    pub bounding_box: Rect,
    /// Total path length along `absolute_points`, for an edge.
    pub terminal_distance: Option<f64>,
    /// Length of each consecutive segment of `absolute_points`, for an edge.
    pub segment_lengths: Vec<f64>,
    /// The visible state backing the source terminal, for an edge (§3.3:
    /// "reflect the non-relative ancestors used for routing").
    pub visible_source: Option<Handle>,
    /// The visible state backing the target terminal, for an edge.
    pub visible_target: Option<Handle>,
    /// What, if anything, is stale about this cached state.
    pub invalid: InvalidFlags,
}

impl CellState {
    pub(crate) fn new(cell: Handle) -> Self {
        Self {
            cell,
            style: Style::new(),
            origin: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
            unscaled_width: 0.0,
            unscaled_height: 0.0,
            rotation: 0.0,
            absolute_points: Vec::new(),
            absolute_offset: None,
            bounding_box: Rect::ZERO,
            terminal_distance: None,
            segment_lengths: Vec::new(),
            visible_source: None,
            visible_target: None,
            invalid: InvalidFlags::LAYOUT | InvalidFlags::STYLE,
        }
    }

    /// Absolute bounds, derived from `origin`/`width`/`height` (vertex
    /// states) or `bounding_box` directly (edge states, where `width`/
    /// `height` are left at zero).
    #[must_use]
    pub fn bounds(&self) -> Rect {
        if self.absolute_points.is_empty() {
            Rect::new(self.origin.x, self.origin.y, self.origin.x + self.width, self.origin.y + self.height)
        } else {
            self.bounding_box
        }
    }
}
