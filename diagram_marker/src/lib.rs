// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell-under-pointer resolution, hotspot policy, and validity marking
//! (component F, §4.4).
//!
//! [`Marker::process`] resolves the connectable cell under a pointer
//! event, applies the hotspot shrink and rotation-aware hit test, and
//! reports a validity-colored [`MarkState`] for the host to highlight.
//! The "is this a valid drop target" and "is this cell a swimlane"
//! questions are both left to the caller via [`MarkerPolicy`], mirroring
//! the teacher's `FocusPropsLookup` adapter trait (a lookup the crate
//! falls back to a permissive default for via a blanket `()` impl) rather
//! than baking a concrete validation rule into the crate.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::marker::PhantomData;
use diagram_dispatch::PointerEvent;
use diagram_geom::{Point, Rect};
use diagram_model::{Handle, Model};
use diagram_view::View;

/// Capability lookup a host plugs into [`Marker::process`] (§4.4 steps 2
/// and 4): whether a cell counts as a swimlane, for the content-hit
/// rejection rule, and whether the cell currently under the pointer is a
/// valid target, for highlight coloring.
///
/// Mirrors the teacher's `FocusPropsLookup<K>` pattern: a blanket impl
/// for `()` gives every cell a permissive default (not a swimlane,
/// always valid) for callers that don't need the distinction.
pub trait MarkerPolicy<V> {
    /// `true` if `cell` should be highlighted in the valid color.
    fn is_valid(&self, model: &Model<V>, cell: Handle) -> bool;
    /// `true` if `cell` is a swimlane (§4.4 "Reject swimlane content
    /// hits").
    fn is_swimlane(&self, model: &Model<V>, cell: Handle) -> bool;
}

impl<V> MarkerPolicy<V> for () {
    fn is_valid(&self, _model: &Model<V>, _cell: Handle) -> bool {
        true
    }

    fn is_swimlane(&self, _model: &Model<V>, _cell: Handle) -> bool {
        false
    }
}

/// Hotspot and swimlane-rejection configuration for a [`Marker`] (§4.4
/// "Hotspot policy").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerOptions {
    /// Fraction of a vertex's bounds, in `[0, 1]`, that counts as "on the
    /// vertex" when the hotspot policy is enabled.
    pub hotspot: f64,
    /// Whether the hotspot shrink is applied at all; when `false`, the
    /// full bounds rectangle is the hit target.
    pub hotspot_enabled: bool,
    /// Lower clamp, in pixels, for the hotspot rectangle's width/height.
    pub min_hotspot_size: f64,
    /// Upper clamp, in pixels, for the hotspot rectangle's width/height.
    pub max_hotspot_size: f64,
    /// When `true`, a hit on a child of a swimlane (as reported by
    /// [`MarkerPolicy::is_swimlane`]) is rejected rather than marking
    /// that child (§4.4 "Reject swimlane content hits (configurable)").
    pub reject_swimlane_content: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            hotspot: 0.3,
            hotspot_enabled: false,
            min_hotspot_size: 0.0,
            max_hotspot_size: f64::INFINITY,
            reject_swimlane_content: true,
        }
    }
}

/// The cell currently marked, and whether it reads as a valid drop
/// target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkState {
    /// The marked cell.
    pub cell: Handle,
    /// `true` if it should be painted in the valid color.
    pub valid: bool,
}

/// Tracks at most one marked cell at a time (§4.4).
pub struct Marker<V> {
    options: MarkerOptions,
    current: Option<MarkState>,
    _model: PhantomData<fn() -> V>,
}

impl<V> core::fmt::Debug for Marker<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Marker").field("options", &self.options).field("current", &self.current).finish()
    }
}

impl<V> Marker<V> {
    /// Creates a marker with the given hotspot/rejection configuration.
    #[must_use]
    pub const fn new(options: MarkerOptions) -> Self {
        Self { options, current: None, _model: PhantomData }
    }

    /// The currently marked cell, if any.
    #[must_use]
    pub const fn current(&self) -> Option<MarkState> {
        self.current
    }

    /// Clears the marked cell, returning the state that was cleared.
    pub fn reset(&mut self) -> Option<MarkState> {
        self.current.take()
    }

    /// Resolves the cell under `event`'s pointer position and updates the
    /// marked state (§4.4 "Contract: `process(pointerEvent) → state|null`").
    ///
    /// Steps, per §4.4: hit-test the visible, connectable cells in
    /// document order (later cells in the tree read as painted on top);
    /// ascend from a non-connectable hit to its nearest connectable
    /// ancestor; reject a hit whose parent is a swimlane when configured
    /// to do so; evaluate [`MarkerPolicy::is_valid`] for the final
    /// candidate. The returned state (or `None`, clearing the mark) is
    /// always the marker's new current state; a host that only wants to
    /// repaint on an actual change can diff it against the value
    /// returned by a previous call.
    pub fn process<P: MarkerPolicy<V>>(
        &mut self,
        model: &Model<V>,
        view: &View<V>,
        policy: &P,
        event: &PointerEvent,
    ) -> Option<MarkState> {
        let hit = self
            .hit_test(model, view, event.client)
            .and_then(|cell| ascend_to_connectable(model, cell))
            .filter(|&cell| !(self.options.reject_swimlane_content && is_swimlane_content_hit(model, policy, cell)));

        self.current = hit.map(|cell| MarkState { cell, valid: policy.is_valid(model, cell) });
        self.current
    }

    /// Depth-first, document-order search for the topmost visible,
    /// connectable vertex whose cached bounds contain `point`. Children
    /// are visited after their parent so a later overwrite of the
    /// candidate favors the more specific (innermost, or later-sibling)
    /// cell, matching typical paint order.
    fn hit_test(&self, model: &Model<V>, view: &View<V>, point: Point) -> Option<Handle> {
        let mut candidate = None;
        let mut stack: Vec<Handle> = alloc::vec![model.root()];
        while let Some(handle) = stack.pop() {
            let Some(cell) = model.get(handle) else {
                continue;
            };
            if cell.is_vertex() && cell.is_visible() {
                if let Some(state) = view.get(handle) {
                    if point_hits(&self.options, state, point) {
                        candidate = Some(handle);
                    }
                }
            }
            for &child in cell.children().iter().rev() {
                stack.push(child);
            }
        }
        candidate
    }
}

impl<V> Default for Marker<V> {
    fn default() -> Self {
        Self::new(MarkerOptions::default())
    }
}

fn ascend_to_connectable<V>(model: &Model<V>, mut handle: Handle) -> Option<Handle> {
    loop {
        let cell = model.get(handle)?;
        if cell.is_connectable() {
            return Some(handle);
        }
        handle = cell.parent()?;
    }
}

fn is_swimlane_content_hit<V, P: MarkerPolicy<V>>(model: &Model<V>, policy: &P, cell: Handle) -> bool {
    model.get(cell).and_then(|c| c.parent()).is_some_and(|parent| policy.is_swimlane(model, parent))
}

fn point_hits(options: &MarkerOptions, state: &diagram_view::CellState, point: Point) -> bool {
    let bounds = state.bounds();
    let test_point = if state.rotation == 0.0 {
        point
    } else {
        let center = Point::new(bounds.x0 + bounds.width() / 2.0, bounds.y0 + bounds.height() / 2.0);
        rotate_point(point, center, -state.rotation)
    };
    hotspot_rect(options, bounds).contains(test_point)
}

fn hotspot_rect(options: &MarkerOptions, bounds: Rect) -> Rect {
    if !options.hotspot_enabled {
        return bounds;
    }
    let width = (bounds.width() * options.hotspot).clamp(options.min_hotspot_size, options.max_hotspot_size);
    let height = (bounds.height() * options.hotspot).clamp(options.min_hotspot_size, options.max_hotspot_size);
    let cx = bounds.x0 + bounds.width() / 2.0;
    let cy = bounds.y0 + bounds.height() / 2.0;
    Rect::new(cx - width / 2.0, cy - height / 2.0, cx + width / 2.0, cy + height / 2.0)
}

fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin(), radians.cos());
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_dispatch::{Button, Modifiers, Phase};
    use diagram_model::{CellRole, Geometry};
    use diagram_style::MapStyleProvider;

    fn pointer_at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(Point::new(x, y), Point::new(x, y), Modifiers::empty(), Button::Left, Phase::Move)
    }

    #[test]
    fn marks_the_connectable_vertex_under_the_pointer() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        model.swap_child(v, Some(root), 0);
        model.swap_geometry(v, Some(Geometry::vertex(0.0, 0.0, 40.0, 30.0)));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, v);

        let mut marker: Marker<()> = Marker::new(MarkerOptions::default());
        let state = marker.process(&model, &view, &(), &pointer_at(10.0, 10.0));
        assert_eq!(state, Some(MarkState { cell: v, valid: true }));
        assert_eq!(marker.current(), state);
    }

    #[test]
    fn misses_clear_the_mark() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        model.swap_child(v, Some(root), 0);
        model.swap_geometry(v, Some(Geometry::vertex(0.0, 0.0, 40.0, 30.0)));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, v);

        let mut marker: Marker<()> = Marker::new(MarkerOptions::default());
        marker.process(&model, &view, &(), &pointer_at(10.0, 10.0));
        let state = marker.process(&model, &view, &(), &pointer_at(1000.0, 1000.0));
        assert_eq!(state, None);
        assert_eq!(marker.current(), None);
    }

    #[test]
    fn non_connectable_hit_ascends_to_its_connectable_parent() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let parent = model.create_cell(CellRole::Vertex);
        model.swap_child(parent, Some(root), 0);
        model.swap_geometry(parent, Some(Geometry::vertex(0.0, 0.0, 100.0, 100.0)));

        let child = model.create_cell(CellRole::Vertex);
        model.swap_child(child, Some(parent), 0);
        model.swap_geometry(child, Some(Geometry::vertex(10.0, 10.0, 20.0, 20.0)));
        model.swap_connectable(child, false);

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, parent);
        view.validate(&model, &styles, child);

        let mut marker: Marker<()> = Marker::new(MarkerOptions::default());
        let state = marker.process(&model, &view, &(), &pointer_at(15.0, 15.0));
        assert_eq!(state, Some(MarkState { cell: parent, valid: true }));
    }

    #[test]
    fn hotspot_shrink_excludes_the_rectangle_edge() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        model.swap_child(v, Some(root), 0);
        model.swap_geometry(v, Some(Geometry::vertex(0.0, 0.0, 100.0, 100.0)));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, v);

        let mut options = MarkerOptions::default();
        options.hotspot_enabled = true;
        options.hotspot = 0.5;
        let mut marker: Marker<()> = Marker::new(options);

        assert_eq!(marker.process(&model, &view, &(), &pointer_at(50.0, 50.0)), Some(MarkState { cell: v, valid: true }));
        assert_eq!(marker.process(&model, &view, &(), &pointer_at(2.0, 2.0)), None);
    }
}
