// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed connection-point focus tracking and nearest-icon selection
//! (component G, §4.5).
//!
//! A [`ConstraintHandler`] decides which vertex is currently "in focus"
//! (showing its fixed-connection-point icons), then among that vertex's
//! icons picks the one nearest the pointer, subject to a tolerance box.
//! Candidate collection is grounded on the teacher's
//! `understory_focus::adapters::box_tree::build_focus_space_for_scope`:
//! a depth-first, explicit-stack walk that collects connectable,
//! visible vertices in document order, visiting children after their
//! parent so later overwrites favor the more specific cell.
//!
//! The vertex-to-icons mapping is supplied by the host through
//! [`ConstraintSource`] (constraint points are a per-shape concept the
//! graph owns, not something this crate can derive from geometry alone),
//! following the same capability-injection shape as `diagram_marker`'s
//! `MarkerPolicy`.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::marker::PhantomData;
use diagram_dispatch::{Modifiers, PointerEvent};
use diagram_geom::{Fractional, Point, Rect};
use diagram_model::{Handle, Model};
use diagram_view::View;

/// Supplies a vertex's fixed connection points (§4.5 "points like
/// 'top-center', 'bottom-right'"), as fractions of its bounds.
///
/// A blanket impl for `()` reports no constraints for any cell, so a
/// caller that has none configured yet can still construct a
/// [`ConstraintHandler`] without writing a trivial adapter.
pub trait ConstraintSource<V> {
    /// The fixed connection points declared for `cell`, if any.
    fn constraints(&self, model: &Model<V>, cell: Handle) -> Vec<Fractional>;
}

impl<V> ConstraintSource<V> for () {
    fn constraints(&self, _model: &Model<V>, _cell: Handle) -> Vec<Fractional> {
        Vec::new()
    }
}

/// Tolerance and focus-area configuration for a [`ConstraintHandler`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintOptions {
    /// Half-width/height, in pixels, of the square tolerance box centered
    /// on the pointer that a candidate icon's bounds must intersect.
    pub tolerance: f64,
    /// How far, in pixels, a vertex's bounds are inflated on each side
    /// before testing whether it counts as the focus target (§4.5
    /// "inflated focus area rectangle").
    pub focus_inflate: f64,
    /// Half-width/height, in pixels, of each connection-point icon's hit
    /// box, centered on its resolved anchor point.
    pub icon_size: f64,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self { tolerance: 2.0, focus_inflate: 40.0, icon_size: 5.0 }
    }
}

/// The focused vertex, selected icon, and its resolved anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintState {
    /// The vertex currently showing its connection-point icons.
    pub focus: Handle,
    /// The selected connection point, as a fraction of the focus vertex's
    /// bounds.
    pub constraint: Fractional,
    /// The selected connection point, resolved to an absolute point.
    pub point: Point,
}

/// Tracks the focused vertex and the nearest qualifying connection-point
/// icon across a sequence of pointer updates (§4.5).
pub struct ConstraintHandler<V> {
    options: ConstraintOptions,
    focus: Option<Handle>,
    locked: bool,
    current: Option<ConstraintState>,
    _model: PhantomData<fn() -> V>,
}

impl<V> core::fmt::Debug for ConstraintHandler<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConstraintHandler")
            .field("options", &self.options)
            .field("focus", &self.focus)
            .field("locked", &self.locked)
            .field("current", &self.current)
            .finish()
    }
}

impl<V> ConstraintHandler<V> {
    /// Creates a handler with the given tolerance/focus configuration.
    #[must_use]
    pub const fn new(options: ConstraintOptions) -> Self {
        Self { options, focus: None, locked: false, current: None, _model: PhantomData }
    }

    /// The vertex currently in focus, if any.
    #[must_use]
    pub const fn focus(&self) -> Option<Handle> {
        self.focus
    }

    /// The currently selected constraint, if any qualifies.
    #[must_use]
    pub const fn current(&self) -> Option<ConstraintState> {
        self.current
    }

    /// Discards focus, lock, and selection, returning the engine to idle
    /// (§4.5 "Reset if no icon qualifies", §5 "Cancellation"). Safe to
    /// call at any time.
    pub fn reset(&mut self) -> Option<ConstraintState> {
        self.focus = None;
        self.locked = false;
        self.current.take()
    }

    /// Updates focus and selection for one pointer update (§4.5).
    ///
    /// `snapped_box`, if given, is an additional rectangle (e.g. a
    /// grid-snapped tolerance box) that also qualifies a candidate icon
    /// even when its bounds miss the pointer's own tolerance box.
    pub fn process<S: ConstraintSource<V>>(
        &mut self,
        model: &Model<V>,
        view: &View<V>,
        source: &S,
        event: &PointerEvent,
        snapped_box: Option<Rect>,
    ) -> Option<ConstraintState> {
        let shift_held = event.modifiers.contains(Modifiers::SHIFT);
        if !(self.locked && shift_held) {
            self.focus = self.find_focus(model, view, event.client);
        }
        self.locked = shift_held && self.focus.is_some();

        let Some(focus) = self.focus else {
            self.current = None;
            return None;
        };
        let Some(state) = view.get(focus) else {
            self.current = None;
            return None;
        };

        let pointer_box = Rect::new(
            event.client.x - self.options.tolerance,
            event.client.y - self.options.tolerance,
            event.client.x + self.options.tolerance,
            event.client.y + self.options.tolerance,
        );
        let bounds = state.bounds();

        let nearest = source
            .constraints(model, focus)
            .into_iter()
            .map(|constraint| (constraint, constraint.resolve(bounds)))
            .filter(|(_, point)| {
                let icon_box = Rect::new(
                    point.x - self.options.icon_size,
                    point.y - self.options.icon_size,
                    point.x + self.options.icon_size,
                    point.y + self.options.icon_size,
                );
                icon_box.intersect(pointer_box).area() > 0.0
                    || snapped_box.is_some_and(|b| icon_box.intersect(b).area() > 0.0)
            })
            .min_by(|(_, a), (_, b)| {
                squared_distance(*a, event.client)
                    .partial_cmp(&squared_distance(*b, event.client))
                    .unwrap_or(core::cmp::Ordering::Equal)
            });

        self.current = nearest.map(|(constraint, point)| ConstraintState { focus, constraint, point });
        self.current
    }

    /// Depth-first, document-order search for the last (most specific)
    /// connectable, visible vertex whose inflated bounds contain `point`.
    fn find_focus(&self, model: &Model<V>, view: &View<V>, point: Point) -> Option<Handle> {
        let mut candidate = None;
        let mut stack: Vec<Handle> = alloc::vec![model.root()];
        while let Some(handle) = stack.pop() {
            let Some(cell) = model.get(handle) else {
                continue;
            };
            if cell.is_vertex() && cell.is_visible() && cell.is_connectable() {
                if let Some(state) = view.get(handle) {
                    let inflated = state.bounds().inflate(self.options.focus_inflate, self.options.focus_inflate);
                    if inflated.contains(point) {
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

impl<V> Default for ConstraintHandler<V> {
    fn default() -> Self {
        Self::new(ConstraintOptions::default())
    }
}

fn squared_distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
