// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diagram_dispatch::Modifiers;
use diagram_geom::{Point, Rect};
use diagram_index::SpatialIndex;
use diagram_model::Handle;

use crate::Selection;

/// Tracks a rubberband (lasso) drag rectangle from press to release and
/// resolves it against a [`SpatialIndex`] (§4.7.1 "Rubberband").
///
/// A qualifying press — on empty canvas, or with the configured modifier
/// held — is the caller's decision (this type has no notion of "empty
/// area"); the host calls [`Rubberband::press`] only once it has already
/// decided the gesture qualifies. Coordinate adjustment for container
/// scroll is likewise a host concern: every point passed in is assumed to
/// already be in the same space as the entries tracked by the
/// [`SpatialIndex`].
///
/// Cancelling any native text selection the browser may have started is a
/// DOM-level housekeeping step with no counterpart in this `no_std` engine
/// core; a web host wires that up alongside [`Rubberband::press`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rubberband {
    origin: Option<Point>,
    current: Option<Rect>,
}

impl Rubberband {
    /// Creates an idle rubberband tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { origin: None, current: None }
    }

    /// `true` if a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// The current drag rectangle, if a drag is in progress.
    #[must_use]
    pub const fn rect(&self) -> Option<Rect> {
        self.current
    }

    /// Begins tracking a drag from `origin` (§4.7.1 "On a qualifying
    /// press... record the starting point").
    pub fn press(&mut self, origin: Point) {
        self.origin = Some(origin);
        self.current = Some(Rect::from_points(origin, origin));
    }

    /// Updates the drag rectangle for a pointer move to `point`, returning
    /// the new rectangle if a drag is in progress (§4.7.1 "On move, grow a
    /// floating selection rectangle").
    pub fn update(&mut self, point: Point) -> Option<Rect> {
        let origin = self.origin?;
        let rect = Rect::from_points(origin, point);
        self.current = Some(rect);
        Some(rect)
    }

    /// Abandons the in-progress drag without touching any selection.
    pub fn cancel(&mut self) {
        self.origin = None;
        self.current = None;
    }

    /// Ends the drag, selecting every cell in `index` whose bounds
    /// intersect the final rectangle into `selection` (§4.7.1 "On release,
    /// query the spatial index for intersecting cells and select them").
    ///
    /// Holding shift extends the existing selection instead of replacing
    /// it, matching the modifier convention used elsewhere in pointer
    /// dispatch (§4.7 "click / ctrl-click / shift-click").
    ///
    /// Returns the final drag rectangle, or `None` if no drag was in
    /// progress.
    pub fn release(&mut self, index: &SpatialIndex, modifiers: Modifiers, selection: &mut Selection<Handle>) -> Option<Rect> {
        let rect = self.current.take();
        self.origin = None;

        if let Some(rect) = rect {
            let hits: alloc::vec::Vec<Handle> = index.query_rect(rect).collect();
            if modifiers.contains(Modifiers::SHIFT) {
                selection.extend_with(hits);
            } else {
                selection.replace_with_unique(hits);
            }
        }

        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_index::Arena;

    fn ids(n: usize) -> alloc::vec::Vec<Handle> {
        let mut arena = Arena::new();
        (0..n).map(|i| arena.insert(i)).collect()
    }

    #[test]
    fn press_then_update_grows_a_normalized_rect() {
        let mut band = Rubberband::new();
        band.press(Point::new(10.0, 10.0));
        let rect = band.update(Point::new(0.0, 5.0)).unwrap();
        assert_eq!(rect, Rect::new(0.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn release_selects_cells_intersecting_the_band_scenario_8_2_5() {
        let handles = ids(3);
        let mut index = SpatialIndex::new();
        index.set(handles[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        index.set(handles[1], Rect::new(50.0, 0.0, 60.0, 10.0));
        index.set(handles[2], Rect::new(0.0, 50.0, 10.0, 60.0));

        let mut band = Rubberband::new();
        band.press(Point::new(-5.0, -5.0));
        band.update(Point::new(55.0, 5.0));

        let mut selection = Selection::new();
        let modifiers = Modifiers::empty();
        band.release(&index, modifiers, &mut selection);

        assert!(selection.contains(&handles[0]));
        assert!(selection.contains(&handles[1]));
        assert!(!selection.contains(&handles[2]));
        assert_eq!(selection.len(), 2);
        assert!(!band.is_active());
    }

    #[test]
    fn shift_held_extends_rather_than_replaces() {
        let handles = ids(2);
        let mut index = SpatialIndex::new();
        index.set(handles[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        index.set(handles[1], Rect::new(100.0, 100.0, 110.0, 110.0));

        let mut selection = Selection::new();
        selection.select_only(handles[1]);

        let mut band = Rubberband::new();
        band.press(Point::new(-5.0, -5.0));
        band.update(Point::new(15.0, 15.0));
        band.release(&index, Modifiers::SHIFT, &mut selection);

        assert!(selection.contains(&handles[0]));
        assert!(selection.contains(&handles[1]));
    }

    #[test]
    fn cancel_leaves_selection_untouched() {
        let mut band = Rubberband::new();
        band.press(Point::new(0.0, 0.0));
        band.update(Point::new(10.0, 10.0));
        band.cancel();
        assert!(!band.is_active());
        assert_eq!(band.rect(), None);
    }
}
