// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::marker::PhantomData;

use diagram_dispatch::PointerEvent;
use diagram_model::{Handle, Model};
use diagram_view::View;
use hashbrown::HashMap;

use crate::Selection;

/// Per-cell UI affordance attached to a selected cell (resize handles, a
/// rotation grip, a label editor trigger, ...), owned and refreshed by a
/// [`SelectionCellsHandler`] (§4.7.2 "Selection cells handler").
pub trait SelectionCellHandler<V> {
    /// `true` while this handler is in the middle of its own gesture (for
    /// example a resize drag); a refresh pass must leave such a handler
    /// alone rather than resetting it mid-gesture (§4.7.2 "skip handlers
    /// with an active interaction").
    fn has_active_interaction(&self) -> bool {
        false
    }

    /// Recomputes this handler's on-screen affordances from the current
    /// model/view state and redraws them.
    fn refresh(&mut self, model: &Model<V>, view: &View<V>);

    /// Forwards a pointer event to this handler.
    fn process_pointer(&mut self, model: &mut Model<V>, event: &PointerEvent);

    /// Releases any host-side resources (overlay nodes, listeners) this
    /// handler owns. Called once, just before the handler is dropped.
    fn destroy(&mut self) {}
}

/// Constructs a [`SelectionCellHandler`] for a newly selected cell (§4.7.2
/// "ask the graph to construct new ones").
pub trait SelectionCellFactory<V> {
    /// The handler type this factory builds.
    type Handler: SelectionCellHandler<V>;

    /// Builds a handler for `cell`.
    fn create(&mut self, model: &Model<V>, cell: Handle) -> Self::Handler;
}

/// Diffs a [`Selection`] against a cell-to-handler dictionary on every
/// refresh, keeping exactly one handler alive per currently selected cell
/// and fanning pointer events out to all of them (§4.7.2).
pub struct SelectionCellsHandler<V, H> {
    handlers: HashMap<Handle, H>,
    _model: PhantomData<fn() -> V>,
}

impl<V, H> Default for SelectionCellsHandler<V, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H> SelectionCellsHandler<V, H> {
    /// Creates an empty handler dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self { handlers: HashMap::new(), _model: PhantomData }
    }

    /// Number of cells currently owning a handler.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` if no cell currently owns a handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The handler owned for `cell`, if any.
    #[must_use]
    pub fn get(&self, cell: Handle) -> Option<&H> {
        self.handlers.get(&cell)
    }
}

impl<V, H: SelectionCellHandler<V>> SelectionCellsHandler<V, H> {
    /// Diffs `selection` against the dictionary (§4.7.2): destroys and
    /// drops the handler for every cell no longer selected, constructs a
    /// new one via `factory` for every newly selected cell, then refreshes
    /// every retained handler that reports no active interaction of its
    /// own.
    pub fn refresh<F>(&mut self, model: &Model<V>, view: &View<V>, selection: &Selection<Handle>, factory: &mut F)
    where
        F: SelectionCellFactory<V, Handler = H>,
    {
        let stale: Vec<Handle> = self.handlers.keys().copied().filter(|cell| !selection.contains(cell)).collect();
        for cell in stale {
            if let Some(mut handler) = self.handlers.remove(&cell) {
                handler.destroy();
            }
        }

        for &cell in selection.items() {
            self.handlers.entry(cell).or_insert_with(|| factory.create(model, cell));
        }

        for handler in self.handlers.values_mut() {
            if !handler.has_active_interaction() {
                handler.refresh(model, view);
            }
        }
    }

    /// Fans `event` out to every handler currently owned (§4.7.2 "Pointer
    /// events are fanned out to every handler in turn"); iteration order
    /// over the dictionary is unspecified.
    pub fn process_pointer(&mut self, model: &mut Model<V>, event: &PointerEvent) {
        for handler in self.handlers.values_mut() {
            handler.process_pointer(model, event);
        }
    }

    /// Destroys and drops every owned handler, e.g. when the selection is
    /// cleared wholesale.
    pub fn clear(&mut self) {
        for (_, mut handler) in self.handlers.drain() {
            handler.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::CellRole;

    struct RecordingHandler {
        refreshes: u32,
        pointer_events: u32,
        destroyed: bool,
        active: bool,
    }

    impl RecordingHandler {
        fn new() -> Self {
            Self { refreshes: 0, pointer_events: 0, destroyed: false, active: false }
        }
    }

    impl SelectionCellHandler<()> for RecordingHandler {
        fn has_active_interaction(&self) -> bool {
            self.active
        }

        fn refresh(&mut self, _model: &Model<()>, _view: &View<()>) {
            self.refreshes += 1;
        }

        fn process_pointer(&mut self, _model: &mut Model<()>, _event: &PointerEvent) {
            self.pointer_events += 1;
        }

        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    struct RecordingFactory {
        created: u32,
    }

    impl SelectionCellFactory<()> for RecordingFactory {
        type Handler = RecordingHandler;

        fn create(&mut self, _model: &Model<()>, _cell: Handle) -> Self::Handler {
            self.created += 1;
            RecordingHandler::new()
        }
    }

    fn make_vertex(model: &mut Model<()>) -> Handle {
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        model.swap_child(v, Some(root), 0);
        v
    }

    #[test]
    fn refresh_creates_one_handler_per_selected_cell() {
        let mut model: Model<()> = Model::new();
        let a = make_vertex(&mut model);
        let b = make_vertex(&mut model);
        let view: View<()> = View::new();

        let mut selection = Selection::new();
        selection.replace_with([a, b]);

        let mut cells: SelectionCellsHandler<(), RecordingHandler> = SelectionCellsHandler::new();
        let mut factory = RecordingFactory { created: 0 };
        cells.refresh(&model, &view, &selection, &mut factory);

        assert_eq!(cells.len(), 2);
        assert_eq!(factory.created, 2);
        assert_eq!(cells.get(a).unwrap().refreshes, 1);
    }

    #[test]
    fn refresh_destroys_handlers_for_deselected_cells() {
        let mut model: Model<()> = Model::new();
        let a = make_vertex(&mut model);
        let b = make_vertex(&mut model);
        let view: View<()> = View::new();

        let mut selection = Selection::new();
        selection.replace_with([a, b]);
        let mut cells: SelectionCellsHandler<(), RecordingHandler> = SelectionCellsHandler::new();
        let mut factory = RecordingFactory { created: 0 };
        cells.refresh(&model, &view, &selection, &mut factory);

        selection.replace_with([b]);
        cells.refresh(&model, &view, &selection, &mut factory);

        assert_eq!(cells.len(), 1);
        assert!(cells.get(b).is_some());
        assert!(cells.get(a).is_none());
    }

    #[test]
    fn refresh_skips_handlers_with_an_active_interaction() {
        let mut model: Model<()> = Model::new();
        let a = make_vertex(&mut model);
        let view: View<()> = View::new();

        let mut selection = Selection::new();
        selection.select_only(a);
        let mut cells: SelectionCellsHandler<(), RecordingHandler> = SelectionCellsHandler::new();
        let mut factory = RecordingFactory { created: 0 };
        cells.refresh(&model, &view, &selection, &mut factory);

        cells.handlers.get_mut(&a).unwrap().active = true;
        cells.refresh(&model, &view, &selection, &mut factory);

        assert_eq!(cells.get(a).unwrap().refreshes, 1);
    }

    #[test]
    fn process_pointer_fans_out_to_every_handler() {
        let mut model: Model<()> = Model::new();
        let a = make_vertex(&mut model);
        let b = make_vertex(&mut model);
        let view: View<()> = View::new();

        let mut selection = Selection::new();
        selection.replace_with([a, b]);
        let mut cells: SelectionCellsHandler<(), RecordingHandler> = SelectionCellsHandler::new();
        let mut factory = RecordingFactory { created: 0 };
        cells.refresh(&model, &view, &selection, &mut factory);

        let event = PointerEvent::new(
            diagram_geom::Point::new(0.0, 0.0),
            diagram_geom::Point::new(0.0, 0.0),
            diagram_dispatch::Modifiers::empty(),
            diagram_dispatch::Button::Left,
            diagram_dispatch::Phase::Move,
        );
        cells.process_pointer(&mut model, &event);

        assert_eq!(cells.get(a).unwrap().pointer_events, 1);
        assert_eq!(cells.get(b).unwrap().pointer_events, 1);
    }

    #[test]
    fn clear_destroys_every_handler() {
        let mut model: Model<()> = Model::new();
        let a = make_vertex(&mut model);
        let view: View<()> = View::new();

        let mut selection = Selection::new();
        selection.select_only(a);
        let mut cells: SelectionCellsHandler<(), RecordingHandler> = SelectionCellsHandler::new();
        let mut factory = RecordingFactory { created: 0 };
        cells.refresh(&model, &view, &selection, &mut factory);

        cells.clear();
        assert!(cells.is_empty());
    }
}
