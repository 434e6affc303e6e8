// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use diagram_model::{Handle, Model};

use crate::{Change, EventKind};

/// An ordered list of atomic changes with a `significant` flag (§3.4):
/// insignificant edits (e.g. selection-only bookkeeping in a host
/// application) are still dispatched but conventionally skipped by an undo
/// stack that only tracks significant edits.
#[derive(Debug, Default)]
pub struct UndoableEdit<V> {
    changes: Vec<Change<V>>,
    /// Vertices touched by a `Child` change in this edit, used by
    /// `maintain_edge_parent` to find edges that may need reparenting.
    touched_vertices: Vec<Handle>,
    significant: bool,
}

impl<V> UndoableEdit<V> {
    fn new() -> Self {
        Self {
            changes: Vec::new(),
            touched_vertices: Vec::new(),
            significant: false,
        }
    }

    /// The changes recorded so far, in append order.
    #[must_use]
    pub fn changes(&self) -> &[Change<V>] {
        &self.changes
    }

    /// `true` if this edit carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether this edit should be considered undo-worthy by a host
    /// application's undo stack.
    #[must_use]
    pub const fn is_significant(&self) -> bool {
        self.significant
    }

    /// (Re-)applies every change in append order. Since each [`Change`] is
    /// self-inverting, calling this twice on the same edit is a no-op, and
    /// calling it again after that undoes the second application — this is
    /// how undo/redo are both implemented as "apply the edit" (§3.4, §8.1
    /// "Undo round-trip").
    pub fn execute(&mut self, model: &mut Model<V>) {
        for change in &mut self.changes {
            change.execute(model);
        }
    }
}

type Listener<V> = Box<dyn FnMut(EventKind, &UndoableEdit<V>)>;

/// Tracks nested `begin_update`/`end_update` brackets and flushes exactly
/// one [`UndoableEdit`] per outermost bracket (§4.1), dispatching the
/// events of §6.2 to registered listeners in registration order (§5
/// "Listeners on the same event are invoked in registration order").
pub struct Log<V> {
    depth: u32,
    current: UndoableEdit<V>,
    /// The most recently flushed edit, retained so a caller can apply it
    /// to an undo/redo stack after `end_update` returns.
    last_flushed: Option<UndoableEdit<V>>,
    listeners: Vec<Listener<V>>,
    /// Mirrors the source engine's `maintainEdgeParent` switch (§4.1
    /// "Child-change specifics").
    pub maintain_edge_parent: bool,
}

impl<V> core::fmt::Debug for Log<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Log")
            .field("depth", &self.depth)
            .field("pending_changes", &self.current.changes.len())
            .field("last_flushed_changes", &self.last_flushed.as_ref().map(|e| e.changes.len()))
            .field("listeners", &self.listeners.len())
            .field("maintain_edge_parent", &self.maintain_edge_parent)
            .finish()
    }
}

impl<V> Log<V> {
    /// Creates a log at nesting depth 0 with `maintain_edge_parent` off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            depth: 0,
            current: UndoableEdit::new(),
            last_flushed: None,
            listeners: Vec::new(),
            maintain_edge_parent: false,
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// The edit flushed by the most recent outermost `end_update`, if any
    /// mutation has ever completed a bracket. A host undo stack typically
    /// pushes this onto its own history right after `end_update` returns.
    #[must_use]
    pub fn last_flushed(&self) -> Option<&UndoableEdit<V>> {
        self.last_flushed.as_ref()
    }

    /// Registers a listener, invoked for every event in `EventKind` from
    /// now on. Listeners fire in the order they were added (§5).
    pub fn add_listener(&mut self, listener: Listener<V>) {
        self.listeners.push(listener);
    }

    /// Opens an update bracket (§4.1). Emits `BeginUpdate`; on the 0→1
    /// transition also emits `StartEdit`.
    pub fn begin_update(&mut self) {
        self.depth += 1;
        self.dispatch(EventKind::BeginUpdate);
        if self.depth == 1 {
            self.dispatch(EventKind::StartEdit);
        }
    }

    /// Closes an update bracket (§4.1). On the 1→0 transition, flushes the
    /// current edit: emits `EndEdit`, then (if non-empty, after optionally
    /// reparenting touched edges) `BeforeUndo`, `Change`, `Notify`, then
    /// installs a fresh empty edit. `EndUpdate` is always emitted last,
    /// regardless of nesting depth, to pair 1:1 with `begin_update` calls.
    pub fn end_update(&mut self, model: &mut Model<V>) {
        debug_assert!(self.depth > 0, "end_update with no matching begin_update");
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.dispatch(EventKind::EndEdit);
            if !self.current.is_empty() {
                if self.maintain_edge_parent {
                    self.apply_maintain_edge_parent(model);
                }
                self.current.significant = true;
                self.dispatch(EventKind::BeforeUndo);
                self.dispatch(EventKind::Change);
                self.dispatch(EventKind::Notify);
                self.last_flushed = Some(core::mem::replace(&mut self.current, UndoableEdit::new()));
            }
        }
        self.dispatch(EventKind::EndUpdate);
    }

    /// Records and immediately applies a value-change-shaped mutation.
    /// Must be called within a `begin_update`/`end_update` bracket; panics
    /// (debug builds) otherwise, matching §4.1's "mutating operations must
    /// be wrapped in a begin/end bracket."
    pub fn push(&mut self, model: &mut Model<V>, mut change: Change<V>) {
        debug_assert!(self.depth > 0, "mutation outside begin_update/end_update");
        change.execute(model);
        if let Change::Child { cell, .. } = &change {
            self.current.touched_vertices.push(*cell);
        }
        self.current.changes.push(change);
        self.dispatch(EventKind::Executed);
    }

    fn apply_maintain_edge_parent(&mut self, model: &mut Model<V>) {
        let vertices = self.current.touched_vertices.clone();
        for vertex in vertices {
            let Some(cell) = model.get(vertex) else {
                continue;
            };
            let incident: Vec<Handle> = cell.edges().to_vec();
            for edge in incident {
                let Some(edge_cell) = model.get(edge) else {
                    continue;
                };
                let (Some(source), Some(target)) = (edge_cell.source(), edge_cell.target()) else {
                    continue;
                };
                let ancestor = model.nearest_common_ancestor(source, target);
                let current_parent = model.get(edge).and_then(|e| e.parent());
                if current_parent != Some(ancestor) {
                    let index = model.get(ancestor).map_or(0, |a| a.children().len());
                    let (prev_parent, prev_index) = model.swap_child(edge, Some(ancestor), index);
                    self.current.changes.push(Change::Child {
                        cell: edge,
                        parent: prev_parent,
                        index: prev_index,
                    });
                }
            }
        }
    }

    #[cfg(feature = "std")]
    fn dispatch(&mut self, kind: EventKind) {
        let edit = &self.current;
        let mut first_panic: Option<alloc::boxed::Box<dyn core::any::Any + Send>> = None;
        for listener in &mut self.listeners {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(kind, edit);
            }));
            if let Err(payload) = result {
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            std::panic::resume_unwind(payload);
        }
    }

    #[cfg(not(feature = "std"))]
    fn dispatch(&mut self, kind: EventKind) {
        let edit = &self.current;
        for listener in &mut self.listeners {
            listener(kind, edit);
        }
    }
}

impl<V> Default for Log<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use diagram_model::CellRole;

    #[test]
    fn nested_update_emits_one_outer_change_and_notify() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let e = model.create_cell(CellRole::Edge);
        let mut log: Log<()> = Log::new();
        log.begin_update();
        log.push(&mut model, Change::Child { cell: e, parent: Some(root), index: 0 });
        log.end_update(&mut model);

        let change_count = Rc::new(RefCell::new(0u32));
        let notify_count = Rc::new(RefCell::new(0u32));
        {
            let change_count = change_count.clone();
            let notify_count = notify_count.clone();
            log.add_listener(Box::new(move |kind, _edit| match kind {
                EventKind::Change => *change_count.borrow_mut() += 1,
                EventKind::Notify => *notify_count.borrow_mut() += 1,
                _ => {}
            }));
        }

        log.begin_update();
        log.begin_update();
        log.push(&mut model, Change::Style { cell: e, style: Some("b".into()) });
        log.end_update(&mut model);
        log.end_update(&mut model);

        assert_eq!(*change_count.borrow(), 1);
        assert_eq!(*notify_count.borrow(), 1);
    }

    #[test]
    fn undo_redo_round_trip_on_style_change() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let e = model.create_cell(CellRole::Edge);
        let mut log: Log<()> = Log::new();
        log.begin_update();
        log.push(&mut model, Change::Child { cell: e, parent: Some(root), index: 0 });
        log.push(&mut model, Change::Style { cell: e, style: Some("a".into()) });
        log.end_update(&mut model);

        log.begin_update();
        log.push(&mut model, Change::Style { cell: e, style: Some("b".into()) });
        log.end_update(&mut model);

        let mut flushed = log.last_flushed().expect("an edit was flushed").changes().to_vec();
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("b"));
        for change in &mut flushed {
            change.execute(&mut model);
        }
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("a"));
        for change in &mut flushed {
            change.execute(&mut model);
        }
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("b"));
    }

    #[test]
    fn listener_ordering_is_registration_order() {
        let mut model: Model<()> = Model::new();
        let mut log: Log<()> = Log::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let order = order.clone();
            log.add_listener(Box::new(move |kind, _| order.borrow_mut().push((1, kind))));
        }
        {
            let order = order.clone();
            log.add_listener(Box::new(move |kind, _| order.borrow_mut().push((2, kind))));
        }
        log.begin_update();
        log.end_update(&mut model);
        let seen = order.borrow();
        // For every pair of consecutive entries sharing a kind, listener 1
        // must have been invoked before listener 2.
        for pair in seen.chunks(2) {
            assert_eq!(pair[0].0, 1);
            assert_eq!(pair[1].0, 2);
            assert_eq!(pair[0].1, pair[1].1);
        }
    }
}
