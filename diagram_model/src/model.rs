// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use diagram_index::Arena;
use hashbrown::HashMap;

use crate::{Cell, CellFlags, CellRole, Geometry, Handle};

/// The cell tree plus its id dictionary.
///
/// Grounded on the teacher's arena/handle pattern
/// (`understory_box_tree::types::NodeId`) generalized here to an
/// explicitly typed `Cell<V>` store, and on the ancestor-walk helper of
/// `understory_property::object` (`ParentLookup`/`walk_inherited`) for the
/// parent-chain traversal `nearest_common_ancestor` needs.
///
/// Read accessors are pure. Mutation goes through the `swap_*` family,
/// which are the slot-swap primitives an atomic change in
/// `diagram_transaction` calls from its self-inverting `execute` (§3.4):
/// each returns the previous value so the caller can store it and swap
/// back on the next `execute`.
#[derive(Debug)]
pub struct Model<V> {
    arena: Arena<Cell<V>>,
    root: Handle,
    id_lookup: HashMap<String, Handle>,
    next_id: u64,
    /// Incident-edge disconnections performed on removal, to be restored
    /// verbatim on re-insertion (§4.1 "Child-change specifics").
    detached_terminals: HashMap<Handle, Vec<(Handle, bool)>>,
}

impl<V> Model<V> {
    /// Creates a model containing only a detached root cell.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Cell::new(CellRole::Neither));
        Self {
            arena,
            root,
            id_lookup: HashMap::new(),
            next_id: 0,
            detached_terminals: HashMap::new(),
        }
    }

    /// The model's root handle. Never removed; `swap_root` may replace the
    /// cell's identity but the model always has a root.
    #[must_use]
    pub const fn root(&self) -> Handle {
        self.root
    }

    /// Creates a new, detached cell and returns its handle. Use
    /// `swap_child` (typically via an atomic change) to attach it.
    pub fn create_cell(&mut self, role: CellRole) -> Handle {
        self.arena.insert(Cell::new(role))
    }

    /// Borrows a cell by handle.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Cell<V>> {
        self.arena.get(handle)
    }

    /// `true` if `handle` is reachable from the root by following parent
    /// links (§3.1: "a cell is reachable from the root iff it is
    /// considered 'in' the model").
    #[must_use]
    pub fn is_in_model(&self, handle: Handle) -> bool {
        if handle == self.root {
            return true;
        }
        let mut cur = handle;
        loop {
            let Some(cell) = self.arena.get(cur) else {
                return false;
            };
            match cell.parent {
                Some(p) if p == self.root => return true,
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Looks up a cell currently in the model by its user-facing id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<Handle> {
        self.id_lookup.get(id).copied()
    }

    /// The sequence of child-indices from the root to `handle` (§4.1
    /// "nearest-common-ancestor"), or an empty vector if `handle` is the
    /// root or unreachable.
    #[must_use]
    pub fn path_key(&self, handle: Handle) -> Vec<u32> {
        let mut key = Vec::new();
        let mut cur = handle;
        while let Some(cell) = self.arena.get(cur) {
            let Some(parent) = cell.parent else { break };
            let Some(parent_cell) = self.arena.get(parent) else {
                break;
            };
            let index = parent_cell
                .children
                .iter()
                .position(|&c| c == cur)
                .unwrap_or(0);
            key.push(index as u32);
            cur = parent;
        }
        key.reverse();
        key
    }

    /// The nearest common ancestor of `a` and `b`, by walking both
    /// ancestor chains from the root down and taking the last handle they
    /// agree on (equivalent to comparing `path_key` prefixes, but avoids
    /// reconstructing a handle from a bare index sequence).
    #[must_use]
    pub fn nearest_common_ancestor(&self, a: Handle, b: Handle) -> Handle {
        let chain_a = self.ancestor_chain(a);
        let chain_b = self.ancestor_chain(b);
        let mut common = self.root;
        for (x, y) in chain_a.iter().zip(chain_b.iter()) {
            if x == y {
                common = *x;
            } else {
                break;
            }
        }
        common
    }

    fn ancestor_chain(&self, handle: Handle) -> Vec<Handle> {
        let mut chain = Vec::new();
        let mut cur = Some(handle);
        while let Some(h) = cur {
            chain.push(h);
            cur = self.arena.get(h).and_then(|c| c.parent);
        }
        chain.reverse();
        chain
    }

    /// Swaps this cell's opaque value, returning the previous one.
    pub fn swap_value(&mut self, handle: Handle, value: Option<V>) -> Option<V> {
        self.arena
            .get_mut(handle)
            .map_or(None, |cell| core::mem::replace(&mut cell.value, value))
    }

    /// Swaps this cell's style string, returning the previous one.
    pub fn swap_style(&mut self, handle: Handle, style: Option<String>) -> Option<String> {
        self.arena
            .get_mut(handle)
            .map_or(None, |cell| core::mem::replace(&mut cell.style, style))
    }

    /// Swaps this cell's geometry, returning the previous one.
    pub fn swap_geometry(&mut self, handle: Handle, geometry: Option<Geometry>) -> Option<Geometry> {
        self.arena
            .get_mut(handle)
            .map_or(None, |cell| core::mem::replace(&mut cell.geometry, geometry))
    }

    /// Swaps this cell's visibility flag, returning the previous value.
    pub fn swap_visible(&mut self, handle: Handle, visible: bool) -> bool {
        self.swap_flag(handle, CellFlags::VISIBLE, visible)
    }

    /// Swaps this cell's collapsed flag, returning the previous value.
    pub fn swap_collapsed(&mut self, handle: Handle, collapsed: bool) -> bool {
        self.swap_flag(handle, CellFlags::COLLAPSED, collapsed)
    }

    /// Swaps this cell's connectable flag, returning the previous value.
    pub fn swap_connectable(&mut self, handle: Handle, connectable: bool) -> bool {
        self.swap_flag(handle, CellFlags::CONNECTABLE, connectable)
    }

    fn swap_flag(&mut self, handle: Handle, flag: CellFlags, value: bool) -> bool {
        let Some(cell) = self.arena.get_mut(handle) else {
            return false;
        };
        let previous = cell.flags.contains(flag);
        cell.flags.set(flag, value);
        previous
    }

    /// Swaps one terminal of an edge cell, returning the previous terminal
    /// and keeping each vertex's incident-edge set consistent (§3.1: "if it
    /// is an edge its id appears in each endpoint's incident-edge set iff
    /// the endpoint is non-null").
    pub fn swap_terminal(&mut self, edge: Handle, source: bool, terminal: Option<Handle>) -> Option<Handle> {
        let previous = self.arena.get(edge).and_then(|c| c.terminal(source));
        if previous == terminal {
            return previous;
        }
        if let Some(old) = previous {
            if let Some(old_cell) = self.arena.get_mut(old) {
                old_cell.edges.retain(|&e| e != edge);
            }
        }
        if let Some(new) = terminal {
            if let Some(new_cell) = self.arena.get_mut(new) {
                if !new_cell.edges.contains(&edge) {
                    new_cell.edges.push(edge);
                }
            }
        }
        if let Some(cell) = self.arena.get_mut(edge) {
            if source {
                cell.source = terminal;
            } else {
                cell.target = terminal;
            }
        }
        previous
    }

    /// Replaces the model's root, returning the previous root.
    pub fn swap_root(&mut self, new_root: Handle) -> Handle {
        core::mem::replace(&mut self.root, new_root)
    }

    /// Moves `cell` to be a child of `new_parent` at `index` (or detaches
    /// it if `new_parent` is `None`), returning the previous `(parent,
    /// index)`. This is the atomic primitive behind a `ChildChange`
    /// (§3.4, §4.1): on a transition out of the model it disconnects
    /// incident edges (remembering them for restoration); on a transition
    /// into the model it mints an id if absent and restores any
    /// previously disconnected edges.
    pub fn swap_child(
        &mut self,
        cell: Handle,
        new_parent: Option<Handle>,
        index: usize,
    ) -> (Option<Handle>, usize) {
        let old_parent = self.arena.get(cell).and_then(|c| c.parent);
        let old_index = old_parent
            .and_then(|p| {
                self.arena
                    .get(p)
                    .and_then(|pc| pc.children.iter().position(|&c| c == cell))
            })
            .unwrap_or(0);

        if let Some(op) = old_parent {
            if let Some(pc) = self.arena.get_mut(op) {
                pc.children.retain(|&c| c != cell);
            }
        }

        let was_in_model = old_parent.is_some_and(|p| self.is_in_model(p)) || cell == self.root;
        let will_be_in_model = new_parent.is_some_and(|p| self.is_in_model(p) || p == self.root);

        if was_in_model && !will_be_in_model {
            self.disconnect_subtree(cell);
        }

        if let Some(c) = self.arena.get_mut(cell) {
            c.parent = new_parent;
        }
        if let Some(np) = new_parent {
            if let Some(npc) = self.arena.get_mut(np) {
                let idx = index.min(npc.children.len());
                npc.children.insert(idx, cell);
            }
        }

        if !was_in_model && will_be_in_model {
            self.mint_id_if_absent(cell);
            self.reconnect_subtree(cell);
        }

        (old_parent, old_index)
    }

    fn mint_id_if_absent(&mut self, handle: Handle) {
        let needs_mint = match self.arena.get(handle).and_then(|c| c.id.as_ref()) {
            None => true,
            Some(existing) => self.id_lookup.get(existing).is_some_and(|h| *h != handle),
        };
        let id = if needs_mint {
            loop {
                let candidate = self.next_id.to_string();
                self.next_id += 1;
                if !self.id_lookup.contains_key(&candidate) {
                    break candidate;
                }
            }
        } else {
            self.arena
                .get(handle)
                .and_then(|c| c.id.clone())
                .unwrap_or_default()
        };
        if let Some(cell) = self.arena.get_mut(handle) {
            cell.id = Some(id.clone());
        }
        self.id_lookup.insert(id, handle);
    }

    fn release_id(&mut self, handle: Handle) {
        if let Some(id) = self.arena.get(handle).and_then(|c| c.id.clone()) {
            if self.id_lookup.get(&id) == Some(&handle) {
                self.id_lookup.remove(&id);
            }
        }
    }

    fn disconnect_subtree(&mut self, root: Handle) {
        let mut stack = alloc::vec![root];
        while let Some(handle) = stack.pop() {
            self.release_id(handle);
            if let Some(cell) = self.arena.get(handle) {
                stack.extend(cell.children.iter().copied());
                let incident: Vec<Handle> = cell.edges.clone();
                for edge in incident {
                    let is_source = self.arena.get(edge).and_then(|e| e.source) == Some(handle);
                    let is_target = self.arena.get(edge).and_then(|e| e.target) == Some(handle);
                    if is_source {
                        if let Some(e) = self.arena.get_mut(edge) {
                            e.source = None;
                        }
                        self.detached_terminals.entry(handle).or_default().push((edge, true));
                    }
                    if is_target {
                        if let Some(e) = self.arena.get_mut(edge) {
                            e.target = None;
                        }
                        self.detached_terminals.entry(handle).or_default().push((edge, false));
                    }
                }
                if let Some(cell) = self.arena.get_mut(handle) {
                    cell.edges.clear();
                }
            }
        }
    }

    fn reconnect_subtree(&mut self, root: Handle) {
        let mut stack = alloc::vec![root];
        while let Some(handle) = stack.pop() {
            if let Some(cell) = self.arena.get(handle) {
                stack.extend(cell.children.iter().copied());
            }
            if let Some(restored) = self.detached_terminals.remove(&handle) {
                for (edge, is_source) in restored {
                    if let Some(e) = self.arena.get_mut(edge) {
                        if is_source {
                            e.source = Some(handle);
                        } else {
                            e.target = Some(handle);
                        }
                    }
                    if let Some(cell) = self.arena.get_mut(handle) {
                        if !cell.edges.contains(&edge) {
                            cell.edges.push(edge);
                        }
                    }
                }
            }
        }
    }
}

impl<V> Default for Model<V> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
impl<V> Model<V> {
    fn arena_set_id_for_test(&mut self, handle: Handle, id: String) {
        if let Some(cell) = self.arena.get_mut(handle) {
            cell.id = Some(id);
        }
    }
}
