// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Geometry, Handle};

/// A cell's structural role (§3.1): exactly one of vertex, edge, or neither
/// (a group or the root).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    /// Can have incident edges and geometric bounds.
    Vertex,
    /// Has a source and target terminal reference, routed between them.
    Edge,
    /// A group or the root: neither a vertex nor an edge.
    Neither,
}

bitflags::bitflags! {
    /// Boolean attributes of a cell (§3.1), excluding the structural role.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        /// Edges may be created ending (or starting) at this cell.
        const CONNECTABLE = 0b0001;
        /// Participates in layout/paint; invisible cells are skipped by the
        /// view (§3.3) and excluded from hit testing.
        const VISIBLE = 0b0010;
        /// Rendered using `alternate_bounds` and hides its children.
        const COLLAPSED = 0b0100;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::CONNECTABLE | Self::VISIBLE
    }
}

/// A node in the cell tree (§3.1).
///
/// `V` is the opaque user value type; the model never interprets it.
#[derive(Clone, Debug)]
pub struct Cell<V> {
    /// User-facing identifier. `None` until first attached to the model
    /// (§3.1 lifecycle: "id assigned on first attachment if absent").
    pub id: Option<String>,
    /// Opaque user payload.
    pub value: Option<V>,
    /// Relative geometry, if any.
    pub geometry: Option<Geometry>,
    /// Opaque style descriptor, resolved by a style provider (§6).
    pub style: Option<String>,
    pub(crate) role: CellRole,
    pub(crate) flags: CellFlags,
    pub(crate) parent: Option<Handle>,
    pub(crate) children: Vec<Handle>,
    pub(crate) edges: Vec<Handle>,
    pub(crate) source: Option<Handle>,
    pub(crate) target: Option<Handle>,
}

impl<V> Cell<V> {
    pub(crate) fn new(role: CellRole) -> Self {
        Self {
            id: None,
            value: None,
            geometry: None,
            style: None,
            role,
            flags: CellFlags::default(),
            parent: None,
            children: Vec::new(),
            edges: Vec::new(),
            source: None,
            target: None,
        }
    }

    /// This cell's structural role.
    #[must_use]
    pub const fn role(&self) -> CellRole {
        self.role
    }

    /// `true` if this cell is a vertex.
    #[must_use]
    pub const fn is_vertex(&self) -> bool {
        matches!(self.role, CellRole::Vertex)
    }

    /// `true` if this cell is an edge.
    #[must_use]
    pub const fn is_edge(&self) -> bool {
        matches!(self.role, CellRole::Edge)
    }

    /// This cell's current flags.
    #[must_use]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    /// `true` if edges may connect to this cell.
    #[must_use]
    pub const fn is_connectable(&self) -> bool {
        self.flags.contains(CellFlags::CONNECTABLE)
    }

    /// `true` if this cell participates in layout/paint.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.flags.contains(CellFlags::VISIBLE)
    }

    /// `true` if this cell is collapsed.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.flags.contains(CellFlags::COLLAPSED)
    }

    /// This cell's parent, or `None` if detached or the root.
    #[must_use]
    pub const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Incident edges (unordered, per §3.1).
    #[must_use]
    pub fn edges(&self) -> &[Handle] {
        &self.edges
    }

    /// Source terminal, for an edge.
    #[must_use]
    pub const fn source(&self) -> Option<Handle> {
        self.source
    }

    /// Target terminal, for an edge.
    #[must_use]
    pub const fn target(&self) -> Option<Handle> {
        self.target
    }

    /// The terminal at `source` end if `source` is `true`, else the target.
    #[must_use]
    pub const fn terminal(&self, source: bool) -> Option<Handle> {
        if source { self.source } else { self.target }
    }
}
