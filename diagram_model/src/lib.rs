// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cell tree: vertices, edges, groups and the root, plus their geometry.
//!
//! This is component B of the engine (§3.1–§3.2, §4.1): an ordered tree of
//! cells with opaque user values, optional geometry, an opaque style string,
//! a flag set, and (for edges) source/target terminal references.
//!
//! Per §9's design notes, the cyclic `cell ↔ parent`/`cell ↔ edge`
//! references of a classical OO model are resolved with arena storage: the
//! model owns an indexable store of cells ([`diagram_index::Arena`]) and
//! every "reference" is a stable [`Handle`]. Read operations here are pure;
//! the raw slot-swap primitives (`swap_*`) are the targets atomic changes in
//! `diagram_transaction` operate on — this crate has no undo/transaction
//! logic of its own, matching §4.1's "read operations are pure; mutating
//! operations must route through the transaction log."
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod geometry;
mod model;

pub use cell::{Cell, CellFlags, CellRole};
pub use diagram_index::Id as Handle;
pub use geometry::Geometry;
pub use model::Model;
