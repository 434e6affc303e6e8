// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection bookkeeping, rubberband drag tracking, and selection-cell
//! coordination (component I, §4.7).
//!
//! Three collaborating pieces:
//!
//! - [`Selection`]: the set-of-keys-plus-primary-plus-anchor-plus-revision
//!   container, grounded directly on the teacher's `understory_selection`
//!   crate (kept generic over any `PartialEq` key rather than copied
//!   verbatim, since this workspace's cells are addressed by
//!   [`diagram_model::Handle`] but the container itself is domain-agnostic).
//! - [`Rubberband`]: tracks a drag rectangle from press to release and
//!   resolves it against a [`diagram_index::SpatialIndex`] (§4.7.1).
//! - [`SelectionCellsHandler`]: diffs a [`Selection`] against a
//!   cell→handler dictionary each refresh, destroying stale handlers,
//!   constructing new ones through a host-supplied
//!   [`SelectionCellHandler`] factory, and fanning out pointer events to
//!   every retained handler (§4.7.2).
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cells;
mod rubberband;
mod selection;

pub use cells::{SelectionCellFactory, SelectionCellHandler, SelectionCellsHandler};
pub use rubberband::Rubberband;
pub use selection::Selection;
