// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational-handle arena and spatial query backend.
//!
//! §9's design notes call for replacing the cyclic cell↔parent/cellState↔view
//! references of a classical OO diagram model with arena storage: the model
//! owns an indexable store of cells and all "references" become stable
//! handles. This crate provides that arena (`Arena<T>`/`Id`) plus a simple
//! spatial backend (`SpatialIndex`) used by the cell marker (F), constraint
//! handler (G), and rubberband selection (I) to resolve "what is under/inside
//! this rectangle" without walking the whole model.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod spatial;

pub use arena::{Arena, Id};
pub use spatial::SpatialIndex;
