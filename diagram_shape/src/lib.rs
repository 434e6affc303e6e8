// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable shape abstraction and the rendering-surface contract
//! (component K, §6): recorded draw paths, a tagged-variant shape type
//! replacing the source's `Shape` inheritance tree, and the
//! [`RenderingSurface`] trait the engine core consumes from its host.
//!
//! Grounded on `understory_imaging`'s backend-agnostic imaging IR
//! (`ImagingOp`/`StateOp`/`DrawOp`/`PathCmd`) for the path/paint
//! vocabulary, and `understory_precise_hit::stroke::StrokedLine` for the
//! polyline stroke hit test.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod path;
mod shape;
mod surface;

pub use path::{Path, PathCommand};
pub use shape::{Shape, ShapeKind};
pub use surface::{Layer, NodeId, RenderingSurface};
