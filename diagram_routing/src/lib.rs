// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge routing strategies (component E, §4.3): five pure functions from
//! `(source, target, hints)` to an ordered waypoint list, each operating in
//! scaled coordinates (the orthogonal router does its intermediate math
//! unscaled, multiplying by scale only on emit — see its module doc).
//!
//! Per §9 OQ1 (fixed in `SPEC_FULL.md`): an [`Endpoint`] carrying a
//! recorded absolute point always anchors there in preference to its
//! bounds' center, letting every router treat a connected vertex and a
//! dangling point-only endpoint uniformly.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod elbow;
mod endpoint;
mod entity_relation;
mod loop_router;
mod orth;
mod segment;

pub use elbow::elbow_route;
pub use endpoint::{Endpoint, Hints};
pub use entity_relation::entity_relation_route;
pub use loop_router::loop_route;
pub use orth::{JettyConfig, orth_route};
pub use segment::segment_route;

pub use diagram_geom::Side;

/// Orientation override for the elbow router and tie-break input for
/// several others (§6.1 `elbow` style key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal bend.
    Horizontal,
    /// Vertical bend.
    Vertical,
}
