// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style descriptor resolution (component "Style provider", §6): turns a
//! cell's opaque style string into a typed [`Style`] dictionary over the
//! recognized key table of §6.1.
//!
//! Grounded on the teacher's dependency-property precedence chain
//! (`understory_style`'s `Animation → Local → Style → Theme → Inherited →
//! Default` cascade), collapsed to a single flat resolution step: this
//! engine's style keys are a small closed set read directly off a cell,
//! not an open per-element property registry with cascading selectors, so
//! the cascade and theme layers have no counterpart here.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod provider;
mod style;
mod value;

pub use provider::{MapStyleProvider, StyleProvider};
pub use style::{JettySize, Style};
pub use value::StyleValue;

/// Orientation for the elbow router's style override (§6.1 `elbow`).
///
/// Mirrors `diagram_routing::Orientation`; kept as a separate type here so
/// this crate has no dependency on the routing crate, matching the
/// direction of the workspace's dependency graph (style is consulted by
/// routing, not the reverse).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal bend.
    Horizontal,
    /// Vertical bend.
    Vertical,
}
