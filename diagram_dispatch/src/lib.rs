// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-event envelope, handler stack and named graph-event dispatch
//! (component J, §6 "Pointer source" and §6.2 "Event names emitted").
//!
//! [`PointerEvent`] is the dispatcher-facing envelope the host's pointer
//! source is expected to produce; [`HandlerStack`] fans it out to a
//! graph's registered [`PointerHandler`]s in registration order without
//! short-circuiting on consumption (§5). [`GraphDispatcher`] carries the
//! separate flat vocabulary of §6.2's "Graph/handlers" event names
//! (`start`, `connect`, `reset`, `mark`, ...) to listeners, independent
//! of the model-level events owned by `diagram_transaction`.
//!
//! Both dispatch loops are grounded on the teacher's
//! `understory_responder::dispatcher::run`, simplified here from its
//! capture/target/bubble `Outcome` chain to the flat, registration-order
//! lists the spec actually calls for: the pointer handler stack never
//! stops early (consumption is advisory, not control flow), and the
//! named-event dispatcher is a direct sibling of
//! `diagram_transaction::Log`'s own listener loop.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`. With the `std` feature
//! enabled, a listener that panics during [`GraphDispatcher::dispatch`]
//! does not prevent other listeners for the same event from running (§7
//! "Listener failure"); without it, a panicking listener aborts dispatch
//! immediately, same as any other `no_std` panic.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod event;
mod handler;
mod pointer;

pub use event::{GraphDispatcher, GraphEventKind};
pub use handler::{HandlerStack, PointerHandler};
pub use pointer::{Button, Modifiers, Phase, PointerEvent};
