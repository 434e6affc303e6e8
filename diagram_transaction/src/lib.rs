// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atomic reversible changes, nested update brackets and ordered event
//! dispatch (component C, §3.4 and §4.1).
//!
//! A [`Change`] stores the slot it targets and the value to install;
//! `execute` swaps that value with the model's current one, so calling it
//! twice is a no-op and calling it a third time inverts the second call —
//! undo/redo without a separate inverse table (§3.4). An [`UndoableEdit`]
//! is an ordered list of changes; a [`Log`] tracks the nesting depth of
//! `begin_update`/`end_update` brackets and flushes exactly one edit per
//! outermost bracket (§4.1).
//!
//! Ordering and listener-failure semantics are grounded on the teacher's
//! `understory_responder::dispatcher::run` (invoke-all-in-registration-order,
//! `Outcome`-driven continuation) generalized here to `diagram_transaction`'s
//! own flat listener list rather than a capture/target/bubble chain (that
//! chain belongs to `diagram_dispatch`, which handles *pointer* events, not
//! model events).
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`. With the `std` feature enabled,
//! a listener that panics does not prevent other listeners for the same
//! event from running (§7 "Listener failure"); without it, a panicking
//! listener aborts dispatch immediately, same as any other `no_std` panic.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod change;
mod event;
mod log;

pub use change::Change;
pub use event::EventKind;
pub use log::{Log, UndoableEdit};
