// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The model-level event names of §6.2.
///
/// A listener receives the kind plus the edit currently in progress (for
/// the bracket-lifecycle kinds) or just completed (for the flush kinds).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `beginUpdate` was called (every call, not just the outermost).
    BeginUpdate,
    /// Nesting depth transitioned 0→1.
    StartEdit,
    /// A single change finished executing.
    Executed,
    /// Nesting depth is about to transition 1→0.
    EndEdit,
    /// `endUpdate` was called (every call, not just the outermost).
    EndUpdate,
    /// About to publish a non-empty flushed edit, before `Undo`.
    BeforeUndo,
    /// The flushed edit is being (re-)applied as an undo/redo step.
    Undo,
    /// A non-empty edit was flushed.
    Change,
    /// Paired with `Change`; the generic "something happened" signal.
    Notify,
}
