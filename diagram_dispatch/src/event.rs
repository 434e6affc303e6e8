// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

/// The graph/handler event names of §6.2, distinct from the model-level
/// names owned by `diagram_transaction`'s `EventKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphEventKind {
    /// A connection gesture started.
    Start,
    /// A connection gesture committed a new edge.
    Connect,
    /// A handler's gesture was cancelled.
    Reset,
    /// A cell's marker state changed.
    Mark,
    /// A preview or overlay node was shown.
    Show,
    /// A preview or overlay node was hidden.
    Hide,
    /// A gesture was aborted via escape.
    Escape,
    /// A raw pointer event was forwarded without further interpretation.
    FireMouseEvent,
    /// The view was panned.
    Pan,
    /// A multi-touch gesture was recognized.
    Gesture,
    /// The view's scale changed.
    Scale,
    /// The view's translate changed.
    Translate,
    /// The view's scale and translate changed together.
    ScaleAndTranslate,
    /// A pointer press was observed.
    Down,
    /// A pointer release was observed.
    Up,
    /// The view was reset to its root state.
    Root,
}

type Listener<P> = Box<dyn FnMut(GraphEventKind, &P)>;

/// Ordered dispatch of [`GraphEventKind`] events to registered listeners
/// (§5 "Listeners on the same event are invoked in registration order"),
/// generic over the payload type `P` carried with each event.
///
/// Mirrors `diagram_transaction::Log`'s dispatch loop exactly: with the
/// `std` feature, a panicking listener does not prevent later listeners
/// from running for the same event, and the first captured panic is
/// re-raised only after every listener has had its turn (§7 "Listener
/// failure").
pub struct GraphDispatcher<P> {
    listeners: Vec<Listener<P>>,
}

impl<P> core::fmt::Debug for GraphDispatcher<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GraphDispatcher").field("listeners", &self.listeners.len()).finish()
    }
}

impl<P> GraphDispatcher<P> {
    /// Creates a dispatcher with no registered listeners.
    #[must_use]
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    /// Registers a listener, invoked for every event dispatched from now
    /// on. Listeners fire in the order they were added.
    pub fn add_listener(&mut self, listener: Listener<P>) {
        self.listeners.push(listener);
    }

    /// The number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// `true` if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Dispatches `kind` with `payload` to every listener in registration
    /// order.
    #[cfg(feature = "std")]
    pub fn dispatch(&mut self, kind: GraphEventKind, payload: &P) {
        let mut first_panic: Option<alloc::boxed::Box<dyn core::any::Any + Send>> = None;
        for listener in &mut self.listeners {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(kind, payload);
            }));
            if let Err(payload) = result {
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            std::panic::resume_unwind(payload);
        }
    }

    /// Dispatches `kind` with `payload` to every listener in registration
    /// order.
    #[cfg(not(feature = "std"))]
    pub fn dispatch(&mut self, kind: GraphEventKind, payload: &P) {
        for listener in &mut self.listeners {
            listener(kind, payload);
        }
    }
}

impl<P> Default for GraphDispatcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn listener_ordering_is_registration_order() {
        let mut dispatcher: GraphDispatcher<()> = GraphDispatcher::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let order = order.clone();
            dispatcher.add_listener(Box::new(move |kind, _: &()| order.borrow_mut().push((1, kind))));
        }
        {
            let order = order.clone();
            dispatcher.add_listener(Box::new(move |kind, _: &()| order.borrow_mut().push((2, kind))));
        }
        dispatcher.dispatch(GraphEventKind::Mark, &());
        assert_eq!(*order.borrow(), vec![(1, GraphEventKind::Mark), (2, GraphEventKind::Mark)]);
    }

    #[test]
    #[cfg(feature = "std")]
    fn a_panicking_listener_does_not_stop_the_others() {
        let mut dispatcher: GraphDispatcher<()> = GraphDispatcher::new();
        let ran = Rc::new(RefCell::new(false));
        dispatcher.add_listener(Box::new(|_kind, _: &()| panic!("boom")));
        {
            let ran = ran.clone();
            dispatcher.add_listener(Box::new(move |_kind, _: &()| *ran.borrow_mut() = true));
        }
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dispatcher.dispatch(GraphEventKind::Reset, &());
        }));
        assert!(result.is_err());
        assert!(*ran.borrow());
    }
}
