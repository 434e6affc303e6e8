// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::PointerEvent;

/// Something that reacts to pointer events in the graph's handler stack
/// (§4.6, §4.7: the connection and selection-cells handlers).
///
/// A handler is free to call [`PointerEvent::consume`] and to inspect
/// [`PointerEvent::is_consumed`] to decline acting on a gesture another
/// handler already claimed, but it must still be given the chance to run
/// — the handler stack does not short-circuit on consumption (§5
/// "'consumed' is a single monotonic flag visible to subsequent
/// handlers").
pub trait PointerHandler {
    /// Reacts to a pointer event, possibly consuming it.
    fn handle(&mut self, event: &mut PointerEvent);

    /// Cancels any in-progress gesture, returning the handler to idle
    /// (§5 "Cancellation"). Must tolerate being called mid-preview,
    /// mid-commit, or when already idle.
    fn reset(&mut self);
}

/// An ordered list of [`PointerHandler`]s (§4.7 "Pointer events are
/// fanned out to every handler in turn").
///
/// Handlers are invoked in registration order on every dispatched event,
/// matching the model-event ordering guarantee of §5.
#[derive(Default)]
pub struct HandlerStack {
    handlers: Vec<Box<dyn PointerHandler>>,
}

impl core::fmt::Debug for HandlerStack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerStack").field("handlers", &self.handlers.len()).finish()
    }
}

impl HandlerStack {
    /// Creates an empty handler stack.
    #[must_use]
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Appends a handler to the end of the stack.
    pub fn push(&mut self, handler: Box<dyn PointerHandler>) {
        self.handlers.push(handler);
    }

    /// The number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatches `event` to every handler in registration order. Every
    /// handler runs regardless of whether an earlier one consumed the
    /// event.
    pub fn dispatch(&mut self, event: &mut PointerEvent) {
        for handler in &mut self.handlers {
            handler.handle(event);
        }
    }

    /// Calls [`PointerHandler::reset`] on every registered handler, in
    /// registration order.
    pub fn reset_all(&mut self) {
        for handler in &mut self.handlers {
            handler.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Button, Modifiers, Phase};
    use alloc::vec;
    use diagram_geom::Point;

    struct Recorder {
        seen: alloc::rc::Rc<core::cell::RefCell<Vec<&'static str>>>,
        name: &'static str,
        consume: bool,
    }

    impl PointerHandler for Recorder {
        fn handle(&mut self, event: &mut PointerEvent) {
            self.seen.borrow_mut().push(self.name);
            if self.consume {
                event.consume();
            }
        }

        fn reset(&mut self) {
            self.seen.borrow_mut().push("reset");
        }
    }

    #[test]
    fn all_handlers_run_even_after_consumption() {
        let seen = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut stack = HandlerStack::new();
        stack.push(Box::new(Recorder { seen: seen.clone(), name: "first", consume: true }));
        stack.push(Box::new(Recorder { seen: seen.clone(), name: "second", consume: false }));

        let mut event = PointerEvent::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Modifiers::empty(),
            Button::Left,
            Phase::Press,
        );
        stack.dispatch(&mut event);

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        assert!(event.is_consumed());
    }

    #[test]
    fn reset_all_visits_every_handler_in_order() {
        let seen = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut stack = HandlerStack::new();
        stack.push(Box::new(Recorder { seen: seen.clone(), name: "first", consume: false }));
        stack.push(Box::new(Recorder { seen: seen.clone(), name: "second", consume: false }));
        stack.reset_all();
        assert_eq!(*seen.borrow(), vec!["reset", "reset"]);
    }
}
