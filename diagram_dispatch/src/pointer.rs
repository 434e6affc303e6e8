// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diagram_geom::Point;

bitflags::bitflags! {
    /// Modifier keys held during a pointer gesture (§6 "Pointer source").
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT = 0b0010;
        /// Ctrl key.
        const CTRL = 0b0100;
        /// Meta/Cmd/Windows key.
        const META = 0b1000;
    }
}

/// Which pointer button produced the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Primary (left) button.
    Left,
    /// Middle button.
    Middle,
    /// Secondary (right) button.
    Right,
    /// Any other button, identified by its platform index.
    Other(u16),
}

/// The three phases of a single pointer gesture (§6 "press/move/release").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The pointer went down.
    Press,
    /// The pointer moved while tracked.
    Move,
    /// The pointer went up.
    Release,
}

/// A single pointer event, as emitted by the host's pointer source (§6
/// "Pointer source").
///
/// `consumed` is the single monotonic flag of §5 "Ordering guarantees":
/// any handler may set it via [`PointerEvent::consume`], and every
/// handler downstream in the same dispatch still runs and can observe it
/// via [`PointerEvent::is_consumed`] — consuming does not stop dispatch,
/// it only asks later handlers to decline further action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position in client (viewport-relative) coordinates.
    pub client: Point,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Modifier keys held during this event.
    pub modifiers: Modifiers,
    /// The button associated with this event.
    pub button: Button,
    /// Which phase of the gesture this event represents.
    pub phase: Phase,
    /// `true` if this event is part of a multi-touch gesture, which
    /// suppresses single-pointer handlers (§6 "Multi-touch events must be
    /// distinguishable").
    pub multi_touch: bool,
    consumed: bool,
}

impl PointerEvent {
    /// Creates a new, unconsumed pointer event.
    #[must_use]
    pub const fn new(client: Point, screen: Point, modifiers: Modifiers, button: Button, phase: Phase) -> Self {
        Self { client, screen, modifiers, button, phase, multi_touch: false, consumed: false }
    }

    /// Marks this gesture as consumed; the preventDefault-equivalent of
    /// §6 "an explicit 'consume' method".
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// `true` if an earlier handler in this dispatch has already consumed
    /// the event.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_sticky_and_observable() {
        let mut event = PointerEvent::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Modifiers::empty(),
            Button::Left,
            Phase::Press,
        );
        assert!(!event.is_consumed());
        event.consume();
        assert!(event.is_consumed());
    }

    #[test]
    fn modifiers_combine_as_bits() {
        let m = Modifiers::SHIFT | Modifiers::ALT;
        assert!(m.contains(Modifiers::SHIFT));
        assert!(m.contains(Modifiers::ALT));
        assert!(!m.contains(Modifiers::CTRL));
    }
}
