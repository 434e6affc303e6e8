// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle sides and side masks, used by port constraints (§6.1
//! `portConstraint`) and the orthogonal router's quadrant/pattern tables.

bitflags::bitflags! {
    /// The sides of a rectangle available as orthogonal exit/entry points.
    ///
    /// Mirrors the four-bit port-constraint mask of the original engine:
    /// a vertex style can restrict which sides an edge may leave from.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Side: u8 {
        /// West (left) side.
        const WEST = 0b0001;
        /// North (top) side.
        const NORTH = 0b0010;
        /// East (right) side.
        const EAST = 0b0100;
        /// South (bottom) side.
        const SOUTH = 0b1000;
    }
}

impl Default for Side {
    /// All four sides are available unless a style constrains them.
    fn default() -> Self {
        Self::all()
    }
}

impl Side {
    /// Returns the side directly opposite `self`'s single bit, or `self`
    /// unchanged if more than one bit (or none) is set.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::WEST => Self::EAST,
            Self::EAST => Self::WEST,
            Self::NORTH => Self::SOUTH,
            Self::SOUTH => Self::NORTH,
            other => other,
        }
    }

    /// `true` if this side is horizontal (west/east).
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        self.contains(Self::WEST) || self.contains(Self::EAST)
    }

    /// `true` if this side is vertical (north/south).
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        self.contains(Self::NORTH) || self.contains(Self::SOUTH)
    }
}
