// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

/// Classification of a target point relative to a source center, used by
/// the orthogonal router (§4.3.5 step 4) to rotate its pattern table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    /// Target is to the north-east of the source.
    NorthEast,
    /// Target is to the south-east of the source.
    SouthEast,
    /// Target is to the south-west of the source.
    SouthWest,
    /// Target is to the north-west of the source.
    NorthWest,
}

impl Quadrant {
    /// Classifies `target` relative to `source_center`.
    ///
    /// Ties (equal x or y) resolve toward east/south, matching the router's
    /// need for a total order over all point pairs including coincident
    /// centers.
    #[must_use]
    pub fn classify(source_center: Point, target: Point) -> Self {
        let east = target.x >= source_center.x;
        let south = target.y >= source_center.y;
        match (east, south) {
            (true, false) => Self::NorthEast,
            (true, true) => Self::SouthEast,
            (false, true) => Self::SouthWest,
            (false, false) => Self::NorthWest,
        }
    }

    /// The 0..4 rotation index used to index into the router's pattern
    /// table, in the order `NorthEast, SouthEast, SouthWest, NorthWest`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::NorthEast => 0,
            Self::SouthEast => 1,
            Self::SouthWest => 2,
            Self::NorthWest => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_quadrant() {
        let c = Point::new(0.0, 0.0);
        assert_eq!(Quadrant::classify(c, Point::new(10.0, -10.0)), Quadrant::NorthEast);
        assert_eq!(Quadrant::classify(c, Point::new(10.0, 10.0)), Quadrant::SouthEast);
        assert_eq!(Quadrant::classify(c, Point::new(-10.0, 10.0)), Quadrant::SouthWest);
        assert_eq!(Quadrant::classify(c, Point::new(-10.0, -10.0)), Quadrant::NorthWest);
    }

    #[test]
    fn coincident_center_resolves_south_east() {
        let c = Point::new(5.0, 5.0);
        assert_eq!(Quadrant::classify(c, c), Quadrant::SouthEast);
    }
}
