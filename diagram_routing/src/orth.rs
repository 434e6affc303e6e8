// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use diagram_geom::{Point, Quadrant, Rect, Side};

use crate::{Endpoint, Hints};

/// Jetty-size inputs for [`orth_route`] (§4.3.5 step 2): an explicit
/// per-endpoint override, or a default derived from `buffer` (two buffer
/// widths, rounded up to a buffer multiple).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JettyConfig {
    /// Explicit jetty length for the source endpoint, if styled.
    pub source: Option<f64>,
    /// Explicit jetty length for the target endpoint, if styled.
    pub target: Option<f64>,
    /// The orthogonal buffer unit jetties are rounded to.
    pub buffer: f64,
}

impl Default for JettyConfig {
    fn default() -> Self {
        Self { source: None, target: None, buffer: 10.0 }
    }
}

fn jetty_size(explicit: Option<f64>, buffer: f64) -> f64 {
    let minimum = buffer * 2.0;
    let base = explicit.unwrap_or(minimum).max(minimum);
    (base / buffer).ceil() * buffer
}

/// One wall of a cell's bounding box, classified by which axis crossing it
/// advances and whether it's the wall the quadrant rotation expects this
/// endpoint to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Whether an endpoint's chosen exit/entry side is the one the rotated
/// quadrant prefers (`Toward`, facing the other endpoint) or its opposite
/// (`Away`, forced there by a port constraint, requiring a hook around the
/// endpoint's own box rather than a direct cut across it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lane {
    Toward,
    Away,
}

/// A single bend in the pattern table, decoded from the packed
/// `{direction, terminal, limit, center}` step encoding (§4.3.5 step 5) into
/// a named axis plus how this bend's coordinate on that axis is resolved.
#[derive(Clone, Copy, Debug)]
struct Step {
    axis: Axis,
    resolve: Resolve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolve {
    /// The `center` bit: bridge to the midpoint between the jettied anchors.
    Center,
    /// The `terminal` bit: snap to the jettied target anchor's coordinate.
    Terminal,
    /// A `limit` step that clears the source cell's bounds with a hook,
    /// used only when the source lane is `Away`.
    LimitSource,
    /// A `limit` step that clears the target cell's bounds with a hook,
    /// used only when the target lane is `Away`.
    LimitTarget,
}

/// The quadrant-rotated table of preferred (horizontal, vertical) exit
/// sides for the source and entry sides for the target, indexed by
/// [`Quadrant::index`]. This is the literal 4-row table the router rotates
/// by quadrant before picking a side (§4.3.5 step 4); [`Quadrant::index`]'s
/// own doc comment promises it indexes the router's pattern table, and this
/// is that table.
const QUADRANT_SIDES: [(Side, Side, Side, Side); 4] = [
    (Side::EAST, Side::NORTH, Side::WEST, Side::SOUTH),
    (Side::EAST, Side::SOUTH, Side::WEST, Side::NORTH),
    (Side::WEST, Side::SOUTH, Side::EAST, Side::NORTH),
    (Side::WEST, Side::NORTH, Side::EAST, Side::SOUTH),
];

fn quadrant_sides(quadrant: Quadrant) -> (Side, Side, Side, Side) {
    QUADRANT_SIDES[quadrant.index()]
}

/// Picks `horizontal` if the port-constraint mask allows it, else
/// `vertical`, else either side's opposite if the mask restricts the
/// endpoint to facing away from the other one, else falls back to
/// `horizontal` so the router always makes progress rather than stalling on
/// an over-constrained mask (§4.3.5 step 3).
fn pick_side(horizontal: Side, vertical: Side, mask: Side) -> Side {
    for candidate in [horizontal, vertical, horizontal.opposite(), vertical.opposite()] {
        if mask.contains(candidate) {
            return candidate;
        }
    }
    horizontal
}

/// Classifies `side` (one of an endpoint's chosen exit/entry sides) against
/// the quadrant-preferred pair for that endpoint, yielding the axis it
/// travels along and whether it faces the other endpoint or away from it.
fn classify_lane(side: Side, preferred_h: Side, preferred_v: Side) -> (Axis, Lane) {
    if side.is_horizontal() {
        (Axis::Horizontal, if side == preferred_h { Lane::Toward } else { Lane::Away })
    } else {
        (Axis::Vertical, if side == preferred_v { Lane::Toward } else { Lane::Away })
    }
}

/// The four "both endpoints face each other" shapes (§4.3.5 step 6): a
/// single bend when the endpoints travel on different axes, or a bridge
/// through the shared midpoint followed by a snap to the terminal's
/// coordinate when they travel on the same axis.
fn direct_steps(source_axis: Axis, target_axis: Axis) -> Vec<Step> {
    match (source_axis, target_axis) {
        (Axis::Horizontal, Axis::Horizontal) => alloc::vec![
            Step { axis: Axis::Horizontal, resolve: Resolve::Center },
            Step { axis: Axis::Vertical, resolve: Resolve::Terminal },
        ],
        (Axis::Vertical, Axis::Vertical) => alloc::vec![
            Step { axis: Axis::Vertical, resolve: Resolve::Center },
            Step { axis: Axis::Horizontal, resolve: Resolve::Terminal },
        ],
        (Axis::Horizontal, Axis::Vertical) => alloc::vec![Step { axis: Axis::Horizontal, resolve: Resolve::Terminal }],
        (Axis::Vertical, Axis::Horizontal) => alloc::vec![Step { axis: Axis::Vertical, resolve: Resolve::Terminal }],
    }
}

/// The quadrant-rotated 4×4 operation table (§4.3.5 step 5): sixteen cells
/// keyed by the source and target exit directions' axis/lane
/// classification. Each cell composes from the four direct shapes above,
/// with a clearing step prepended (for the source) or appended (for the
/// target) whenever that endpoint's wall was forced to face away from the
/// other one, so a constrained port or an overlapping vertex produces a
/// genuine hook around the obstructing box instead of a path that cuts
/// through it.
fn pattern(source_axis: Axis, source_lane: Lane, target_axis: Axis, target_lane: Lane) -> Vec<Step> {
    let mut steps = Vec::new();
    if source_lane == Lane::Away {
        steps.push(Step { axis: source_axis.cross(), resolve: Resolve::LimitSource });
    }
    steps.extend(direct_steps(source_axis, target_axis));
    if target_lane == Lane::Away {
        steps.push(Step { axis: target_axis.cross(), resolve: Resolve::LimitTarget });
    }
    steps
}

/// Executes the decoded pattern table (§4.3.5 step 6) as a walk from the
/// jettied source anchor, producing one waypoint per step whose resolved
/// coordinate differs from the walk's current position.
fn walk(start: Point, steps: &[Step], mid: Point, terminal: Point, source_bounds: Rect, target_bounds: Rect, hook: f64) -> Vec<Point> {
    let mut path = Vec::with_capacity(steps.len());
    let mut current = start;
    for step in steps {
        let next = resolve(current, *step, mid, terminal, source_bounds, target_bounds, hook);
        if next != current {
            path.push(next);
        }
        current = next;
    }
    path
}

fn resolve(point: Point, step: Step, mid: Point, terminal: Point, source_bounds: Rect, target_bounds: Rect, hook: f64) -> Point {
    match step.axis {
        Axis::Horizontal => {
            let x = match step.resolve {
                Resolve::Center => mid.x,
                Resolve::Terminal => terminal.x,
                Resolve::LimitSource => clear_x(source_bounds, point, hook),
                Resolve::LimitTarget => clear_x(target_bounds, point, hook),
            };
            Point::new(x, point.y)
        }
        Axis::Vertical => {
            let y = match step.resolve {
                Resolve::Center => mid.y,
                Resolve::Terminal => terminal.y,
                Resolve::LimitSource => clear_y(source_bounds, point, hook),
                Resolve::LimitTarget => clear_y(target_bounds, point, hook),
            };
            Point::new(point.x, y)
        }
    }
}

/// The nearer (by `reference`) horizontal edge of `bounds`, pushed out by
/// `hook` so a path crossing at this coordinate clears the box entirely.
fn clear_x(bounds: Rect, reference: Point, hook: f64) -> f64 {
    let mid_x = bounds.x0 + bounds.width() / 2.0;
    if reference.x <= mid_x { bounds.x0 - hook } else { bounds.x1 + hook }
}

/// The nearer (by `reference`) vertical edge of `bounds`, pushed out by
/// `hook` so a path crossing at this coordinate clears the box entirely.
fn clear_y(bounds: Rect, reference: Point, hook: f64) -> f64 {
    let mid_y = bounds.y0 + bounds.height() / 2.0;
    if reference.y <= mid_y { bounds.y0 - hook } else { bounds.y1 + hook }
}

/// Routes an edge using the fully automatic orthogonal strategy
/// (OrthConnector, §4.3.5).
///
/// Operates entirely in unscaled coordinates — `source`, `target`, and
/// `jetty` are all unscaled — multiplying every emitted point by `scale`
/// only at the very end, matching the source algorithm's "all intermediate
/// math is unscaled" rule. Short-circuits to [`segment_route`](crate::segment_route)
/// when the endpoints are within their combined jetty buffer, when hints
/// are supplied, or when either endpoint is itself an edge cell. Otherwise
/// the interior path comes from decoding and walking the quadrant-rotated
/// pattern table (§4.3.5 steps 4-6).
#[must_use]
pub fn orth_route(source: &Endpoint, target: &Endpoint, scale: f64, jetty: JettyConfig, hints: &Hints) -> Vec<Point> {
    let source_jetty = jetty_size(jetty.source, jetty.buffer);
    let target_jetty = jetty_size(jetty.target, jetty.buffer);

    let source_bounds = source.effective_bounds();
    let target_bounds = target.effective_bounds();
    let source_mask = source.port_constraint.unwrap_or_default();
    let target_mask = target.port_constraint.unwrap_or_default();

    let source_center = center(source_bounds);
    let target_center = center(target_bounds);
    let quadrant = Quadrant::classify(source_center, target_center);
    let (preferred_source_h, preferred_source_v, preferred_target_h, preferred_target_v) = quadrant_sides(quadrant);
    let source_side = pick_side(preferred_source_h, preferred_source_v, source_mask);
    let target_side = pick_side(preferred_target_h, preferred_target_v, target_mask);

    let exit = side_midpoint(source_bounds, source_side);
    let entry = side_midpoint(target_bounds, target_side);

    if source.is_edge
        || target.is_edge
        || !hints.is_empty()
        || exit.distance(entry) <= source_jetty + target_jetty
    {
        return crate::segment::segment_route(source, target, hints)
            .into_iter()
            .map(|p| Point::new(p.x * scale, p.y * scale))
            .collect();
    }

    let (source_axis, source_lane) = classify_lane(source_side, preferred_source_h, preferred_source_v);
    let (target_axis, target_lane) = classify_lane(target_side, preferred_target_h, preferred_target_v);

    if source_axis == target_axis && source_lane == Lane::Toward && target_lane == Lane::Toward {
        let aligned = match source_axis {
            Axis::Horizontal => (exit.y - entry.y).abs() < f64::EPSILON,
            Axis::Vertical => (exit.x - entry.x).abs() < f64::EPSILON,
        };
        if aligned {
            return alloc::vec![exit, entry].into_iter().map(|p| Point::new(p.x * scale, p.y * scale)).collect();
        }
    }

    let exit_j = jetty_point(exit, source_side, source_jetty);
    let entry_j = jetty_point(entry, target_side, target_jetty);
    let mid = Point::new((exit_j.x + entry_j.x) / 2.0, (exit_j.y + entry_j.y) / 2.0);
    let hook = source_jetty.max(target_jetty);

    let steps = pattern(source_axis, source_lane, target_axis, target_lane);
    let interior = walk(exit_j, &steps, mid, entry_j, source_bounds, target_bounds, hook);

    let mut path = alloc::vec![exit, exit_j];
    path.extend(interior);
    path.push(entry_j);
    path.push(entry);
    path.dedup();

    path.into_iter().map(|p| Point::new(p.x * scale, p.y * scale)).collect()
}

fn center(bounds: Rect) -> Point {
    Point::new(bounds.x0 + bounds.width() / 2.0, bounds.y0 + bounds.height() / 2.0)
}

fn side_midpoint(bounds: Rect, side: Side) -> Point {
    let c = center(bounds);
    match side {
        Side::WEST => Point::new(bounds.x0, c.y),
        Side::EAST => Point::new(bounds.x1, c.y),
        Side::NORTH => Point::new(c.x, bounds.y0),
        Side::SOUTH => Point::new(c.x, bounds.y1),
        _ => c,
    }
}

fn jetty_point(anchor: Point, side: Side, jetty: f64) -> Point {
    match side {
        Side::WEST => Point::new(anchor.x - jetty, anchor.y),
        Side::EAST => Point::new(anchor.x + jetty, anchor.y),
        Side::NORTH => Point::new(anchor.x, anchor.y - jetty),
        Side::SOUTH => Point::new(anchor.x, anchor.y + jetty),
        _ => anchor,
    }
}
