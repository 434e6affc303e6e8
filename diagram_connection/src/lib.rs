// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connection-gesture state machine (component H, §4.6) — the interaction
//! core that turns a pointer gesture into exactly one well-formed new
//! edge, with live preview, validation, waypoint capture, optional
//! target-vertex creation, and clean rollback on abort.
//!
//! [`ConnectionHandler`] owns the state machine of §4.6's table (`Idle` →
//! `Hover` → `Arming` → `Previewing` → `Committing` → `Idle`, with a
//! `Previewing`/waypoint-mode sub-state folded into [`Phase::Previewing`]'s
//! `waypoints` list rather than a separate enum case, since the two only
//! differ in whether the next click extends the list or commits). It does
//! not own a [`Marker`](diagram_marker) or [`ConstraintHandler`]; the host
//! calls those first and feeds their results in through [`MoveInput`],
//! matching this workspace's existing capability-injection shape
//! (`diagram_marker::MarkerPolicy`, `diagram_constraint::ConstraintSource`)
//! rather than this crate depending on `diagram_marker` for a type it only
//! ever treats as "some vertex handle".
//!
//! Grounded on the teacher's `understory_event_state::drag::DragState`
//! (start/update/total-offset tolerance tracking) for the press→drag
//! transition, generalized from a bare position delta to the full
//! hover/arm/preview/commit machinery §4.6 calls for.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::marker::PhantomData;

use diagram_constraint::ConstraintState;
use diagram_dispatch::Modifiers;
use diagram_geom::{Fractional, Point};
use diagram_model::{CellRole, Geometry, Handle, Model};
use diagram_routing::{Endpoint, JettyConfig, orth_route};
use diagram_transaction::{Change, Log};
use diagram_view::View;

/// Tolerance, grid, and target-creation configuration for a
/// [`ConnectionHandler`] (§4.6).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionOptions {
    /// Pixel distance from the press point a pointer must travel before
    /// `Arming` transitions to `Previewing` (§4.6 "move past tolerance").
    pub tolerance: f64,
    /// Whether pointer positions are snapped to a grid before use.
    pub grid_enabled: bool,
    /// Grid cell size, in pixels, used when `grid_enabled`.
    pub grid_size: f64,
    /// Whether releasing over empty space invokes the create-target
    /// factory instead of rejecting the gesture (§4.6 "Commit").
    pub create_target: bool,
    /// Distance, in pixels, within which a newly created target vertex
    /// snaps to the source's position (§4.6 "alignment snap if within
    /// tolerance of the source's position").
    pub align_tolerance: f64,
    /// Half-width, in pixels, of the orthogonal router's buffer unit used
    /// when re-routing the live preview (§4.3.5 step 2).
    pub orth_buffer: f64,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            tolerance: 4.0,
            grid_enabled: false,
            grid_size: 10.0,
            create_target: false,
            align_tolerance: 4.0,
            orth_buffer: 10.0,
        }
    }
}

/// The connection handler's current state (§4.6's state table, with the
/// waypoint sub-state folded into `Previewing`'s own data: see the crate
/// doc comment).
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    /// No gesture in progress.
    Idle,
    /// The pointer is over a connectable source but has not been pressed.
    Hover {
        /// The candidate source vertex.
        source: Handle,
    },
    /// The pointer was pressed on `source` (or a connect-icon) and has not
    /// yet moved past [`ConnectionOptions::tolerance`].
    Arming {
        /// The candidate source vertex.
        source: Handle,
        /// The press point.
        press: Point,
    },
    /// A live preview is being dragged from `source`.
    Previewing {
        /// The source vertex the new edge will start from.
        source: Handle,
        /// The connection point on `source`'s bounds, if one was selected
        /// via the constraint handler when the gesture started.
        source_constraint: Option<Fractional>,
        /// User-placed waypoints accumulated via waypoint-mode clicks, in
        /// absolute (view) coordinates.
        waypoints: Vec<Point>,
    },
}

/// Per-move input the host gathers from the marker (§4.4) and constraint
/// handler (§4.5) before calling [`ConnectionHandler::process_move`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveInput {
    /// The raw pointer position, before grid snap or axis projection.
    pub point: Point,
    /// Modifier keys held during this move.
    pub modifiers: Modifiers,
    /// The cell the marker currently reports under the pointer, if any
    /// (§4.6 step 4 "otherwise use the marker's valid state").
    pub marked: Option<Handle>,
    /// Whether the marker reports `marked` as a valid drop target.
    pub marked_valid: bool,
    /// The constraint handler's current selection, if any (§4.6 step 4
    /// "if the constraint handler reports a focus+constraint, take its
    /// `currentPoint` and `currentConstraint`").
    pub constraint: Option<ConstraintState>,
}

/// The live preview polyline and its validity coloring (§4.6 step 7).
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewState {
    /// `[sourceTerminal, ...waypoints, currentTarget]`, in absolute (view)
    /// coordinates.
    pub points: Vec<Point>,
    /// `true` if the preview should be drawn in the valid color.
    pub valid: bool,
}

/// The resolved terminal an in-progress gesture is currently aimed at.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Target {
    point: Point,
    cell: Option<Handle>,
    constraint: Option<Fractional>,
}

/// Result of [`ConnectionHandler::process_move`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MoveResult {
    /// `true` if this call transitioned `Arming` into `Previewing` (§4.6
    /// "Transitions publish events": fire the `start` event).
    pub started: bool,
}

/// Outcome of [`ConnectionHandler::commit`] (§7's "validation error ...
/// never thrown" and "invalid-state rejection ... no user notification",
/// expressed as data rather than a `Result`).
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectOutcome {
    /// A new edge was created and wired; the gesture returned to `Idle`.
    Committed {
        /// The newly created edge.
        edge: Handle,
    },
    /// The connection was rejected. An empty `reason` is §7's "invalid-state
    /// rejection" (no user notification); a non-empty one is a "validation
    /// error" the host should show as an alert.
    Rejected {
        /// Empty for a silent rejection, non-empty for a user-facing one.
        reason: String,
    },
    /// `commit` was called while no gesture was in a committable state;
    /// a no-op.
    Aborted,
}

/// Capabilities a host supplies for edge creation and validation (§4.6),
/// mirroring `diagram_marker::MarkerPolicy`'s injection shape. The blanket
/// `()` impl creates a bare [`CellRole::Edge`] cell, never rejects a
/// connection, and never auto-creates a target vertex.
pub trait ConnectionPolicy<V> {
    /// Returns `None` to allow the connection, `Some("")` to reject it
    /// silently, or `Some(reason)` to reject it with a message the host
    /// should show the user (§7 "Validation error").
    fn validate_connection(&self, model: &Model<V>, source: Handle, target: Option<Handle>) -> Option<String>;

    /// Creates the new edge cell. Called inside the commit transaction,
    /// before terminals are wired.
    fn create_edge(&mut self, model: &mut Model<V>) -> Handle {
        model.create_cell(CellRole::Edge)
    }

    /// Creates a new vertex cloned from `source`, positioned at `at`, when
    /// [`ConnectionOptions::create_target`] is enabled and the gesture was
    /// released over empty space. Returning `None` rejects the gesture
    /// (§4.6 "if target is null and create-target is enabled, invoke the
    /// factory").
    fn create_target_vertex(&mut self, _model: &mut Model<V>, _source: Handle, _at: Point) -> Option<Handle> {
        None
    }
}

impl<V> ConnectionPolicy<V> for () {
    fn validate_connection(&self, _model: &Model<V>, _source: Handle, _target: Option<Handle>) -> Option<String> {
        None
    }
}

/// Drives the connection gesture state machine (§4.6).
pub struct ConnectionHandler<V> {
    options: ConnectionOptions,
    phase: Phase,
    preview: Option<PreviewState>,
    _model: PhantomData<fn() -> V>,
}

impl<V> core::fmt::Debug for ConnectionHandler<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConnectionHandler")
            .field("options", &self.options)
            .field("phase", &self.phase)
            .field("preview", &self.preview)
            .finish()
    }
}

impl<V> ConnectionHandler<V> {
    /// Creates an idle handler with the given configuration.
    #[must_use]
    pub const fn new(options: ConnectionOptions) -> Self {
        Self { options, phase: Phase::Idle, preview: None, _model: PhantomData }
    }

    /// The handler's current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// `true` if a gesture has progressed far enough to show a preview.
    #[must_use]
    pub const fn is_previewing(&self) -> bool {
        matches!(self.phase, Phase::Previewing { .. })
    }

    /// The current preview polyline, if one is being shown.
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewState> {
        self.preview.as_ref()
    }

    /// Enters or leaves `Hover` while idle (§4.6 "Hover(source) ... Idle
    /// (leaves)"). A no-op once a gesture has progressed past `Hover`.
    pub fn hover(&mut self, marked: Option<Handle>) {
        if matches!(self.phase, Phase::Idle | Phase::Hover { .. }) {
            self.phase = match marked {
                Some(source) => Phase::Hover { source },
                None => Phase::Idle,
            };
        }
    }

    /// Presses on `source` (or a connect-icon for it), arming the gesture
    /// (§4.6 "Arming ... press on source (or on a connect-icon)").
    pub fn press(&mut self, source: Handle, at: Point) {
        self.phase = Phase::Arming { source, press: at };
    }

    /// Adds a waypoint to the in-progress preview and remains `Previewing`
    /// (§4.6 "waypoint-mode click, not on a stop-event"). A no-op outside
    /// `Previewing`.
    pub fn add_waypoint(&mut self, point: Point) {
        if let Phase::Previewing { waypoints, .. } = &mut self.phase {
            waypoints.push(point);
        }
    }

    /// Processes one pointer move (§4.6's per-move hot path, steps 1–7,
    /// minus steps 3 which the host performs by calling the marker and
    /// constraint handler before building [`MoveInput`]).
    pub fn process_move(&mut self, view: &View<V>, input: MoveInput) -> MoveResult {
        let mut result = MoveResult::default();
        let mut point = input.point;
        if self.options.grid_enabled {
            point = snap_to_grid(point, self.options.grid_size);
        }

        let source = match self.phase {
            Phase::Arming { source, .. } | Phase::Previewing { source, .. } => Some(source),
            _ => None,
        };
        if input.modifiers.contains(Modifiers::SHIFT) {
            if let Some(anchor) = source.and_then(|s| view.get(s)).map(|s| s.bounds().center()) {
                point = project_to_axis(anchor, point);
            }
        }

        if let Phase::Arming { source, press } = self.phase {
            if point.distance(press) > self.options.tolerance {
                self.phase = Phase::Previewing { source, source_constraint: None, waypoints: Vec::new() };
                result.started = true;
            }
        }

        if let Phase::Previewing { source, source_constraint, waypoints } = &mut self.phase {
            if source_constraint.is_none() {
                *source_constraint = input.constraint.filter(|c| c.focus == *source).map(|c| c.constraint);
            }
            let target = resolve_target(&input, point);
            let valid = match target.cell {
                Some(_) if input.constraint.is_none() => input.marked_valid,
                _ => true,
            };
            self.preview = build_preview(view, *source, *source_constraint, waypoints, target, self.options.orth_buffer)
                .map(|mut preview| {
                    preview.valid = valid;
                    preview
                });
        }

        result
    }

    /// Cancels any in-progress gesture, returning the handler to idle
    /// (§4.6 "Reset", §5 "Cancellation"). Safe to call from any phase,
    /// including repeatedly while already idle. Returns `true` if there
    /// was anything to discard, so a host can decide whether to emit the
    /// `reset` event (§6.2).
    pub fn reset(&mut self) -> bool {
        let had_state = !matches!(self.phase, Phase::Idle) || self.preview.is_some();
        self.phase = Phase::Idle;
        self.preview = None;
        had_state
    }

    /// Commits the in-progress preview as a new edge (§4.6 "Commit").
    ///
    /// `target`/`target_constraint` are the resolved drop target, as last
    /// reported to [`Self::process_move`] (or supplied directly by a host
    /// that skips per-move preview tracking in a test harness).
    pub fn commit<P: ConnectionPolicy<V>>(
        &mut self,
        model: &mut Model<V>,
        log: &mut Log<V>,
        policy: &mut P,
        target: Option<Handle>,
        target_constraint: Option<Fractional>,
        release_point: Point,
    ) -> ConnectOutcome {
        let Phase::Previewing { source, source_constraint, waypoints } = core::mem::replace(&mut self.phase, Phase::Idle) else {
            return ConnectOutcome::Aborted;
        };
        self.preview = None;

        let target = match target {
            Some(t) => Some(t),
            None if self.options.create_target => {
                let at = snap_if_close(model, source, release_point, self.options.align_tolerance);
                match policy.create_target_vertex(model, source, at) {
                    Some(v) => Some(v),
                    None => return ConnectOutcome::Rejected { reason: String::new() },
                }
            }
            None => None,
        };

        if target == Some(source) && source_constraint == target_constraint {
            return ConnectOutcome::Rejected { reason: String::new() };
        }

        if let Some(reason) = policy.validate_connection(model, source, target) {
            return ConnectOutcome::Rejected { reason };
        }

        log.begin_update();
        let edge = policy.create_edge(model);
        log.push(model, Change::Terminal { edge, source: true, terminal: Some(source) });
        log.push(model, Change::Terminal { edge, source: false, terminal: target });

        let mut geometry = Geometry::edge();
        geometry.points = waypoints;
        if target.is_none() {
            geometry.target_point = Some(release_point);
        }
        log.push(model, Change::Geometry { cell: edge, geometry: Some(geometry) });

        let parent = match target {
            Some(t) => model.nearest_common_ancestor(source, t),
            None => model.get(source).and_then(|c| c.parent()).unwrap_or(model.root()),
        };
        let index = model.get(parent).map_or(0, |c| c.children().len());
        log.push(model, Change::Child { cell: edge, parent: Some(parent), index });

        log.end_update(model);

        ConnectOutcome::Committed { edge }
    }
}

impl<V> Default for ConnectionHandler<V> {
    fn default() -> Self {
        Self::new(ConnectionOptions::default())
    }
}

/// Outline-connect activation predicate (§9 OQ3, fixed in `SPEC_FULL.md`):
/// outline mode activates when alt is held, or shift is held with no fixed
/// constraint active, or the pointer hit-tests the hovered state's outline
/// specifically.
#[must_use]
pub fn outline_connect_active(modifiers: Modifiers, constraint_active: bool, hit_outline: bool) -> bool {
    modifiers.contains(Modifiers::ALT) || (modifiers.contains(Modifiers::SHIFT) && !constraint_active) || hit_outline
}

fn resolve_target(input: &MoveInput, point: Point) -> Target {
    match &input.constraint {
        Some(c) => Target { point: c.point, cell: Some(c.focus), constraint: Some(c.constraint) },
        None => match input.marked {
            Some(cell) => Target { point, cell: Some(cell), constraint: None },
            None => Target { point, cell: None, constraint: None },
        },
    }
}

fn build_preview<V>(
    view: &View<V>,
    source: Handle,
    source_constraint: Option<Fractional>,
    waypoints: &[Point],
    target: Target,
    orth_buffer: f64,
) -> Option<PreviewState> {
    let source_state = view.get(source)?;
    let mut source_endpoint = Endpoint::vertex(source_state.bounds());
    source_endpoint.rotation = source_state.rotation;
    if let Some(fraction) = source_constraint {
        source_endpoint.recorded_point = Some(fraction.resolve(source_state.bounds()));
    }

    let target_endpoint = match target.cell.and_then(|cell| view.get(cell)) {
        Some(state) => {
            let mut endpoint = Endpoint::vertex(state.bounds());
            endpoint.rotation = state.rotation;
            if let Some(fraction) = target.constraint {
                endpoint.recorded_point = Some(fraction.resolve(state.bounds()));
            } else {
                endpoint.recorded_point = Some(target.point);
            }
            endpoint
        }
        None => Endpoint::dangling(target.point),
    };

    let hints: Vec<Point> = waypoints.to_vec();
    let jetty = JettyConfig { buffer: orth_buffer, ..JettyConfig::default() };
    let points = orth_route(&source_endpoint, &target_endpoint, 1.0, jetty, &hints);
    Some(PreviewState { points, valid: true })
}

fn snap_to_grid(point: Point, size: f64) -> Point {
    if size <= 0.0 {
        return point;
    }
    Point::new((point.x / size).round() * size, (point.y / size).round() * size)
}

fn project_to_axis(anchor: Point, point: Point) -> Point {
    if (point.x - anchor.x).abs() >= (point.y - anchor.y).abs() {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}

fn snap_if_close<V>(model: &Model<V>, source: Handle, point: Point, tolerance: f64) -> Point {
    let Some(bounds) = model.get(source).and_then(|c| c.geometry.as_ref()).map(Geometry::bounds) else {
        return point;
    };
    let center = bounds.center();
    if center.distance(point) <= tolerance { center } else { point }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_style::MapStyleProvider;

    fn attach<W>(model: &mut Model<W>, parent: Handle, cell: Handle) {
        let len = model.get(parent).map_or(0, |c| c.children().len());
        model.swap_child(cell, Some(parent), len);
    }

    fn make_vertex(model: &mut Model<()>, parent: Handle, x: f64, y: f64, w: f64, h: f64) -> Handle {
        let v = model.create_cell(CellRole::Vertex);
        attach(model, parent, v);
        model.swap_geometry(v, Some(Geometry::vertex(x, y, w, h)));
        v
    }

    #[test]
    fn press_then_small_move_stays_arming() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);
        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, source);

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        handler.press(source, Point::new(20.0, 20.0));
        let result = handler.process_move(
            &view,
            MoveInput { point: Point::new(21.0, 20.0), modifiers: Modifiers::empty(), marked: None, marked_valid: false, constraint: None },
        );
        assert!(!result.started);
        assert!(matches!(handler.phase(), Phase::Arming { .. }));
    }

    #[test]
    fn move_past_tolerance_starts_previewing() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);
        let target = make_vertex(&mut model, root, 200.0, 0.0, 40.0, 40.0);
        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, source);
        view.validate(&model, &styles, target);

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        handler.press(source, Point::new(20.0, 20.0));
        let result = handler.process_move(
            &view,
            MoveInput {
                point: Point::new(220.0, 20.0),
                modifiers: Modifiers::empty(),
                marked: Some(target),
                marked_valid: true,
                constraint: None,
            },
        );
        assert!(result.started);
        assert!(handler.is_previewing());
        assert!(handler.preview().is_some());
    }

    #[test]
    fn commit_onto_invalid_target_is_rejected_and_leaves_no_transaction() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);
        let target = make_vertex(&mut model, root, 200.0, 0.0, 40.0, 40.0);
        model.swap_connectable(target, false);

        struct RejectLocked;
        impl ConnectionPolicy<()> for RejectLocked {
            fn validate_connection(&self, model: &Model<()>, _source: Handle, target: Option<Handle>) -> Option<String> {
                match target {
                    Some(t) if !model.get(t).is_some_and(|c| c.is_connectable()) => Some(String::new()),
                    _ => None,
                }
            }
        }

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        handler.press(source, Point::new(20.0, 20.0));
        handler.phase = Phase::Previewing { source, source_constraint: None, waypoints: Vec::new() };

        let mut log: Log<()> = Log::new();
        let outcome = handler.commit(&mut model, &mut log, &mut RejectLocked, Some(target), None, Point::new(220.0, 20.0));
        assert_eq!(outcome, ConnectOutcome::Rejected { reason: String::new() });
        assert!(matches!(handler.phase(), Phase::Idle));
        assert!(log.last_flushed().is_none());
    }

    #[test]
    fn commit_creates_edge_wired_to_both_terminals() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);
        let target = make_vertex(&mut model, root, 200.0, 0.0, 40.0, 40.0);

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        handler.press(source, Point::new(20.0, 20.0));
        handler.phase = Phase::Previewing { source, source_constraint: None, waypoints: Vec::new() };

        let mut log: Log<()> = Log::new();
        let outcome = handler.commit(&mut model, &mut log, &mut (), Some(target), None, Point::new(220.0, 20.0));
        let ConnectOutcome::Committed { edge } = outcome else {
            panic!("expected Committed");
        };
        assert_eq!(model.get(edge).unwrap().source(), Some(source));
        assert_eq!(model.get(edge).unwrap().target(), Some(target));
        assert!(matches!(handler.phase(), Phase::Idle));
    }

    #[test]
    fn no_op_edge_same_source_and_target_constraint_is_rejected() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        handler.phase = Phase::Previewing {
            source,
            source_constraint: Some(Fractional::new(1.0, 0.5)),
            waypoints: Vec::new(),
        };
        let mut log: Log<()> = Log::new();
        let outcome = handler.commit(
            &mut model,
            &mut log,
            &mut (),
            Some(source),
            Some(Fractional::new(1.0, 0.5)),
            Point::new(40.0, 20.0),
        );
        assert_eq!(outcome, ConnectOutcome::Rejected { reason: String::new() });
    }

    #[test]
    fn reset_clears_preview_and_reports_whether_anything_changed() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = make_vertex(&mut model, root, 0.0, 0.0, 40.0, 40.0);

        let mut handler: ConnectionHandler<()> = ConnectionHandler::default();
        assert!(!handler.reset());
        handler.press(source, Point::new(0.0, 0.0));
        assert!(handler.reset());
        assert!(matches!(handler.phase(), Phase::Idle));
    }

    #[test]
    fn outline_connect_predicate_matches_each_disjunct() {
        assert!(outline_connect_active(Modifiers::ALT, true, false));
        assert!(outline_connect_active(Modifiers::SHIFT, false, false));
        assert!(!outline_connect_active(Modifiers::SHIFT, true, false));
        assert!(outline_connect_active(Modifiers::empty(), false, true));
        assert!(!outline_connect_active(Modifiers::empty(), false, false));
    }
}
