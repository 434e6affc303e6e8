// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell-to-`CellState` view derivation (component D, §4.2): absolute
//! geometry, edge routing dispatch, and lazy invalidation.
//!
//! [`View`] owns the cell → [`CellState`] cache plus the global
//! [`ViewTransform`]. It does not own a [`Model`]; every entry point takes
//! the model and a [`StyleProvider`] by reference, so a host can keep the
//! model itself under its own transaction log (`diagram_transaction`)
//! without the view crate depending on it.
//!
//! Validation follows §4.2's five steps: return a cached, valid state if
//! one exists; otherwise validate the parent first (geometry composes);
//! compute absolute origin (proportional for a relative vertex); for an
//! edge, resolve visible source/target states by walking up through
//! relative ancestors, dispatch to the edge-style router named by
//! `style.edge()` (§6.1 `edge` key) and clip the endpoints to each
//! terminal's perimeter; finally derive terminal distance, segment
//! lengths, bounding box and label offset.
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod state;
mod transform;

pub use state::{CellState, InvalidFlags};
pub use transform::ViewTransform;

use alloc::vec::Vec;
use diagram_geom::{Fractional, Point, Rect, Vec2};
use diagram_model::{Handle, Model};
use diagram_routing::{
    Endpoint, Hints, JettyConfig, Orientation as RouteOrientation, Side, elbow_route,
    entity_relation_route, loop_route, orth_route, segment_route,
};
use diagram_shape::Shape;
use diagram_style::{JettySize, Orientation as StyleOrientation, Style, StyleProvider};
use hashbrown::HashMap;

/// Default segment length (§6.1 `segment`) when a style omits it, shared by
/// the entity-relation and loop routers.
const DEFAULT_SEGMENT: f64 = 30.0;
/// Default arrow marker half-length used to derive an "auto" jetty size
/// (§6.1 `startSize`/`endSize`) when a style gives neither an explicit
/// jetty nor an arrow size.
const DEFAULT_ARROW_SIZE: f64 = 6.0;
/// The orthogonal router's buffer unit (§4.3.5 step 2), in unscaled pixels.
const ORTH_BUFFER: f64 = 10.0;

/// The view: a cell → [`CellState`] cache plus the global scale/translate
/// (§4.2 "The view maintains a mapping from cell → `CellState` plus a
/// global scale and translate").
///
/// `V` is the model's opaque user-value type; `View<V>` carries no data of
/// that type itself (it never reads a cell's `value`), so the parameter
/// only exists to pin a `View` to the `Model<V>` it's meant to validate
/// against.
pub struct View<V> {
    transform: ViewTransform,
    states: HashMap<Handle, CellState>,
    _model: core::marker::PhantomData<fn() -> V>,
}

impl<V> core::fmt::Debug for View<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("View")
            .field("transform", &self.transform)
            .field("cached_states", &self.states.len())
            .finish()
    }
}

impl<V> View<V> {
    /// Creates a view at the identity transform with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: ViewTransform::identity(),
            states: HashMap::new(),
            _model: core::marker::PhantomData,
        }
    }

    /// The current scale/translate.
    #[must_use]
    pub const fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Sets the global scale, invalidating every cached state if it
    /// actually changed (§3.3 "invalidated on ... scale/translate change").
    pub fn set_scale(&mut self, scale: f64) {
        if self.transform.set_scale(scale) {
            self.invalidate_all();
        }
    }

    /// Sets the global translate, invalidating every cached state if it
    /// actually changed.
    pub fn set_translate(&mut self, translate: Vec2) {
        if self.transform.set_translate(translate) {
            self.invalidate_all();
        }
    }

    /// A previously validated state, if one is cached and currently valid.
    /// Does not trigger validation; call [`Self::validate`] first.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&CellState> {
        self.states.get(&handle).filter(|s| s.invalid.is_empty())
    }

    /// Validates `handle` (and, transitively, its ancestors and routed
    /// terminals) against `model`/`styles`, then returns the resulting
    /// state. Returns `None` if `handle` is unreachable, invisible, or
    /// absent from `model` (§3.3: "a state is cached iff its cell is
    /// visible and reachable").
    pub fn validate(
        &mut self,
        model: &Model<V>,
        styles: &dyn StyleProvider,
        handle: Handle,
    ) -> Option<&CellState> {
        self.ensure_valid(model, styles, handle);
        self.get(handle)
    }

    /// Marks `handle`'s cached state invalid, along with every descendant
    /// (whose absolute geometry composes through it) and every cached edge
    /// state whose visible source or target is `handle` or one of those
    /// descendants (§4.2 "Invalidation is monotonic").
    ///
    /// A cell that has become unreachable or invisible has its cached
    /// state (and its descendants') dropped outright rather than marked
    /// invalid, matching §3.3's destruction lifecycle.
    pub fn invalidate(&mut self, model: &Model<V>, handle: Handle) {
        let mut touched: Vec<Handle> = Vec::new();
        let mut stack = alloc::vec![handle];
        while let Some(h) = stack.pop() {
            touched.push(h);
            let reachable = model
                .get(h)
                .is_some_and(|cell| cell.is_visible() && model.is_in_model(h));
            if reachable {
                if let Some(state) = self.states.get_mut(&h) {
                    state.invalid |= InvalidFlags::LAYOUT | InvalidFlags::STYLE;
                }
            } else {
                self.states.remove(&h);
            }
            if let Some(cell) = model.get(h) {
                stack.extend(cell.children().iter().copied());
            }
        }
        let affected_edges: Vec<Handle> = self
            .states
            .iter()
            .filter(|(_, st)| {
                st.visible_source.is_some_and(|h| touched.contains(&h))
                    || st.visible_target.is_some_and(|h| touched.contains(&h))
            })
            .map(|(handle, _)| *handle)
            .collect();
        for edge in affected_edges {
            if let Some(state) = self.states.get_mut(&edge) {
                state.invalid |= InvalidFlags::LAYOUT;
            }
        }
    }

    /// Drops every cached state, forcing full revalidation on next access
    /// (used on a scale/translate change, which moves every absolute
    /// coordinate).
    pub fn invalidate_all(&mut self) {
        for state in self.states.values_mut() {
            state.invalid |= InvalidFlags::LAYOUT | InvalidFlags::STYLE;
        }
    }

    /// Drops cached state entirely for a cell that left the model (§3.3
    /// "destroyed when the cell becomes unreachable or invisible").
    pub fn remove(&mut self, handle: Handle) {
        self.states.remove(&handle);
    }

    fn ensure_valid(&mut self, model: &Model<V>, styles: &dyn StyleProvider, handle: Handle) {
        if let Some(state) = self.states.get(&handle) {
            if state.invalid.is_empty() {
                return;
            }
        }
        let Some(cell) = model.get(handle) else {
            self.states.remove(&handle);
            return;
        };
        if !cell.is_visible() || !model.is_in_model(handle) {
            self.states.remove(&handle);
            return;
        }

        if let Some(parent) = cell.parent() {
            self.ensure_valid(model, styles, parent);
        }

        let resolved_style = styles.resolve(cell.style.as_deref());
        let mut state = CellState::new(handle);
        state.style = resolved_style.clone();
        state.rotation = resolved_style.rotation();

        if cell.is_edge() {
            self.validate_edge(model, styles, handle, &resolved_style, &mut state);
        } else {
            self.validate_vertex(model, handle, &mut state);
        }

        state.invalid = InvalidFlags::empty();
        self.states.insert(handle, state);
    }

    fn validate_vertex(&self, model: &Model<V>, handle: Handle, state: &mut CellState) {
        let cell = model.get(handle).expect("validated by caller");
        let scale = self.transform.scale();
        let translate = self.transform.translate();

        let (parent_origin, parent_bounds) = match cell.parent() {
            Some(parent) => match self.states.get(&parent) {
                Some(parent_state) => (parent_state.origin, parent_state.bounds()),
                None => (Point::new(translate.x, translate.y), Rect::ZERO),
            },
            None => (Point::new(translate.x, translate.y), Rect::ZERO),
        };

        let geometry = cell.geometry.as_ref();
        let bounds = geometry.map(|g| g.effective_bounds(cell.is_collapsed()));

        let origin = match (geometry, bounds) {
            (Some(g), Some(b)) if g.relative => Fractional::new(b.x0, b.y0).resolve(parent_bounds),
            (Some(g), Some(b)) => Point::new(parent_origin.x + b.x0 * scale, parent_origin.y + b.y0 * scale),
            _ => parent_origin,
        };

        let (unscaled_width, unscaled_height) = bounds.map_or((0.0, 0.0), |b| (b.width(), b.height()));

        state.origin = origin;
        state.unscaled_width = unscaled_width;
        state.unscaled_height = unscaled_height;
        state.width = unscaled_width * scale;
        state.height = unscaled_height * scale;
        state.bounding_box = Rect::new(origin.x, origin.y, origin.x + state.width, origin.y + state.height);
        state.absolute_offset = geometry
            .and_then(|g| g.offset)
            .map(|o| Point::new(o.x * scale, o.y * scale));
    }

    fn validate_edge(
        &mut self,
        model: &Model<V>,
        styles: &dyn StyleProvider,
        handle: Handle,
        style: &Style,
        state: &mut CellState,
    ) {
        let cell = model.get(handle).expect("validated by caller");
        let geometry = cell.geometry.as_ref();
        let source_terminal = cell.source();
        let target_terminal = cell.target();

        let visible_source = source_terminal.map(|h| resolve_visible_ancestor(model, h));
        let visible_target = target_terminal.map(|h| resolve_visible_ancestor(model, h));
        if let Some(vs) = visible_source {
            self.ensure_valid(model, styles, vs);
        }
        if let Some(vt) = visible_target {
            self.ensure_valid(model, styles, vt);
        }
        state.visible_source = visible_source;
        state.visible_target = visible_target;

        let scale = self.transform.scale();
        let translate = self.transform.translate();

        let source_endpoint = self.build_endpoint(model, geometry, true, source_terminal, visible_source, scale, translate);
        let target_endpoint = self.build_endpoint(model, geometry, false, target_terminal, visible_target, scale, translate);

        let hints: Hints = geometry
            .map(|g| {
                g.points
                    .iter()
                    .map(|p| Point::new(p.x * scale + translate.x, p.y * scale + translate.y))
                    .collect()
            })
            .unwrap_or_default();

        let mut points = if source_terminal.is_some() && source_terminal == target_terminal {
            let bounds = source_endpoint.effective_bounds();
            let direction = style.direction().unwrap_or(Side::WEST);
            let segment = style.segment().unwrap_or(DEFAULT_SEGMENT) * scale;
            loop_route(bounds, direction, segment, &hints)
        } else {
            match style.edge() {
                Some("entityRelation") => {
                    let segment = style.segment().unwrap_or(DEFAULT_SEGMENT) * scale;
                    entity_relation_route(&source_endpoint, &target_endpoint, segment, &hints)
                }
                Some("elbow") => {
                    let override_orientation = style.elbow().map(to_route_orientation);
                    elbow_route(&source_endpoint, &target_endpoint, override_orientation, &hints)
                }
                Some("segment") => segment_route(&source_endpoint, &target_endpoint, &hints),
                _ => {
                    // `orth_route` wants unscaled coordinates and multiplies
                    // by `scale` on emit; our endpoints are already absolute
                    // (scaled + translated), so we pass `scale = 1.0` and
                    // pre-scale the jetty buffer to match. This is an
                    // implementation choice for the unresolved interaction
                    // between "operate in scaled coordinates" (§4.3) and
                    // "all intermediate math is unscaled" (§4.3.5); see
                    // `DESIGN.md`.
                    let jetty = JettyConfig {
                        source: resolve_jetty(style.source_jetty_size(), style, true).map(|v| v * scale),
                        target: resolve_jetty(style.target_jetty_size(), style, false).map(|v| v * scale),
                        buffer: ORTH_BUFFER * scale,
                    };
                    orth_route(&source_endpoint, &target_endpoint, 1.0, jetty, &hints)
                }
            }
        };

        clip_to_perimeter(&mut points, visible_source.and_then(|h| self.states.get(&h)), true);
        clip_to_perimeter(&mut points, visible_target.and_then(|h| self.states.get(&h)), false);

        let mut lengths = Vec::with_capacity(points.len().saturating_sub(1));
        let mut total = 0.0;
        for pair in points.windows(2) {
            let d = pair[0].distance(pair[1]);
            lengths.push(d);
            total += d;
        }
        state.bounding_box = points.iter().fold(None::<Rect>, |acc, &p| {
            let point_rect = Rect::new(p.x, p.y, p.x, p.y);
            Some(acc.map_or(point_rect, |r| r.union(point_rect)))
        }).unwrap_or(Rect::ZERO);
        state.origin = points.first().copied().unwrap_or(Point::new(0.0, 0.0));
        state.terminal_distance = (points.len() >= 2).then_some(total);
        state.segment_lengths = lengths;
        state.absolute_points = points;
        state.absolute_offset = geometry
            .and_then(|g| g.offset)
            .map(|o| Point::new(o.x * scale, o.y * scale));
    }

    fn build_endpoint(
        &self,
        model: &Model<V>,
        geometry: Option<&diagram_model::Geometry>,
        is_source: bool,
        terminal: Option<Handle>,
        visible: Option<Handle>,
        scale: f64,
        translate: Vec2,
    ) -> Endpoint {
        match (terminal, visible) {
            (Some(_), Some(visible_handle)) => {
                let visible_state = self.states.get(&visible_handle);
                let bounds = visible_state.map_or(Rect::ZERO, CellState::bounds);
                let style = visible_state.map(|s| &s.style);
                let relative_x = model
                    .get(visible_handle)
                    .and_then(|c| c.geometry.as_ref())
                    .filter(|g| g.relative)
                    .map(|g| g.x);
                let is_edge = model.get(visible_handle).is_some_and(|c| c.is_edge());

                let mut endpoint = Endpoint::vertex(bounds);
                endpoint.rotation = style.map_or(0.0, Style::rotation);
                endpoint.port_constraint = style.map(Style::port_constraint);
                endpoint.relative_x = relative_x;
                endpoint.is_edge = is_edge;

                let fixed = if is_source { style.and_then(|s| s.exit()) } else { style.and_then(|s| s.entry()) };
                if let Some((fx, fy)) = fixed {
                    endpoint.recorded_point = Some(Fractional::new(fx, fy).resolve(endpoint.effective_bounds()));
                }
                endpoint
            }
            _ => {
                let point = geometry
                    .and_then(|g| if is_source { g.source_point } else { g.target_point })
                    .unwrap_or(Point::new(0.0, 0.0));
                Endpoint::dangling(Point::new(point.x * scale + translate.x, point.y * scale + translate.y))
            }
        }
    }
}

impl<V> Default for View<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks up from `handle` while its vertex geometry is marked `relative`,
/// returning the first non-relative ancestor (or `handle` itself, if it
/// isn't relative, or has no parent to climb to) — §3.3's "a relative
/// vertex is routed from its containing non-relative ancestor".
fn resolve_visible_ancestor<V>(model: &Model<V>, mut handle: Handle) -> Handle {
    loop {
        let Some(cell) = model.get(handle) else {
            return handle;
        };
        let is_relative = cell.geometry.as_ref().is_some_and(|g| g.relative);
        if !is_relative {
            return handle;
        }
        match cell.parent() {
            Some(parent) => handle = parent,
            None => return handle,
        }
    }
}

fn to_route_orientation(style: StyleOrientation) -> RouteOrientation {
    match style {
        StyleOrientation::Horizontal => RouteOrientation::Horizontal,
        StyleOrientation::Vertical => RouteOrientation::Vertical,
    }
}

/// Resolves a style-declared jetty size to an unscaled length, deriving it
/// from the arrow marker size when the style says `"auto"` (§6.1
/// `sourceJettySize`/`targetJettySize`: "auto means derive from arrow
/// marker size").
fn resolve_jetty(declared: Option<JettySize>, style: &Style, is_source: bool) -> Option<f64> {
    match declared? {
        JettySize::Fixed(v) => Some(v),
        JettySize::Auto => {
            let key = if is_source { "startSize" } else { "endSize" };
            Some(style.get(key).and_then(diagram_style::StyleValue::as_number).unwrap_or(DEFAULT_ARROW_SIZE) * 2.0)
        }
    }
}

/// Clips the first (or last, if `source_end` is `false`) point of `points`
/// to `terminal`'s perimeter, using the immediately adjacent point as the
/// direction to clip toward (§4.2 step 4).
fn clip_to_perimeter(points: &mut [Point], terminal: Option<&CellState>, source_end: bool) {
    let Some(terminal) = terminal else { return };
    if points.len() < 2 {
        return;
    }
    let shape = Shape::rectangle(terminal.bounds(), 0.0);
    if source_end {
        let towards = points[1];
        points[0] = shape.perimeter_point(towards);
    } else {
        let last = points.len() - 1;
        let towards = points[last - 1];
        points[last] = shape.perimeter_point(towards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::{CellRole, Geometry};
    use diagram_style::MapStyleProvider;

    fn attach<W>(model: &mut Model<W>, parent: Handle, cell: Handle) {
        let len = model.get(parent).map_or(0, |c| c.children().len());
        model.swap_child(cell, Some(parent), len);
    }

    #[test]
    fn vertex_absolute_origin_composes_through_parent() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let group = model.create_cell(CellRole::Neither);
        attach(&mut model, root, group);
        model.swap_geometry(group, Some(Geometry::vertex(10.0, 20.0, 200.0, 200.0)));
        let child = model.create_cell(CellRole::Vertex);
        attach(&mut model, group, child);
        model.swap_geometry(child, Some(Geometry::vertex(5.0, 5.0, 40.0, 30.0)));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        let state = view.validate(&model, &styles, child).unwrap();
        assert_eq!(state.origin, Point::new(15.0, 25.0));
        assert_eq!(state.width, 40.0);
    }

    #[test]
    fn relative_vertex_origin_is_a_fraction_of_parent_bounds() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let group = model.create_cell(CellRole::Neither);
        attach(&mut model, root, group);
        model.swap_geometry(group, Some(Geometry::vertex(0.0, 0.0, 200.0, 100.0)));
        let child = model.create_cell(CellRole::Vertex);
        attach(&mut model, group, child);
        let mut g = Geometry::vertex(0.5, 0.5, 20.0, 20.0);
        g.relative = true;
        model.swap_geometry(child, Some(g));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        let state = view.validate(&model, &styles, child).unwrap();
        assert_eq!(state.origin, Point::new(100.0, 50.0));
    }

    #[test]
    fn scale_change_invalidates_cached_states() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        attach(&mut model, root, v);
        model.swap_geometry(v, Some(Geometry::vertex(0.0, 0.0, 10.0, 10.0)));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        view.validate(&model, &styles, v);
        assert!(view.get(v).is_some());

        view.set_scale(2.0);
        assert!(view.get(v).is_none());
        let state = view.validate(&model, &styles, v).unwrap();
        assert_eq!(state.width, 20.0);
    }

    #[test]
    fn straight_horizontal_edge_matches_scenario_8_2_1() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let source = model.create_cell(CellRole::Vertex);
        let target = model.create_cell(CellRole::Vertex);
        attach(&mut model, root, source);
        attach(&mut model, root, target);
        model.swap_geometry(source, Some(Geometry::vertex(0.0, 0.0, 80.0, 30.0)));
        model.swap_geometry(target, Some(Geometry::vertex(200.0, 0.0, 80.0, 30.0)));
        let edge = model.create_cell(CellRole::Edge);
        attach(&mut model, root, edge);
        model.swap_terminal(edge, true, Some(source));
        model.swap_terminal(edge, false, Some(target));
        model.swap_geometry(edge, Some(Geometry::edge()));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        let state = view.validate(&model, &styles, edge).unwrap();
        assert_eq!(state.absolute_points, alloc::vec![Point::new(80.0, 15.0), Point::new(200.0, 15.0)]);
    }

    #[test]
    fn edge_routed_to_dangling_point_when_unconnected() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let edge = model.create_cell(CellRole::Edge);
        attach(&mut model, root, edge);
        let mut geometry = Geometry::edge();
        geometry.source_point = Some(Point::new(0.0, 0.0));
        geometry.target_point = Some(Point::new(50.0, 50.0));
        model.swap_geometry(edge, Some(geometry));

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        let state = view.validate(&model, &styles, edge).unwrap();
        assert_eq!(state.absolute_points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(state.absolute_points.last(), Some(&Point::new(50.0, 50.0)));
    }

    #[test]
    fn invisible_cell_has_no_cached_state() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let v = model.create_cell(CellRole::Vertex);
        attach(&mut model, root, v);
        model.swap_geometry(v, Some(Geometry::vertex(0.0, 0.0, 10.0, 10.0)));
        model.swap_visible(v, false);

        let mut view: View<()> = View::new();
        let styles = MapStyleProvider;
        assert!(view.validate(&model, &styles, v).is_none());
    }
}
