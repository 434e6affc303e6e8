// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diagram_geom::{Affine, Point};
use kurbo::Stroke;
use peniko::Brush;

use crate::Path;

/// Z-ordered rendering layers (§6 "a notion of z-ordered layers (overlay,
/// decorator, draw)"). `Draw` and `Overlay` are the two layers the core
/// actually requires; `Decorator` is carried for host implementations that
/// want a middle tier for things like swimlane headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Permanent shapes (vertices, edges).
    Draw,
    /// A middle tier between permanent shapes and interaction overlays.
    Decorator,
    /// Handles, previews, highlights, and marker decorations.
    Overlay,
}

/// An opaque handle to a node a [`RenderingSurface`] created, returned by
/// `create_node` and consumed by `remove_node`. The core never inspects a
/// `NodeId`'s contents; it only holds it for later removal (§5 "DOM/
/// rendering nodes are owned by the state that created them; destruction is
/// the owner's responsibility").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// The vector-canvas contract the engine core consumes from its host (§6
/// "Rendering surface").
///
/// Grounded on `understory_imaging`'s backend-trait IR
/// (`ImagingBackend`/`StateOp`/`DrawOp`), narrowed to exactly the
/// operations §6 names: path construction and fill/stroke, paint-state
/// setters, an affine transform, hit testing, node lifecycle, and the
/// layer model above.
pub trait RenderingSurface {
    /// Fills `path` with the current fill brush.
    fn fill_path(&mut self, path: &Path);

    /// Strokes `path` with the current stroke style and brush.
    fn stroke_path(&mut self, path: &Path);

    /// Sets the brush used by subsequent `fill_path` calls.
    fn set_fill(&mut self, brush: Brush);

    /// Sets the stroke style used by subsequent `stroke_path` calls.
    fn set_stroke(&mut self, stroke: Stroke, brush: Brush);

    /// Sets the opacity applied to subsequent draw operations, in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f64);

    /// Enables or disables the drop shadow applied to subsequent draw
    /// operations.
    fn set_shadow(&mut self, enabled: bool);

    /// Sets the current transform (translate + rotate + scale) applied to
    /// subsequent path coordinates.
    fn set_transform(&mut self, transform: Affine);

    /// `true` if `point` (in surface coordinates) hits a previously drawn
    /// shape at `node`.
    fn hit_test(&self, node: NodeId, point: Point) -> bool;

    /// Creates a new node on `layer`, returning its handle.
    fn create_node(&mut self, layer: Layer) -> NodeId;

    /// Removes a previously created node. Idempotent: removing an
    /// already-removed or unknown node is a no-op, matching §8.1 "Reset
    /// completeness" (a reset path may call this more than once on state
    /// that's already torn down).
    fn remove_node(&mut self, node: NodeId);
}
