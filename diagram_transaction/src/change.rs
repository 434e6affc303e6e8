// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use diagram_model::{Geometry, Handle, Model};

/// An atomic, self-inverting mutation (§3.4).
///
/// Each variant stores the slot it targets and the value to install.
/// `execute` swaps that value into the model and overwrites itself with
/// whatever the model reports as the previous value — so executing the
/// same `Change` twice is a no-op, and a third execution undoes the
/// second. This is the Rust shape of "kinds: root-change, child-change,
/// terminal-change, value-change, style-change, geometry-change,
/// visible-change, collapsed-change, attribute-change" (attribute-change
/// is represented by `Value`, since this crate treats the user value as
/// the cell's single opaque attribute payload).
#[derive(Debug, Clone)]
pub enum Change<V> {
    /// A value-change.
    Value { cell: Handle, value: Option<V> },
    /// A style-change.
    Style { cell: Handle, style: Option<String> },
    /// A geometry-change.
    Geometry {
        cell: Handle,
        geometry: Option<Geometry>,
    },
    /// A visible-change.
    Visible { cell: Handle, visible: bool },
    /// A collapsed-change.
    Collapsed { cell: Handle, collapsed: bool },
    /// A terminal-change (source or target endpoint of an edge).
    Terminal {
        edge: Handle,
        source: bool,
        terminal: Option<Handle>,
    },
    /// A child-change: parent and index within that parent's child list.
    Child {
        cell: Handle,
        parent: Option<Handle>,
        index: usize,
    },
    /// A root-change.
    Root { new_root: Handle },
}

impl<V> Change<V> {
    /// Applies this change to `model`, then rewrites `self` in place to
    /// hold the value that was just displaced — so the next `execute`
    /// call undoes this one.
    pub fn execute(&mut self, model: &mut Model<V>) {
        match self {
            Self::Value { cell, value } => {
                let previous = model.swap_value(*cell, value.take());
                *value = previous;
            }
            Self::Style { cell, style } => {
                let previous = model.swap_style(*cell, style.take());
                *style = previous;
            }
            Self::Geometry { cell, geometry } => {
                let previous = model.swap_geometry(*cell, geometry.take());
                *geometry = previous;
            }
            Self::Visible { cell, visible } => {
                let previous = model.swap_visible(*cell, *visible);
                *visible = previous;
            }
            Self::Collapsed { cell, collapsed } => {
                let previous = model.swap_collapsed(*cell, *collapsed);
                *collapsed = previous;
            }
            Self::Terminal {
                edge,
                source,
                terminal,
            } => {
                let previous = model.swap_terminal(*edge, *source, *terminal);
                *terminal = previous;
            }
            Self::Child {
                cell,
                parent,
                index,
            } => {
                let (previous_parent, previous_index) = model.swap_child(*cell, *parent, *index);
                *parent = previous_parent;
                *index = previous_index;
            }
            Self::Root { new_root } => {
                let previous = model.swap_root(*new_root);
                *new_root = previous;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram_model::CellRole;

    #[test]
    fn style_change_is_self_inverting() {
        let mut model: Model<()> = Model::new();
        let root = model.root();
        let e = model.create_cell(CellRole::Edge);
        model.swap_child(e, Some(root), 0);
        model.swap_style(e, Some("a".into()));

        let mut change = Change::Style {
            cell: e,
            style: Some("b".into()),
        };
        change.execute(&mut model);
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("b"));

        change.execute(&mut model);
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("a"));

        change.execute(&mut model);
        assert_eq!(model.get(e).unwrap().style.as_deref(), Some("b"));
    }
}
