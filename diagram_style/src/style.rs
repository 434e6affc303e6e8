// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString as _};
use diagram_geom::Side;
use hashbrown::HashMap;

use crate::StyleValue;

/// Jetty size: a fixed value, or "derive from arrow marker size" (§6.1
/// `sourceJettySize`/`targetJettySize`/`jettySize`: `"auto"`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JettySize {
    /// An explicit style-supplied length.
    Fixed(f64),
    /// Derive the jetty from the endpoint's arrow marker size (§4.3.5 step
    /// 2).
    Auto,
}

/// A resolved dictionary of typed style attributes (§6 "Style provider").
///
/// One `Style` is the product of resolving a cell's opaque style
/// descriptor; the routing and view layers read it through the typed
/// accessors below rather than touching `StyleValue` directly, matching
/// the recognized-key table of §6.1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    attributes: HashMap<String, StyleValue>,
}

impl Style {
    /// An empty style (every accessor returns its default).
    #[must_use]
    pub fn new() -> Self {
        Self { attributes: HashMap::new() }
    }

    /// Sets a raw attribute, returning `self` for chained construction.
    #[must_use]
    pub fn with(mut self, key: &str, value: StyleValue) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// The raw value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.attributes.get(key)
    }

    /// `edge`: the chosen routing strategy identifier.
    #[must_use]
    pub fn edge(&self) -> Option<&str> {
        self.get("edge").and_then(StyleValue::as_text)
    }

    /// `elbow`: `"vertical"` or `"horizontal"`, parsed to [`crate::Orientation`].
    #[must_use]
    pub fn elbow(&self) -> Option<crate::Orientation> {
        match self.get("elbow").and_then(StyleValue::as_text)? {
            "vertical" => Some(crate::Orientation::Vertical),
            "horizontal" => Some(crate::Orientation::Horizontal),
            _ => None,
        }
    }

    /// `direction`: a single side for loops and oriented shapes.
    #[must_use]
    pub fn direction(&self) -> Option<Side> {
        parse_side(self.get("direction").and_then(StyleValue::as_text)?)
    }

    /// `segment`: nominal length for the entity-relation and loop routers.
    #[must_use]
    pub fn segment(&self) -> Option<f64> {
        self.get("segment").and_then(StyleValue::as_number)
    }

    /// `rotation`: degrees around the vertex center.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.get("rotation").and_then(StyleValue::as_number).unwrap_or(0.0)
    }

    /// `portConstraint`: allowed exit sides, defaulting to all four.
    #[must_use]
    pub fn port_constraint(&self) -> Side {
        self.get("portConstraint")
            .and_then(StyleValue::as_text)
            .and_then(parse_side_mask)
            .unwrap_or_default()
    }

    /// `sourceJettySize`, falling back to the shared `jettySize`.
    #[must_use]
    pub fn source_jetty_size(&self) -> Option<JettySize> {
        self.jetty_size("sourceJettySize")
    }

    /// `targetJettySize`, falling back to the shared `jettySize`.
    #[must_use]
    pub fn target_jetty_size(&self) -> Option<JettySize> {
        self.jetty_size("targetJettySize")
    }

    fn jetty_size(&self, key: &str) -> Option<JettySize> {
        let value = self.get(key).or_else(|| self.get("jettySize"))?;
        match value {
            StyleValue::Number(n) => Some(JettySize::Fixed(*n)),
            StyleValue::Text(s) if s == "auto" => Some(JettySize::Auto),
            _ => None,
        }
    }

    /// `horizontal`: swimlane orientation.
    #[must_use]
    pub fn horizontal(&self) -> bool {
        self.get("horizontal").and_then(StyleValue::as_flag).unwrap_or(true)
    }

    /// `flipH` / `flipV` mirror flags.
    #[must_use]
    pub fn flip(&self) -> (bool, bool) {
        (
            self.get("flipH").and_then(StyleValue::as_flag).unwrap_or(false),
            self.get("flipV").and_then(StyleValue::as_flag).unwrap_or(false),
        )
    }

    /// `entryX`/`entryY`, as a fractional anchor if both are present.
    #[must_use]
    pub fn entry(&self) -> Option<(f64, f64)> {
        Some((
            self.get("entryX").and_then(StyleValue::as_number)?,
            self.get("entryY").and_then(StyleValue::as_number)?,
        ))
    }

    /// `exitX`/`exitY`, as a fractional anchor if both are present.
    #[must_use]
    pub fn exit(&self) -> Option<(f64, f64)> {
        Some((
            self.get("exitX").and_then(StyleValue::as_number)?,
            self.get("exitY").and_then(StyleValue::as_number)?,
        ))
    }
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw {
        "west" | "W" => Some(Side::WEST),
        "north" | "N" => Some(Side::NORTH),
        "east" | "E" => Some(Side::EAST),
        "south" | "S" => Some(Side::SOUTH),
        _ => None,
    }
}

fn parse_side_mask(raw: &str) -> Option<Side> {
    let mut mask = Side::empty();
    for token in raw.split(',') {
        mask |= parse_side(token.trim())?;
    }
    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jetty_size_falls_back_to_shared_key() {
        let style = Style::new().with("jettySize", StyleValue::Text("auto".to_string()));
        assert_eq!(style.source_jetty_size(), Some(JettySize::Auto));
        assert_eq!(style.target_jetty_size(), Some(JettySize::Auto));
    }

    #[test]
    fn explicit_source_jetty_overrides_shared_key() {
        let style = Style::new()
            .with("jettySize", StyleValue::Text("auto".to_string()))
            .with("sourceJettySize", StyleValue::Number(30.0));
        assert_eq!(style.source_jetty_size(), Some(JettySize::Fixed(30.0)));
        assert_eq!(style.target_jetty_size(), Some(JettySize::Auto));
    }

    #[test]
    fn port_constraint_parses_comma_separated_sides() {
        let style = Style::new().with("portConstraint", StyleValue::Text("north,south".to_string()));
        assert_eq!(style.port_constraint(), Side::NORTH | Side::SOUTH);
    }

    #[test]
    fn missing_port_constraint_allows_all_sides() {
        assert_eq!(Style::new().port_constraint(), Side::all());
    }

    #[test]
    fn direction_parses_single_letter_or_word() {
        let style = Style::new().with("direction", StyleValue::Text("W".to_string()));
        assert_eq!(style.direction(), Some(Side::WEST));
    }
}
