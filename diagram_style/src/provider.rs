// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::ToString as _;

use crate::{Style, StyleValue};

/// Resolves an opaque style descriptor into a typed [`Style`] (§6 "Style
/// provider": "given a style descriptor (an opaque string or map), returns
/// a dictionary of typed attributes").
///
/// The engine core depends only on this trait, not on any concrete parser,
/// matching §9's "replace global constants and feature-detection with a
/// capability descriptor injected at engine construction."
pub trait StyleProvider {
    /// Resolves a cell's style string (already read from the model) into a
    /// typed [`Style`]. `None` resolves to the empty style.
    fn resolve(&self, style: Option<&str>) -> Style;
}

/// A [`StyleProvider`] that parses `key=value;key=value` strings, the
/// style-string grammar assumed throughout §6.1's key table.
///
/// Each value is sniffed into a [`StyleValue`]: `"true"`/`"false"` become a
/// `Flag`, anything that parses as `f64` becomes a `Number`, everything
/// else stays `Text`. A bare key with no `=` is recorded as `Flag(true)`
/// (mirrors the common `"rounded;dashed"` shorthand).
#[derive(Clone, Copy, Debug, Default)]
pub struct MapStyleProvider;

impl StyleProvider for MapStyleProvider {
    fn resolve(&self, style: Option<&str>) -> Style {
        let Some(raw) = style else { return Style::new() };
        let mut resolved = Style::new();
        for entry in raw.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            resolved = match entry.split_once('=') {
                Some((key, value)) => resolved.with(key.trim(), sniff(value.trim())),
                None => resolved.with(entry, StyleValue::Flag(true)),
            };
        }
        resolved
    }
}

fn sniff(value: &str) -> StyleValue {
    match value {
        "true" => StyleValue::Flag(true),
        "false" => StyleValue::Flag(false),
        _ => value
            .parse::<f64>()
            .map_or_else(|_| StyleValue::Text(value.to_string()), StyleValue::Number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_key_value_and_bare_flags() {
        let style = MapStyleProvider.resolve(Some("edge=orthogonal;segment=40;rounded;flipH=true"));
        assert_eq!(style.edge(), Some("orthogonal"));
        assert_eq!(style.segment(), Some(40.0));
        assert_eq!(style.get("rounded"), Some(&StyleValue::Flag(true)));
        assert_eq!(style.flip(), (true, false));
    }

    #[test]
    fn none_descriptor_resolves_empty() {
        let style = MapStyleProvider.resolve(None);
        assert_eq!(style.edge(), None);
        assert_eq!(style.rotation(), 0.0);
    }
}
