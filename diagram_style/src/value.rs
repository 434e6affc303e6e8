// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// A single resolved style attribute (§6 "Style provider": "a dictionary of
/// typed attributes").
///
/// Grounded on the teacher's dependency-property value cell
/// (`understory_property`), collapsed to a single untyped-at-rest union
/// since this engine's style keys are a small fixed set rather than an
/// open registry of element properties.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// A bare string (e.g. a routing strategy identifier, a side name not
    /// yet parsed).
    Text(String),
    /// A numeric attribute (segment length, rotation, jetty size, ...).
    Number(f64),
    /// A boolean attribute (`horizontal`, `flipH`, `flipV`).
    Flag(bool),
}

impl StyleValue {
    /// This value as a string slice, if it's text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// This value as `f64`, if it's numeric.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// This value as `bool`, if it's a flag.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}
