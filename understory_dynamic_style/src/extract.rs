// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a flat style into base properties and special blocks.

use alloc::string::String;

use smallvec::SmallVec;

use crate::value::{StyleMap, StyleValue};

/// An interaction pseudo-class that can carry its own style block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// `:hover`, driven by pointer enter/leave.
    Hover,
    /// `:focus`, driven by focus/blur.
    Focus,
    /// `:active`, set on pointer down and cleared by a global pointer release.
    Active,
}

impl PseudoClass {
    /// All pseudo-classes, in default precedence order (last wins).
    pub const ALL: [Self; 3] = [Self::Hover, Self::Focus, Self::Active];

    /// The reserved style key, e.g. `":hover"`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hover => ":hover",
            Self::Focus => ":focus",
            Self::Active => ":active",
        }
    }

    /// Parses a reserved style key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// A style key that names a conditional block rather than a property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// A pseudo-class block.
    Pseudo(PseudoClass),
    /// A media-query block; the payload is the raw query string.
    Media(String),
}

impl SpecialKey {
    /// Classifies a style key, returning `None` for ordinary properties.
    #[must_use]
    pub fn classify(key: &str) -> Option<Self> {
        if let Some(pseudo) = PseudoClass::from_key(key) {
            Some(Self::Pseudo(pseudo))
        } else if is_media_query(key) {
            Some(Self::Media(key.into()))
        } else {
            None
        }
    }
}

/// Returns `true` if `key` looks like a media query, e.g. `"(min-width: 600px)"`.
#[must_use]
pub fn is_media_query(key: &str) -> bool {
    key.starts_with('(')
}

/// A style split by [`extract_special`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedStyle {
    /// Ordinary properties.
    pub base: StyleMap,
    /// Special blocks in declaration order.
    pub special: SmallVec<[(SpecialKey, StyleValue); 4]>,
}

impl ExtractedStyle {
    /// Returns the block declared for a pseudo-class, if any.
    #[must_use]
    pub fn pseudo(&self, pseudo: PseudoClass) -> Option<&StyleValue> {
        self.special.iter().find_map(|(key, block)| match key {
            SpecialKey::Pseudo(p) if *p == pseudo => Some(block),
            _ => None,
        })
    }

    /// Iterates media-query blocks in declaration order.
    pub fn media(&self) -> impl Iterator<Item = (&str, &StyleValue)> + '_ {
        self.special.iter().filter_map(|(key, block)| match key {
            SpecialKey::Media(query) => Some((query.as_str(), block)),
            SpecialKey::Pseudo(_) => None,
        })
    }

    /// Returns `true` if any pseudo-class block is present.
    #[must_use]
    pub fn has_pseudo(&self) -> bool {
        self.special
            .iter()
            .any(|(key, _)| matches!(key, SpecialKey::Pseudo(_)))
    }

    /// Returns `true` if the element needs a stable identity.
    ///
    /// Pseudo-class blocks keep per-element state. Media blocks keep
    /// per-component listeners, but they count here too.
    #[must_use]
    pub fn needs_dynamic_state(&self) -> bool {
        !self.special.is_empty()
    }
}

/// Splits a flat style mapping into base properties and special blocks.
#[must_use]
pub fn extract_special(style: &StyleMap) -> ExtractedStyle {
    let mut out = ExtractedStyle::default();
    for (key, value) in style.iter() {
        match SpecialKey::classify(key) {
            Some(special) => out.special.push((special, value.clone())),
            None => {
                out.base.insert(key, value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pseudo_and_media_keys() {
        let style = StyleMap::new()
            .with("color", "blue")
            .with(":hover", StyleMap::new().with("color", "red"))
            .with("(max-width: 400px)", StyleMap::new().with("width", 10.0))
            .with("hover", "not special");

        let extracted = extract_special(&style);
        assert_eq!(
            extracted.base,
            StyleMap::new().with("color", "blue").with("hover", "not special")
        );
        assert!(extracted.pseudo(PseudoClass::Hover).is_some());
        assert!(extracted.pseudo(PseudoClass::Active).is_none());
        let media: alloc::vec::Vec<_> = extracted.media().map(|(q, _)| q).collect();
        assert_eq!(media, ["(max-width: 400px)"]);
        assert!(extracted.has_pseudo());
    }

    #[test]
    fn plain_style_needs_no_state() {
        let extracted = extract_special(&StyleMap::new().with("color", "blue"));
        assert!(!extracted.needs_dynamic_state());
        assert!(extracted.special.is_empty());
    }

    #[test]
    fn pseudo_keys_round_trip() {
        for p in PseudoClass::ALL {
            assert_eq!(PseudoClass::from_key(p.key()), Some(p));
        }
        assert_eq!(PseudoClass::from_key(":visited"), None);
    }
}
