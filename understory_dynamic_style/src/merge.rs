// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening of style arrays into a single mapping.

use crate::value::{StyleMap, StyleValue};

/// Merges an ordered sequence of candidate styles into one flat mapping.
///
/// Entries are applied left to right and later entries win on key collision.
/// Where two entries both hold a mapping under the same key, such as two
/// `:hover` blocks, those mappings are merged the same way. Anything that is
/// not a plain mapping (falsy values, strings, numbers, nested sequences) is
/// skipped.
///
/// ```rust
/// use understory_dynamic_style::{StyleMap, StyleValue, merge_styles};
///
/// let merged = merge_styles(&[
///     StyleMap::new().with("color", "blue").with("width", 10.0).into(),
///     StyleValue::Bool(false),
///     StyleMap::new().with("color", "red").into(),
/// ]);
/// assert_eq!(merged.get("color"), Some(&StyleValue::from("red")));
/// assert_eq!(merged.get("width"), Some(&StyleValue::Number(10.0)));
/// ```
#[must_use]
pub fn merge_styles(entries: &[StyleValue]) -> StyleMap {
    let mut merged = StyleMap::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            StyleValue::Map(map) => merged.merge_deep(map),
            other => {
                log::debug!("skipping non-mapping style entry at index {index}: {other:?}");
            }
        }
    }
    merged
}

/// Normalizes a style declaration into a flat mapping.
///
/// A mapping is returned as-is, a sequence is merged with [`merge_styles`],
/// and anything else yields `None`.
#[must_use]
pub fn normalize_style(style: &StyleValue) -> Option<StyleMap> {
    match style {
        StyleValue::Map(map) => Some(map.clone()),
        StyleValue::List(entries) => Some(merge_styles(entries)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn later_entries_override_earlier() {
        let merged = merge_styles(&[
            StyleMap::new().with("a", 1.0).with("b", 1.0).into(),
            StyleMap::new().with("b", 2.0).with("c", 2.0).into(),
            StyleMap::new().with("c", 3.0).into(),
        ]);
        assert_eq!(merged.get("a"), Some(&StyleValue::Number(1.0)));
        assert_eq!(merged.get("b"), Some(&StyleValue::Number(2.0)));
        assert_eq!(merged.get("c"), Some(&StyleValue::Number(3.0)));
    }

    #[test]
    fn special_blocks_merge_across_entries() {
        let merged = merge_styles(&[
            StyleMap::new()
                .with(":hover", StyleMap::new().with("background", "white"))
                .into(),
            StyleMap::new()
                .with(":hover", StyleMap::new().with("color", "blue"))
                .into(),
        ]);
        assert_eq!(
            merged.get(":hover"),
            Some(&StyleValue::from(
                StyleMap::new().with("background", "white").with("color", "blue")
            ))
        );
    }

    #[test]
    fn malformed_entries_are_skipped_anywhere() {
        let merged = merge_styles(&[
            StyleValue::Null,
            StyleMap::new().with("a", 1.0).into(),
            StyleValue::from("color: red"),
            StyleValue::List(vec![StyleMap::new().with("a", 9.0).into()]),
            StyleValue::Number(0.0),
            StyleValue::Bool(false),
        ]);
        assert_eq!(merged, StyleMap::new().with("a", 1.0));
    }

    #[test]
    fn normalize_rejects_leaves() {
        assert!(normalize_style(&StyleValue::from("red")).is_none());
        assert_eq!(
            normalize_style(&StyleValue::List(vec![StyleValue::Null])),
            Some(StyleMap::new())
        );
    }
}
