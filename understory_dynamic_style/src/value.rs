// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loosely typed style values and insertion-ordered style maps.

use alloc::string::String;
use alloc::vec::Vec;

/// A single style value.
///
/// Styles are plain key-value data supplied by the caller, so values are
/// dynamically typed. Only [`StyleValue::Map`] takes part in merging; every
/// other variant is treated as an opaque leaf.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// An explicitly absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string, e.g. `"blue"` or `"10px"`.
    Text(String),
    /// A nested key-value mapping.
    Map(StyleMap),
    /// An ordered sequence, e.g. a style array awaiting a merge.
    List(Vec<StyleValue>),
}

impl StyleValue {
    /// Returns `false` for `Null`, `false`, `0`, `NaN` and the empty string.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Map(_) | Self::List(_) => true,
        }
    }

    /// Returns the inner map if this is a plain mapping.
    #[must_use]
    pub fn as_map(&self) -> Option<&StyleMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner text, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(value: StyleMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Self>> for StyleValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

/// An insertion-ordered mapping from property names to [`StyleValue`]s.
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// the position of its first insertion. Maps are small in practice, so lookups
/// are a linear scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, StyleValue)>,
}

impl StyleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the map for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a property, returning the previous value if the key was present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Option<StyleValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Gets a property by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Returns `true` if the map has a value for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every entry of `other` over this map; `other` wins on collision.
    pub fn overlay(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Like [`StyleMap::overlay`], but where both sides hold a mapping for
    /// the same key the two mappings are merged recursively.
    pub fn merge_deep(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            let existing = self.entries.iter_mut().find(|(k, _)| k == key);
            match (existing, value) {
                (Some((_, StyleValue::Map(ours))), StyleValue::Map(theirs)) => {
                    ours.merge_deep(theirs);
                }
                (Some((_, slot)), _) => *slot = value.clone(),
                (None, _) => self.entries.push((key.clone(), value.clone())),
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for StyleMap
where
    K: Into<String>,
    V: Into<StyleValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position() {
        let mut map = StyleMap::new().with("a", 1.0).with("b", 2.0);
        let old = map.insert("a", 3.0);
        assert_eq!(old, Some(StyleValue::Number(1.0)));
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map.get("a"), Some(&StyleValue::Number(3.0)));
    }

    #[test]
    fn truthiness_follows_loose_rules() {
        assert!(!StyleValue::Null.is_truthy());
        assert!(!StyleValue::Bool(false).is_truthy());
        assert!(!StyleValue::Number(0.0).is_truthy());
        assert!(!StyleValue::Number(f64::NAN).is_truthy());
        assert!(!StyleValue::from("").is_truthy());
        assert!(StyleValue::from("x").is_truthy());
        assert!(StyleValue::Map(StyleMap::new()).is_truthy());
        assert!(StyleValue::List(Vec::new()).is_truthy());
    }

    #[test]
    fn overlay_later_wins() {
        let mut base = StyleMap::new().with("color", "blue").with("width", 10.0);
        base.overlay(&StyleMap::new().with("color", "red"));
        assert_eq!(base.get("color").and_then(StyleValue::as_text), Some("red"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn merge_deep_descends_into_mappings_only() {
        let mut base = StyleMap::new()
            .with("color", "blue")
            .with(":hover", StyleMap::new().with("background", "white"))
            .with("border", StyleMap::new().with("width", 1.0));
        base.merge_deep(
            &StyleMap::new()
                .with(":hover", StyleMap::new().with("color", "red"))
                .with("border", "none"),
        );
        assert_eq!(
            base,
            StyleMap::new()
                .with("color", "blue")
                .with(
                    ":hover",
                    StyleMap::new().with("background", "white").with("color", "red")
                )
                .with("border", "none")
        );
    }
}
