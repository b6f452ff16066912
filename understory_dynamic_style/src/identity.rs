// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable element identities derived from ancestor path and key/ref/position.

use alloc::string::{String, ToString};
use core::fmt;

use hashbrown::HashMap;

use crate::element::Element;
use crate::error::{AmbiguityCause, ResolveError};

/// A string naming one logical element within one component's tree.
///
/// Identities are built as a `/`-separated path from the resolution root.
/// Each segment is the element's key, `@` followed by its ref, or `#`
/// followed by its position among its siblings. Within keys and refs, the
/// characters `/`, `@`, `#` and `\` are escaped with a leading `\`, so
/// distinct elements never share an identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIdentity(String);

impl ElementIdentity {
    /// The empty prefix above the resolution root.
    #[must_use]
    pub fn root_prefix() -> Self {
        Self::default()
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn child(&self, source: &IdentitySource) -> Self {
        let mut path = self.0.clone();
        path.push('/');
        match source {
            IdentitySource::Key(key) => push_escaped(&mut path, key),
            IdentitySource::Ref(name) => {
                path.push('@');
                push_escaped(&mut path, name);
            }
            IdentitySource::Position(index) => {
                path.push('#');
                path.push_str(&index.to_string());
            }
        }
        Self(path)
    }
}

fn push_escaped(path: &mut String, segment: &str) {
    for c in segment.chars() {
        if matches!(c, '/' | '@' | '#' | '\\') {
            path.push('\\');
        }
        path.push(c);
    }
}

impl fmt::Display for ElementIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for ElementIdentity {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

/// Which piece of information an identity was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentitySource {
    /// The element's explicit key.
    Key(String),
    /// The element's explicit ref.
    Ref(String),
    /// The element's position among its siblings.
    Position(usize),
}

impl IdentitySource {
    /// Picks the key, then the ref, then the position.
    #[must_use]
    pub fn of(element: &Element, index: usize) -> Self {
        if let Some(key) = &element.key {
            Self::Key(key.clone())
        } else if let Some(name) = &element.ref_name {
            Self::Ref(name.clone())
        } else {
            Self::Position(index)
        }
    }
}

/// Derives the identity of `element`, the `index`-th child under `parent`.
#[must_use]
pub fn derive_identity(
    parent: &ElementIdentity,
    element: &Element,
    index: usize,
) -> (ElementIdentity, IdentitySource) {
    let source = IdentitySource::of(element, index);
    (parent.child(&source), source)
}

/// How keyless, refless siblings that need dynamic state are treated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Reject a second such sibling under the same parent.
    ///
    /// Conditional rendering shifts positions, which would silently move
    /// hover/focus/active state onto a different element.
    #[default]
    Strict,
    /// Accept positional identity for any number of siblings.
    Positional,
}

/// Collision check over one parent's children.
///
/// Only children that need dynamic state are recorded; the first collision
/// aborts resolution.
#[derive(Debug)]
pub(crate) struct SiblingGuard<'a> {
    parent: &'a ElementIdentity,
    policy: IdentityPolicy,
    seen: HashMap<ElementIdentity, usize>,
    first_unkeyed: Option<usize>,
}

impl<'a> SiblingGuard<'a> {
    pub(crate) fn new(parent: &'a ElementIdentity, policy: IdentityPolicy) -> Self {
        Self {
            parent,
            policy,
            seen: HashMap::new(),
            first_unkeyed: None,
        }
    }

    pub(crate) fn claim(
        &mut self,
        identity: &ElementIdentity,
        source: &IdentitySource,
        index: usize,
    ) -> Result<(), ResolveError> {
        if let Some(&first) = self.seen.get(identity) {
            return Err(self.ambiguous(identity, source, first, index));
        }
        if let IdentitySource::Position(_) = source
            && self.policy == IdentityPolicy::Strict
        {
            if let Some(first) = self.first_unkeyed {
                return Err(self.ambiguous(identity, source, first, index));
            }
            self.first_unkeyed = Some(index);
        }
        self.seen.insert(identity.clone(), index);
        Ok(())
    }

    fn ambiguous(
        &self,
        identity: &ElementIdentity,
        source: &IdentitySource,
        first: usize,
        second: usize,
    ) -> ResolveError {
        let cause = match source {
            IdentitySource::Key(key) => AmbiguityCause::DuplicateKey(key.clone()),
            IdentitySource::Ref(name) => AmbiguityCause::DuplicateRef(name.clone()),
            IdentitySource::Position(_) => AmbiguityCause::UnkeyedSiblings { first, second },
        };
        ResolveError::AmbiguousIdentity {
            parent: self.parent.clone(),
            identity: identity.clone(),
            cause,
        }
    }
}
