// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution errors.

use alloc::string::String;
use core::fmt;

use crate::identity::ElementIdentity;

/// Why two sibling elements could not be told apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmbiguityCause {
    /// Two siblings declare the same explicit key.
    DuplicateKey(String),
    /// Two siblings declare the same explicit ref.
    DuplicateRef(String),
    /// Two siblings carry neither key nor ref, so only their positions
    /// distinguish them.
    UnkeyedSiblings {
        /// Position of the first sibling.
        first: usize,
        /// Position of the second sibling.
        second: usize,
    },
}

/// Error returned by [`Resolver::resolve`](crate::Resolver::resolve).
#[derive(Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Two siblings that both need dynamic state share an identity.
    AmbiguousIdentity {
        /// Identity of the parent whose children collide.
        parent: ElementIdentity,
        /// The identity the colliding sibling resolved to.
        identity: ElementIdentity,
        /// What made the siblings indistinguishable.
        cause: AmbiguityCause,
    },
}

impl fmt::Debug for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousIdentity {
                parent,
                identity,
                cause,
            } => write!(
                f,
                "AmbiguousIdentity {{ parent: {parent:?}, identity: {identity:?}, cause: {cause:?} }}"
            ),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousIdentity { parent, cause, .. } => match cause {
                AmbiguityCause::DuplicateKey(key) => write!(
                    f,
                    "duplicate key {key:?} under {parent}: elements with interactive styles need unique keys"
                ),
                AmbiguityCause::DuplicateRef(name) => write!(
                    f,
                    "duplicate ref {name:?} under {parent}: elements with interactive styles need unique refs"
                ),
                AmbiguityCause::UnkeyedSiblings { first, second } => write!(
                    f,
                    "children {first} and {second} of {parent} both have interactive styles but no key or ref"
                ),
            },
        }
    }
}

impl core::error::Error for ResolveError {}
