// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolver configuration.

use alloc::rc::Rc;
use core::fmt;

use crate::extract::PseudoClass;
use crate::identity::IdentityPolicy;
use crate::media::MediaQueryMatcher;
use crate::release::PointerReleaseSource;

/// Collaborators and policies used by a [`Resolver`](crate::Resolver).
///
/// Build one with [`ResolverConfigBuilder`]. The default has no
/// collaborators: media blocks never match and `:active` is only cleared by
/// an explicit [`dispatch_global_release`](crate::dispatch_global_release).
#[derive(Clone, Default)]
pub struct ResolverConfig {
    pub(crate) media_matcher: Option<Rc<dyn MediaQueryMatcher>>,
    pub(crate) pointer_release: Option<Rc<dyn PointerReleaseSource>>,
    pub(crate) identity_policy: IdentityPolicy,
    pub(crate) pseudo_order: Option<[PseudoClass; 3]>,
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("media_matcher", &self.media_matcher.is_some())
            .field("pointer_release", &self.pointer_release.is_some())
            .field("identity_policy", &self.identity_policy)
            .field("pseudo_order", &self.pseudo_order())
            .finish()
    }
}

impl ResolverConfig {
    /// How keyless siblings with dynamic state are treated.
    #[must_use]
    pub fn identity_policy(&self) -> IdentityPolicy {
        self.identity_policy
    }

    /// Order in which matched pseudo blocks are layered; the last one wins.
    #[must_use]
    pub fn pseudo_order(&self) -> [PseudoClass; 3] {
        self.pseudo_order.unwrap_or(PseudoClass::ALL)
    }

    /// The media-query collaborator, if any.
    #[must_use]
    pub fn media_matcher(&self) -> Option<&Rc<dyn MediaQueryMatcher>> {
        self.media_matcher.as_ref()
    }

    /// The global pointer-release collaborator, if any.
    #[must_use]
    pub fn pointer_release(&self) -> Option<&Rc<dyn PointerReleaseSource>> {
        self.pointer_release.as_ref()
    }
}

/// Builder for [`ResolverConfig`].
///
/// ```rust
/// use understory_dynamic_style::{IdentityPolicy, PseudoClass, ResolverConfigBuilder};
///
/// let config = ResolverConfigBuilder::new()
///     .identity_policy(IdentityPolicy::Positional)
///     .pseudo_order([PseudoClass::Active, PseudoClass::Hover, PseudoClass::Focus])
///     .build();
/// assert_eq!(config.identity_policy(), IdentityPolicy::Positional);
/// assert_eq!(config.pseudo_order()[2], PseudoClass::Focus);
/// ```
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the media-query collaborator.
    #[must_use]
    pub fn media_matcher(mut self, matcher: Rc<dyn MediaQueryMatcher>) -> Self {
        self.config.media_matcher = Some(matcher);
        self
    }

    /// Sets the global pointer-release collaborator.
    #[must_use]
    pub fn pointer_release(mut self, source: Rc<dyn PointerReleaseSource>) -> Self {
        self.config.pointer_release = Some(source);
        self
    }

    /// Sets how keyless siblings with dynamic state are treated.
    #[must_use]
    pub fn identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.config.identity_policy = policy;
        self
    }

    /// Sets the pseudo-block layering order; the last entry wins.
    #[must_use]
    pub fn pseudo_order(mut self, order: [PseudoClass; 3]) -> Self {
        self.config.pseudo_order = Some(order);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}
