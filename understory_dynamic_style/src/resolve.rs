// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resolution pass: a depth-first walk that rewrites styles in place.

use alloc::rc::Rc;

use crate::component::StyledComponent;
use crate::config::ResolverConfig;
use crate::element::{Element, Node};
use crate::error::ResolveError;
use crate::extract::{ExtractedStyle, PseudoClass, extract_special};
use crate::handlers;
use crate::identity::{ElementIdentity, IdentitySource, SiblingGuard, derive_identity};
use crate::media::bind_media_query;
use crate::merge::normalize_style;
use crate::release;
use crate::store::{DynamicStateStore, PseudoState};
use crate::value::{StyleMap, StyleValue};

/// Resolves pseudo-class and media-query styles over element trees.
///
/// For every element that carries a style, a pass:
///
/// 1. flattens style arrays,
/// 2. splits off `:hover`/`:focus`/`:active` and media-query blocks,
/// 3. layers matched blocks over the base style (media over pseudo over base),
/// 4. wraps the element's handlers so interaction updates the component's
///    [`DynamicStateStore`] and requests a refresh.
///
/// The resolver itself is stateless; all state lives in the
/// [`StyledComponent`] passed to each call.
///
/// # Example
///
/// ```rust
/// use understory_dynamic_style::{
///     Element, EventSlot, Resolver, ResolverConfig, StyleMap, StyleValue, StyledComponent,
/// };
///
/// let resolver = Resolver::new(ResolverConfig::default());
/// let component = StyledComponent::new(|| {});
///
/// let render = || {
///     Element::new("button").with_style(
///         StyleMap::new()
///             .with("background", "blue")
///             .with(":hover", StyleMap::new().with("background", "green")),
///     )
/// };
///
/// let button = resolver.resolve(&component, Some(render())).unwrap().unwrap();
/// assert_eq!(button.style_map().unwrap().get("background"), Some(&StyleValue::from("blue")));
///
/// button.fire(EventSlot::MouseEnter);
/// let button = resolver.resolve(&component, Some(render())).unwrap().unwrap();
/// assert_eq!(button.style_map().unwrap().get("background"), Some(&StyleValue::from("green")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Runs one resolution pass over `root` on behalf of `component`.
    ///
    /// An absent root is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::AmbiguousIdentity`] if two siblings that both
    /// need dynamic state resolve to the same identity. The tree is then
    /// partially rewritten and should be discarded.
    pub fn resolve(
        &self,
        component: &StyledComponent,
        root: Option<Element>,
    ) -> Result<Option<Element>, ResolveError> {
        let Some(mut root) = root else {
            return Ok(None);
        };
        self.resolve_in_place(component, &mut root)?;
        Ok(Some(root))
    }

    /// Like [`Resolver::resolve`], but rewrites a borrowed root.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve_in_place(
        &self,
        component: &StyledComponent,
        root: &mut Element,
    ) -> Result<(), ResolveError> {
        let mut pass = Pass {
            config: &self.config,
            store: component.store_or_init(),
            warned_no_matcher: false,
        };
        let (identity, _) = derive_identity(&ElementIdentity::root_prefix(), root, 0);
        pass.visit(root, identity, None)
    }
}

/// State for one walk.
struct Pass<'a> {
    config: &'a ResolverConfig,
    store: &'a Rc<DynamicStateStore>,
    warned_no_matcher: bool,
}

/// A sibling's position together with the guard for its sibling group.
type Claim<'g, 'p> = (&'g mut SiblingGuard<'p>, usize);

impl Pass<'_> {
    fn visit(
        &mut self,
        element: &mut Element,
        identity: ElementIdentity,
        claim: Option<Claim<'_, '_>>,
    ) -> Result<(), ResolveError> {
        if let Some(style) = element.props.style.take() {
            let flat = normalize_style(&style).unwrap_or_else(|| {
                log::debug!("{identity}: ignoring non-mapping style {style:?}");
                StyleMap::new()
            });
            let extracted = extract_special(&flat);
            if extracted.needs_dynamic_state()
                && let Some((guard, index)) = claim
            {
                let source = IdentitySource::of(element, index);
                guard.claim(&identity, &source, index)?;
            }
            log::trace!("{identity}: resolving <{}>", element.tag);
            let composed = self.compose(&identity, &extracted);
            element.props.style = Some(StyleValue::Map(composed));
            self.wire(element, &identity, &extracted);
        }

        let mut guard = SiblingGuard::new(&identity, self.config.identity_policy());
        for (index, child) in element.props.children.iter_mut().enumerate() {
            if let Node::Element(child) = child {
                let (child_identity, _) = derive_identity(&identity, child, index);
                self.visit(child, child_identity, Some((&mut guard, index)))?;
            }
        }
        Ok(())
    }

    /// Layers matched pseudo blocks, then matched media blocks, over the base.
    fn compose(&mut self, identity: &ElementIdentity, extracted: &ExtractedStyle) -> StyleMap {
        let mut composed = extracted.base.clone();

        if extracted.has_pseudo() {
            let state = self.store.get_or_init(identity);
            for pseudo in self.config.pseudo_order() {
                if state.contains(PseudoState::of(pseudo))
                    && let Some(block) = extracted.pseudo(pseudo)
                {
                    composed.overlay(&block_properties(identity, block));
                }
            }
        }

        for (query, block) in extracted.media() {
            let Some(matcher) = self.config.media_matcher() else {
                if !self.warned_no_matcher {
                    log::warn!("{identity}: media query {query:?} ignored, no matcher configured");
                    self.warned_no_matcher = true;
                }
                continue;
            };
            let handle = bind_media_query(self.store, matcher, query);
            if handle.matches() {
                composed.overlay(&block_properties(identity, block));
            }
        }

        composed
    }

    fn wire(&self, element: &mut Element, identity: &ElementIdentity, extracted: &ExtractedStyle) {
        for pseudo in PseudoClass::ALL {
            if extracted.pseudo(pseudo).is_some() {
                handlers::wire_pseudo(&mut element.props.handlers, self.store, identity, pseudo);
            }
        }
        if extracted.pseudo(PseudoClass::Active).is_some() {
            release::register(self.store, self.config.pointer_release());
        }
    }
}

/// Flattens a special block and drops any special keys nested inside it.
fn block_properties(identity: &ElementIdentity, block: &StyleValue) -> StyleMap {
    let Some(flat) = normalize_style(block) else {
        log::debug!("{identity}: ignoring non-mapping style block {block:?}");
        return StyleMap::new();
    };
    let nested = extract_special(&flat);
    if nested.needs_dynamic_state() {
        log::trace!("{identity}: dropping nested special keys in style block");
    }
    nested.base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::EventSlot;

    fn hover_button() -> Element {
        Element::new("button").with_style(
            StyleMap::new()
                .with("color", "blue")
                .with(":hover", StyleMap::new().with("color", "red"))
                .with(":focus", StyleMap::new().with("color", "green")),
        )
    }

    fn color(el: &Element) -> Option<&str> {
        el.style_map()?.get("color")?.as_text()
    }

    #[test]
    fn later_pseudo_in_order_wins() {
        let resolver = Resolver::default();
        let component = StyledComponent::new(|| {});
        let el = resolver.resolve(&component, Some(hover_button())).unwrap().unwrap();
        el.fire(EventSlot::MouseEnter);
        el.fire(EventSlot::Focus);

        let el = resolver.resolve(&component, Some(hover_button())).unwrap().unwrap();
        assert_eq!(color(&el), Some("green"));

        let reversed = Resolver::new(
            crate::config::ResolverConfigBuilder::new()
                .pseudo_order([PseudoClass::Focus, PseudoClass::Hover, PseudoClass::Active])
                .build(),
        );
        let el = reversed.resolve(&component, Some(hover_button())).unwrap().unwrap();
        assert_eq!(color(&el), Some("red"));
    }

    #[test]
    fn nested_special_keys_are_dropped() {
        let block = StyleValue::List(alloc::vec![
            StyleMap::new().with("color", "red").into(),
            StyleMap::new()
                .with(":hover", StyleMap::new().with("color", "pink"))
                .into(),
        ]);
        let props = block_properties(&ElementIdentity::from("/a"), &block);
        assert_eq!(props, StyleMap::new().with("color", "red"));
    }

    #[test]
    fn leaf_style_resolves_to_empty_map() {
        let resolver = Resolver::default();
        let component = StyledComponent::new(|| {});
        let el = resolver
            .resolve(&component, Some(Element::new("div").with_style("color: red")))
            .unwrap()
            .unwrap();
        assert_eq!(el.style_map(), Some(&StyleMap::new()));
    }

    #[test]
    fn media_without_matcher_never_applies() {
        let resolver = Resolver::default();
        let component = StyledComponent::new(|| {});
        let el = Element::new("div").with_style(
            StyleMap::new()
                .with("width", 10.0)
                .with("(min-width: 1px)", StyleMap::new().with("width", 20.0)),
        );
        let el = resolver.resolve(&component, Some(el)).unwrap().unwrap();
        assert_eq!(el.style_map().unwrap().get("width"), Some(&StyleValue::Number(10.0)));
        assert_eq!(component.store().unwrap().media_listener_count(), 0);
    }
}
