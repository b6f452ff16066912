// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dynamic Style: pseudo-class and media-query styles for element
//! trees that are rebuilt on every render.
//!
//! Hosts that render from plain key-value styles have no notion of `:hover`,
//! `:focus`, `:active`, or media queries. This crate fills that gap. A
//! [`Resolver`] walks a freshly built [`Element`] tree, flattens style arrays,
//! layers the blocks whose condition currently holds, and wraps the
//! element's handlers so that interaction updates per-component state and
//! asks the host for a new pass.
//!
//! ## Core Concepts
//!
//! ### Styles
//!
//! A style is a [`StyleMap`], or a [`StyleValue::List`] of maps that is merged
//! left to right by [`merge_styles`]. Reserved keys carry conditional blocks:
//!
//! - `":hover"`, `":focus"`, `":active"`: see [`PseudoClass`].
//! - Any key starting with `(`: a media query, e.g. `"(max-width: 600px)"`.
//!
//! Precedence is fixed: media blocks override pseudo blocks, which override
//! the base style.
//!
//! ### Identity and state
//!
//! Elements are rebuilt every pass, so state cannot live on them. Each styled
//! element gets an [`ElementIdentity`] derived from its ancestor path and its
//! key, ref, or position. The component's [`DynamicStateStore`] keeps a
//! [`PseudoState`] per identity across passes. Two siblings that both need
//! state and share an identity abort the pass with
//! [`ResolveError::AmbiguousIdentity`].
//!
//! ### Collaborators
//!
//! - [`RefreshRequest`]: asks the host to re-render a component.
//! - [`MediaQueryMatcher`]: reports and watches media-query match state.
//!   Each component registers one listener per distinct query string.
//! - [`PointerReleaseSource`]: global pointer release, subscribed at most once
//!   per thread and fanned out to every component that renders `:active`.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_dynamic_style::{
//!     Element, EventSlot, Resolver, ResolverConfig, StyleMap, StyleValue, StyledComponent,
//!     dispatch_global_release,
//! };
//!
//! let refreshes = Rc::new(Cell::new(0));
//! let counter = refreshes.clone();
//! let component = StyledComponent::new(move || counter.set(counter.get() + 1));
//! let resolver = Resolver::new(ResolverConfig::default());
//!
//! let render = || {
//!     Element::new("button").with_style(
//!         StyleMap::new()
//!             .with("background", "blue")
//!             .with(":active", StyleMap::new().with("background", "red")),
//!     )
//! };
//! let background = |el: &Element| el.style_map().unwrap().get("background").cloned();
//!
//! let button = resolver.resolve(&component, Some(render())).unwrap().unwrap();
//! assert_eq!(background(&button), Some(StyleValue::from("blue")));
//!
//! button.fire(EventSlot::MouseDown);
//! assert_eq!(refreshes.get(), 1);
//! let button = resolver.resolve(&component, Some(render())).unwrap().unwrap();
//! assert_eq!(background(&button), Some(StyleValue::from("red")));
//!
//! dispatch_global_release();
//! let button = resolver.resolve(&component, Some(render())).unwrap().unwrap();
//! assert_eq!(background(&button), Some(StyleValue::from("blue")));
//! assert_eq!(refreshes.get(), 2);
//! # let _ = button;
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade: `trace` per visited element,
//! `debug` for state attachment, listener registration and skipped malformed
//! style entries, and `warn` for media blocks with no matcher configured.

extern crate alloc;

mod component;
mod config;
mod element;
mod error;
mod extract;
mod handlers;
mod identity;
mod media;
mod merge;
mod release;
mod resolve;
mod store;
mod value;

pub use component::StyledComponent;
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use element::{Element, Event, EventSlot, Handler, HandlerSlots, Node, Props};
pub use error::{AmbiguityCause, ResolveError};
pub use extract::{ExtractedStyle, PseudoClass, SpecialKey, extract_special, is_media_query};
pub use handlers::{compose_handler, slots_for};
pub use identity::{ElementIdentity, IdentityPolicy, IdentitySource, derive_identity};
pub use media::{MediaListener, MediaQueryHandle, MediaQueryList, MediaQueryMatcher};
pub use merge::{merge_styles, normalize_style};
pub use release::{PointerReleaseSource, dispatch_global_release, reset_global_state};
pub use resolve::Resolver;
pub use store::{DynamicStateStore, PseudoState, RefreshRequest, SlotId};
pub use value::{StyleMap, StyleValue};
