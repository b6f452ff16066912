// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree descriptors handed to the resolver.
//!
//! Trees are rebuilt by the caller before every resolution pass. Only the
//! explicit `key`/`ref_name` and sibling position are stable across passes;
//! the resolver never relies on the identity of the element values themselves.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::value::{StyleMap, StyleValue};

/// An event handler attached to an element slot.
///
/// Handlers are shared, single-threaded closures. Resolved handlers may be
/// fresh closures on every pass; do not compare them by pointer.
pub type Handler = Rc<dyn Fn(&Event)>;

/// The handler slots the resolver knows how to compose with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventSlot {
    /// Pointer pressed on the element.
    MouseDown,
    /// Pointer released on the element.
    MouseUp,
    /// Pointer entered the element.
    MouseEnter,
    /// Pointer left the element.
    MouseLeave,
    /// Element gained focus.
    Focus,
    /// Element lost focus.
    Blur,
}

impl EventSlot {
    /// All slots, in storage order.
    pub const ALL: [Self; 6] = [
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::Focus,
        Self::Blur,
    ];

    const fn index(self) -> usize {
        match self {
            Self::MouseDown => 0,
            Self::MouseUp => 1,
            Self::MouseEnter => 2,
            Self::MouseLeave => 3,
            Self::Focus => 4,
            Self::Blur => 5,
        }
    }
}

/// An event delivered to a handler.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The slot this event was dispatched to.
    pub slot: EventSlot,
    /// Host-defined payload, passed through untouched.
    pub payload: StyleValue,
}

impl Event {
    /// Creates an event with no payload.
    #[must_use]
    pub fn new(slot: EventSlot) -> Self {
        Self {
            slot,
            payload: StyleValue::Null,
        }
    }
}

/// One optional [`Handler`] per [`EventSlot`].
#[derive(Clone, Default)]
pub struct HandlerSlots {
    slots: [Option<Handler>; 6],
}

impl fmt::Debug for HandlerSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<EventSlot> = EventSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_some())
            .collect();
        f.debug_struct("HandlerSlots").field("bound", &bound).finish()
    }
}

impl HandlerSlots {
    /// Returns the handler bound to `slot`.
    #[must_use]
    pub fn get(&self, slot: EventSlot) -> Option<&Handler> {
        self.slots[slot.index()].as_ref()
    }

    /// Binds `handler` to `slot`, returning the previous handler.
    pub fn set(&mut self, slot: EventSlot, handler: Handler) -> Option<Handler> {
        self.slots[slot.index()].replace(handler)
    }

    /// Removes and returns the handler bound to `slot`.
    pub fn take(&mut self, slot: EventSlot) -> Option<Handler> {
        self.slots[slot.index()].take()
    }

    /// Returns `true` if no slot is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Invokes the handler bound to `event.slot`, returning whether one ran.
    pub fn dispatch(&self, event: &Event) -> bool {
        match self.get(event.slot) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

/// Element properties.
#[derive(Clone, Debug, Default)]
pub struct Props {
    /// The style declaration: a mapping, a style array, or nothing.
    ///
    /// After resolution this is either a flat [`StyleValue::Map`] or `None`.
    pub style: Option<StyleValue>,
    /// Child nodes in render order.
    pub children: Vec<Node>,
    /// Event handlers.
    pub handlers: HandlerSlots,
    /// Any other host properties, passed through untouched.
    pub attributes: StyleMap,
}

/// A resolvable element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Host element type, e.g. `"div"`.
    pub tag: String,
    /// Explicit key, stable across passes.
    pub key: Option<String>,
    /// Explicit ref name, stable across passes.
    pub ref_name: Option<String>,
    /// Element properties.
    pub props: Props,
}

impl Element {
    /// Creates an element with no key, ref, style, children, or handlers.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            ref_name: None,
            props: Props::default(),
        }
    }

    /// Sets the explicit key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the explicit ref name.
    #[must_use]
    pub fn with_ref(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// Sets the style declaration.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<StyleValue>) -> Self {
        self.props.style = Some(style.into());
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.props.children.push(child.into());
        self
    }

    /// Binds a handler to `slot`.
    #[must_use]
    pub fn on(mut self, slot: EventSlot, handler: impl Fn(&Event) + 'static) -> Self {
        self.props.handlers.set(slot, Rc::new(handler));
        self
    }

    /// Returns the resolved flat style, if the element has one.
    #[must_use]
    pub fn style_map(&self) -> Option<&StyleMap> {
        self.props.style.as_ref().and_then(StyleValue::as_map)
    }

    /// Dispatches an event with no payload to this element's handler for `slot`.
    pub fn fire(&self, slot: EventSlot) -> bool {
        self.props.handlers.dispatch(&Event::new(slot))
    }

    /// Returns the `index`-th child if it is an element.
    #[must_use]
    pub fn child_element(&self, index: usize) -> Option<&Self> {
        match self.props.children.get(index) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }
}

/// A child of an element.
#[derive(Clone, Debug)]
pub enum Node {
    /// A resolvable element.
    Element(Element),
    /// Text content.
    Text(String),
    /// Any other host value; never visited.
    Opaque(StyleValue),
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}
