// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of injected pseudo-state handlers with caller handlers.

use alloc::rc::Rc;

use crate::element::{Event, EventSlot, Handler, HandlerSlots};
use crate::extract::PseudoClass;
use crate::identity::ElementIdentity;
use crate::store::DynamicStateStore;

/// Returns a handler that runs `original` (if any) and then `injected`.
///
/// Both receive the same event. The result is a new closure on every call.
#[must_use]
pub fn compose_handler(original: Option<Handler>, injected: Handler) -> Handler {
    match original {
        Some(original) => Rc::new(move |event: &Event| {
            original(event);
            injected(event);
        }),
        None => injected,
    }
}

/// The slots that drive `pseudo`, paired with the flag value each one sets.
///
/// `:active` is only set here; clearing it is left to the global
/// pointer-release fan-out.
#[must_use]
pub fn slots_for(pseudo: PseudoClass) -> &'static [(EventSlot, bool)] {
    match pseudo {
        PseudoClass::Hover => &[(EventSlot::MouseEnter, true), (EventSlot::MouseLeave, false)],
        PseudoClass::Focus => &[(EventSlot::Focus, true), (EventSlot::Blur, false)],
        PseudoClass::Active => &[(EventSlot::MouseDown, true)],
    }
}

/// Wraps every slot that drives `pseudo` so it also updates `identity`'s flag.
pub(crate) fn wire_pseudo(
    handlers: &mut HandlerSlots,
    store: &Rc<DynamicStateStore>,
    identity: &ElementIdentity,
    pseudo: PseudoClass,
) {
    for &(slot, value) in slots_for(pseudo) {
        let store = store.clone();
        let identity = identity.clone();
        let injected: Handler = Rc::new(move |_: &Event| {
            store.set_flag(&identity, pseudo, value);
        });
        let composed = compose_handler(handlers.take(slot), injected);
        handlers.set(slot, composed);
    }
}
