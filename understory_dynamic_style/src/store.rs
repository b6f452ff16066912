// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-component dynamic state that outlives individual resolution passes.
//!
//! Element trees are rebuilt on every pass, but pointer and focus state must
//! survive. [`DynamicStateStore`] keeps that state keyed by
//! [`ElementIdentity`]. Identities are mapped to compact [`SlotId`]s that
//! index a dense state table, and the store also owns the component's
//! media-query listener handles.
//!
//! Entries for elements that disappear from the tree are kept. They are
//! small, and pruning them would churn state for elements that are only
//! conditionally rendered.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;

use crate::extract::PseudoClass;
use crate::identity::ElementIdentity;
use crate::media::MediaQueryHandle;

bitflags::bitflags! {
    /// Interaction flags tracked for one element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PseudoState: u8 {
        /// Pointer is over the element.
        const HOVER  = 0b0000_0001;
        /// Element has focus.
        const FOCUS  = 0b0000_0010;
        /// Pointer went down on the element and has not been released.
        const ACTIVE = 0b0000_0100;
    }
}

impl PseudoState {
    /// The flag tracking `pseudo`.
    #[must_use]
    pub const fn of(pseudo: PseudoClass) -> Self {
        match pseudo {
            PseudoClass::Hover => Self::HOVER,
            PseudoClass::Focus => Self::FOCUS,
            PseudoClass::Active => Self::ACTIVE,
        }
    }

    /// Returns `true` if `pseudo` is currently on.
    #[must_use]
    pub fn is(self, pseudo: PseudoClass) -> bool {
        self.contains(Self::of(pseudo))
    }
}

/// The re-render collaborator of a component.
///
/// Calling [`RefreshRequest::request_refresh`] asks the host to schedule a
/// new resolution pass. The resolver never calls it during a pass, only from
/// injected handlers and listeners.
pub trait RefreshRequest {
    /// Requests a new resolution pass for the owning component.
    fn request_refresh(&self);
}

impl<F: Fn()> RefreshRequest for F {
    fn request_refresh(&self) {
        self();
    }
}

/// Compact index of an element's entry in a [`DynamicStateStore`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct SlotId(usize);

impl SlotId {
    /// Returns this id as a `usize` index.
    #[inline]
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
struct StateTable {
    slots: HashMap<ElementIdentity, SlotId>,
    states: Vec<PseudoState>,
}

impl StateTable {
    fn slot(&mut self, identity: &ElementIdentity) -> SlotId {
        if let Some(&slot) = self.slots.get(identity) {
            return slot;
        }
        let slot = SlotId(self.states.len());
        self.states.push(PseudoState::empty());
        self.slots.insert(identity.clone(), slot);
        slot
    }
}

/// Dynamic state owned by one component instance.
pub struct DynamicStateStore {
    table: RefCell<StateTable>,
    media: RefCell<HashMap<String, MediaQueryHandle>>,
    refresh: Rc<dyn RefreshRequest>,
    /// Generation of the pointer-release hub this store is registered with.
    pub(crate) release_generation: Cell<Option<u64>>,
}

impl fmt::Debug for DynamicStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicStateStore")
            .field("table", &self.table.borrow())
            .field("media", &self.media.borrow().keys().collect::<Vec<_>>())
            .field("release_generation", &self.release_generation.get())
            .finish_non_exhaustive()
    }
}

impl DynamicStateStore {
    /// Creates an empty store that reports changes to `refresh`.
    #[must_use]
    pub fn new(refresh: Rc<dyn RefreshRequest>) -> Self {
        Self {
            table: RefCell::new(StateTable::default()),
            media: RefCell::new(HashMap::new()),
            refresh,
            release_generation: Cell::new(None),
        }
    }

    /// Returns the state for `identity`, inserting a cleared entry if absent.
    pub fn get_or_init(&self, identity: &ElementIdentity) -> PseudoState {
        let mut table = self.table.borrow_mut();
        let slot = table.slot(identity);
        table.states[slot.as_usize()]
    }

    /// Returns the state for `identity` without inserting.
    #[must_use]
    pub fn state_of(&self, identity: &ElementIdentity) -> Option<PseudoState> {
        let table = self.table.borrow();
        table
            .slots
            .get(identity)
            .map(|slot| table.states[slot.as_usize()])
    }

    /// Returns the slot assigned to `identity`, if any.
    #[must_use]
    pub fn slot_of(&self, identity: &ElementIdentity) -> Option<SlotId> {
        self.table.borrow().slots.get(identity).copied()
    }

    /// Sets or clears one flag for `identity` and requests a refresh.
    pub fn set_flag(&self, identity: &ElementIdentity, pseudo: PseudoClass, value: bool) {
        {
            let mut table = self.table.borrow_mut();
            let slot = table.slot(identity);
            table.states[slot.as_usize()].set(PseudoState::of(pseudo), value);
        }
        log::trace!("{identity}: {} = {value}", pseudo.key());
        self.refresh.request_refresh();
    }

    /// Clears `ACTIVE` on every element after a global pointer release.
    ///
    /// Requests one refresh if anything changed and returns whether it did.
    /// A release with no active element is a no-op.
    pub fn clear_active_on_release(&self) -> bool {
        let cleared = {
            let mut table = self.table.borrow_mut();
            let mut cleared = 0_usize;
            for state in &mut table.states {
                if state.contains(PseudoState::ACTIVE) {
                    state.remove(PseudoState::ACTIVE);
                    cleared += 1;
                }
            }
            cleared
        };
        if cleared == 0 {
            return false;
        }
        log::debug!("pointer release cleared {cleared} active element(s)");
        self.refresh.request_refresh();
        true
    }

    /// Returns the listener handle for `query`, creating it with `factory`
    /// only if this store has none.
    pub fn register_media_listener(
        &self,
        query: &str,
        factory: impl FnOnce() -> MediaQueryHandle,
    ) -> MediaQueryHandle {
        if let Some(handle) = self.media.borrow().get(query) {
            return handle.clone();
        }
        let handle = factory();
        log::debug!("registered media listener for {query:?}");
        self.media
            .borrow_mut()
            .insert(query.into(), handle.clone());
        handle
    }

    /// Removes every registered media listener.
    ///
    /// Safe to call when nothing was registered. Later passes register fresh
    /// listeners.
    pub fn remove_all_media_listeners(&self) {
        let handles: Vec<MediaQueryHandle> =
            self.media.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in handles {
            handle.remove();
        }
    }

    /// Number of elements with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.borrow().states.len()
    }

    /// Returns `true` if no element has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of registered media listeners.
    #[must_use]
    pub fn media_listener_count(&self) -> usize {
        self.media.borrow().len()
    }

    pub(crate) fn refresher(&self) -> &Rc<dyn RefreshRequest> {
        &self.refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_store() -> (DynamicStateStore, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let store = DynamicStateStore::new(Rc::new(move || c.set(c.get() + 1)));
        (store, count)
    }

    #[test]
    fn get_or_init_inserts_once() {
        let (store, _) = counting_store();
        let id = ElementIdentity::from("/a");
        assert_eq!(store.state_of(&id), None);
        assert_eq!(store.get_or_init(&id), PseudoState::empty());
        assert_eq!(store.get_or_init(&id), PseudoState::empty());
        assert_eq!(store.len(), 1);
        assert_eq!(store.slot_of(&id).map(SlotId::as_usize), Some(0));
    }

    #[test]
    fn set_flag_refreshes() {
        let (store, count) = counting_store();
        let id = ElementIdentity::from("/a");
        store.set_flag(&id, PseudoClass::Hover, true);
        assert!(store.get_or_init(&id).is(PseudoClass::Hover));
        assert_eq!(count.get(), 1);
        store.set_flag(&id, PseudoClass::Hover, false);
        assert!(!store.get_or_init(&id).is(PseudoClass::Hover));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn release_without_active_is_silent() {
        let (store, count) = counting_store();
        let a = ElementIdentity::from("/a");
        let b = ElementIdentity::from("/b");
        store.set_flag(&a, PseudoClass::Active, true);
        store.set_flag(&b, PseudoClass::Focus, true);
        assert_eq!(count.get(), 2);

        assert!(store.clear_active_on_release());
        assert_eq!(count.get(), 3);
        assert_eq!(store.state_of(&a), Some(PseudoState::empty()));
        assert_eq!(store.state_of(&b), Some(PseudoState::FOCUS));

        assert!(!store.clear_active_on_release());
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn teardown_without_listeners_is_noop() {
        let (store, count) = counting_store();
        store.remove_all_media_listeners();
        assert_eq!(store.media_listener_count(), 0);
        assert_eq!(count.get(), 0);
    }
}
