// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared global pointer-release subscription.
//!
//! `:active` is set by an element's own pointer-down handler, but the pointer
//! may be released anywhere. Every component that renders an `:active` style
//! registers its store here once, and the hub subscribes to the host's
//! [`PointerReleaseSource`] at most once. Each release fans out to every
//! registered store.
//!
//! The hub is thread-local. Hosts are single-threaded, so this is the whole
//! process from the resolver's point of view.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::store::DynamicStateStore;

/// Host primitive that reports global pointer releases.
pub trait PointerReleaseSource {
    /// Registers `callback` to run on every global pointer release.
    ///
    /// The resolver calls this at most once per thread, until
    /// [`reset_global_state`] is called.
    fn subscribe(&self, callback: Rc<dyn Fn()>);
}

#[derive(Default)]
struct ReleaseHub {
    generation: u64,
    subscribed: bool,
    stores: Vec<Weak<DynamicStateStore>>,
}

std::thread_local! {
    static HUB: RefCell<ReleaseHub> = RefCell::new(ReleaseHub::default());
}

/// Registers `store` for release fan-out, subscribing to `source` on first use.
pub(crate) fn register(
    store: &Rc<DynamicStateStore>,
    source: Option<&Rc<dyn PointerReleaseSource>>,
) {
    let subscribe_now = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        if store.release_generation.get() != Some(hub.generation) {
            store.release_generation.set(Some(hub.generation));
            hub.stores.push(Rc::downgrade(store));
        }
        if hub.subscribed || source.is_none() {
            return false;
        }
        hub.subscribed = true;
        true
    });
    if subscribe_now && let Some(source) = source {
        log::debug!("subscribing to global pointer release");
        source.subscribe(Rc::new(dispatch_global_release));
    }
}

/// Removes `store` from the fan-out list.
pub(crate) fn unregister(store: &DynamicStateStore) {
    HUB.with(|hub| {
        hub.borrow_mut()
            .stores
            .retain(|weak| !core::ptr::eq(weak.as_ptr(), store));
    });
    store.release_generation.set(None);
}

/// Delivers one global pointer release to every registered component.
///
/// This is the callback handed to [`PointerReleaseSource::subscribe`]. Hosts
/// that receive releases some other way may call it directly. Components
/// with no active element are left alone and are not refreshed.
pub fn dispatch_global_release() {
    let stores: Vec<Rc<DynamicStateStore>> = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        hub.stores.retain(|weak| weak.strong_count() > 0);
        hub.stores.iter().filter_map(Weak::upgrade).collect()
    });
    for store in stores {
        store.clear_active_on_release();
    }
}

/// Clears all process-wide state: the release subscription, the list of
/// registered components, and the cached media-query lists.
///
/// For test isolation only. After a reset the next `:active` style subscribes
/// to its release source again, and each media query is matched afresh.
pub fn reset_global_state() {
    crate::media::clear_query_lists();
    HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        let generation = hub.generation.wrapping_add(1);
        *hub = ReleaseHub {
            generation,
            ..ReleaseHub::default()
        };
    });
}
