// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-instance attachment point for dynamic state.

use alloc::rc::Rc;
use core::cell::OnceCell;
use core::fmt;

use crate::release;
use crate::store::{DynamicStateStore, RefreshRequest};

/// One component instance, as seen by the resolver.
///
/// Create one per host component instance and keep it for the instance's
/// lifetime. Its [`DynamicStateStore`] is created on the first resolution
/// pass. Call [`StyledComponent::teardown`] when the instance is discarded.
pub struct StyledComponent {
    refresh: Rc<dyn RefreshRequest>,
    store: OnceCell<Rc<DynamicStateStore>>,
}

impl fmt::Debug for StyledComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledComponent")
            .field("store", &self.store.get())
            .finish_non_exhaustive()
    }
}

impl StyledComponent {
    /// Creates a component that requests re-renders through `refresh`.
    #[must_use]
    pub fn new(refresh: impl RefreshRequest + 'static) -> Self {
        Self {
            refresh: Rc::new(refresh),
            store: OnceCell::new(),
        }
    }

    /// Returns the dynamic state, if a resolution pass has created it.
    #[must_use]
    pub fn store(&self) -> Option<&Rc<DynamicStateStore>> {
        self.store.get()
    }

    pub(crate) fn store_or_init(&self) -> &Rc<DynamicStateStore> {
        self.store.get_or_init(|| {
            log::debug!("attaching dynamic style state");
            Rc::new(DynamicStateStore::new(self.refresh.clone()))
        })
    }

    /// Releases everything the resolver registered for this instance.
    ///
    /// Removes all media listeners and leaves the global release fan-out.
    /// Safe to call repeatedly, or before any pass has run.
    pub fn teardown(&self) {
        if let Some(store) = self.store.get() {
            store.remove_all_media_listeners();
            release::unregister(store);
        }
    }
}
