// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Media-query collaborator interfaces and listener handles.
//!
//! The host supplies a [`MediaQueryMatcher`]. Each query string is matched
//! once per matcher and the resulting [`MediaQueryList`] is cached for the
//! thread. Every component that uses the query attaches its own listener to
//! the shared list; the listener requests a refresh of that component
//! whenever the match state changes.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::store::DynamicStateStore;

/// A change listener attached to a [`MediaQueryList`].
///
/// Listeners are identified by pointer (`Rc::ptr_eq`) for removal.
pub type MediaListener = Rc<dyn Fn()>;

/// Live match state for one query string.
pub trait MediaQueryList {
    /// Current match state.
    fn matches(&self) -> bool;
    /// Attaches a change listener.
    fn add_listener(&self, listener: MediaListener);
    /// Detaches a listener previously passed to [`MediaQueryList::add_listener`].
    fn remove_listener(&self, listener: &MediaListener);
}

/// Source of [`MediaQueryList`]s, e.g. a window's viewport matcher.
pub trait MediaQueryMatcher {
    /// Returns the live match state for `query`.
    fn match_query(&self, query: &str) -> Rc<dyn MediaQueryList>;
}

/// A registered listener for one query string on one component.
#[derive(Clone)]
pub struct MediaQueryHandle {
    inner: Rc<HandleInner>,
}

struct HandleInner {
    query: String,
    list: Rc<dyn MediaQueryList>,
    listener: MediaListener,
    removed: Cell<bool>,
}

impl fmt::Debug for MediaQueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaQueryHandle")
            .field("query", &self.inner.query)
            .field("matches", &self.matches())
            .field("removed", &self.inner.removed.get())
            .finish_non_exhaustive()
    }
}

impl MediaQueryHandle {
    /// Attaches `listener` to `list` and returns the owning handle.
    pub(crate) fn attach(
        query: impl Into<String>,
        list: Rc<dyn MediaQueryList>,
        listener: MediaListener,
    ) -> Self {
        list.add_listener(listener.clone());
        Self {
            inner: Rc::new(HandleInner {
                query: query.into(),
                list,
                listener,
                removed: Cell::new(false),
            }),
        }
    }

    /// The raw query string.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.inner.query
    }

    /// Current match state, read synchronously from the collaborator.
    #[must_use]
    pub fn matches(&self) -> bool {
        self.inner.list.matches()
    }

    /// Returns `true` once [`MediaQueryHandle::remove`] has run.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.inner.removed.get()
    }

    /// Detaches the listener. Repeated calls are no-ops.
    pub fn remove(&self) {
        if !self.inner.removed.replace(true) {
            self.inner.list.remove_listener(&self.inner.listener);
        }
    }
}

type CachedLists = SmallVec<[(Weak<dyn MediaQueryMatcher>, Rc<dyn MediaQueryList>); 1]>;

std::thread_local! {
    static QUERY_LISTS: RefCell<HashMap<String, CachedLists>> = RefCell::new(HashMap::new());
}

/// Returns the cached list for `query` on `matcher`, matching it on first use.
fn query_list(matcher: &Rc<dyn MediaQueryMatcher>, query: &str) -> Rc<dyn MediaQueryList> {
    let weak = Rc::downgrade(matcher);
    let cached = QUERY_LISTS.with(|lists| {
        let mut lists = lists.borrow_mut();
        let entries = lists.get_mut(query)?;
        entries.retain(|(m, _)| m.strong_count() > 0);
        entries
            .iter()
            .find(|(m, _)| Weak::ptr_eq(m, &weak))
            .map(|(_, list)| list.clone())
    });
    if let Some(list) = cached {
        return list;
    }
    log::debug!("matching media query {query:?}");
    let list = matcher.match_query(query);
    QUERY_LISTS.with(|lists| {
        lists
            .borrow_mut()
            .entry(query.into())
            .or_default()
            .push((weak, list.clone()));
    });
    list
}

/// Drops every cached [`MediaQueryList`].
pub(crate) fn clear_query_lists() {
    QUERY_LISTS.with(|lists| lists.borrow_mut().clear());
}

/// Returns the component's listener handle for `query`, registering one with
/// `matcher` on first use.
///
/// The listener holds only weak references, so a handle left attached after
/// its component is gone is inert.
pub(crate) fn bind_media_query(
    store: &DynamicStateStore,
    matcher: &Rc<dyn MediaQueryMatcher>,
    query: &str,
) -> MediaQueryHandle {
    store.register_media_listener(query, || {
        let list = query_list(matcher, query);
        let weak_list = Rc::downgrade(&list);
        let weak_refresh = Rc::downgrade(store.refresher());
        let owned_query = String::from(query);
        let listener: MediaListener = Rc::new(move || {
            let matches = weak_list.upgrade().map(|list| list.matches());
            log::debug!("media query {owned_query:?} changed, matches: {matches:?}");
            if let Some(refresh) = weak_refresh.upgrade() {
                refresh.request_refresh();
            }
        });
        MediaQueryHandle::attach(query, list, listener)
    })
}
