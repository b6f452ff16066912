// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fake host collaborators shared by the integration tests.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test binary uses every fake."
)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use understory_dynamic_style::{
    Element, MediaListener, MediaQueryList, MediaQueryMatcher, PointerReleaseSource,
    StyledComponent,
};

/// A component whose refresh requests are counted.
pub(crate) fn counting_component() -> (StyledComponent, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (StyledComponent::new(move || c.set(c.get() + 1)), count)
}

/// Reads a text property from an element's resolved style.
pub(crate) fn text<'a>(el: &'a Element, key: &str) -> Option<&'a str> {
    el.style_map()?.get(key)?.as_text()
}

#[derive(Default)]
pub(crate) struct FakeList {
    pub(crate) matches: Cell<bool>,
    pub(crate) listeners: RefCell<Vec<MediaListener>>,
    pub(crate) adds: Cell<u32>,
    pub(crate) removes: Cell<u32>,
}

impl FakeList {
    /// Flips the match state and notifies every listener.
    pub(crate) fn set_matches(&self, matches: bool) {
        self.matches.set(matches);
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl MediaQueryList for FakeList {
    fn matches(&self) -> bool {
        self.matches.get()
    }

    fn add_listener(&self, listener: MediaListener) {
        self.adds.set(self.adds.get() + 1);
        self.listeners.borrow_mut().push(listener);
    }

    fn remove_listener(&self, listener: &MediaListener) {
        self.removes.set(self.removes.get() + 1);
        self.listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }
}

/// Hands out one fresh [`FakeList`] per `match_query` call and records them.
///
/// The resolver caches lists per query, so a second list for the same query
/// only shows up after [`understory_dynamic_style::reset_global_state`].
#[derive(Default)]
pub(crate) struct FakeMatcher {
    pub(crate) initial: RefCell<HashMap<String, bool>>,
    pub(crate) lists: RefCell<Vec<(String, Rc<FakeList>)>>,
}

impl FakeMatcher {
    pub(crate) fn with_initial(query: &str, matches: bool) -> Rc<Self> {
        let matcher = Self::default();
        matcher.initial.borrow_mut().insert(query.into(), matches);
        Rc::new(matcher)
    }

    /// Every list created for `query`, in creation order.
    pub(crate) fn lists_for(&self, query: &str) -> Vec<Rc<FakeList>> {
        self.lists
            .borrow()
            .iter()
            .filter(|(q, _)| q == query)
            .map(|(_, list)| list.clone())
            .collect()
    }
}

impl MediaQueryMatcher for FakeMatcher {
    fn match_query(&self, query: &str) -> Rc<dyn MediaQueryList> {
        let list = Rc::new(FakeList::default());
        let initial = self.initial.borrow().get(query).copied().unwrap_or(false);
        list.matches.set(initial);
        self.lists.borrow_mut().push((query.into(), list.clone()));
        list
    }
}

/// Records subscriptions and lets a test fire a release.
#[derive(Default)]
pub(crate) struct FakeRelease {
    pub(crate) subscriptions: Cell<u32>,
    pub(crate) callbacks: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl FakeRelease {
    pub(crate) fn release(&self) {
        let callbacks = self.callbacks.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }
}

impl PointerReleaseSource for FakeRelease {
    fn subscribe(&self, callback: Rc<dyn Fn()>) {
        self.subscriptions.set(self.subscriptions.get() + 1);
        self.callbacks.borrow_mut().push(callback);
    }
}
