/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Session registry: the keyed cache of live engine instances.
//!
//! Owns every engine handle in the process. At most one live instance exists
//! per key, at most one instance is visible at a time, and removal always
//! detaches the instance from the display surface before it is destroyed.
//! Callers get handles only as borrows for the duration of a call; the one
//! crate-internal exception is the navigation poller, which holds a shared
//! handle between `start` and `stop`.

use std::collections::HashMap;
use std::rc::Rc;

use log::info;

use crate::engine::{ContentEngine, EngineConfig, EngineError, EngineSession, NavigationObserver};
use crate::session::interceptor::EventInterceptor;
use crate::session::key::SessionKey;
use crate::session::reconcile::ReconciliationRouter;

struct SessionEntry {
    handle: Rc<dyn EngineSession>,
    interceptor: Rc<EventInterceptor>,
}

pub struct SessionRegistry {
    engine: Rc<dyn ContentEngine>,
    router: Rc<ReconciliationRouter>,
    entries: HashMap<SessionKey, SessionEntry>,
    visible: Option<SessionKey>,
}

impl SessionRegistry {
    pub fn new(engine: Rc<dyn ContentEngine>, router: Rc<ReconciliationRouter>) -> Self {
        Self {
            engine,
            router,
            entries: HashMap::new(),
            visible: None,
        }
    }

    /// Return the instance for `key`, creating it on first access.
    ///
    /// Creation constructs the engine instance under the given configuration,
    /// installs the event interceptor, inserts the entry hidden, and issues
    /// the initial navigation if an address was supplied. Re-invocation with
    /// a present key is a pure lookup with no navigation and no observer
    /// changes; switching visibility back and forth must never reload a page.
    ///
    /// A construction failure propagates to the caller and leaves the
    /// registry unchanged: no partial entry is ever registered.
    pub fn get_or_create(
        &mut self,
        key: SessionKey,
        initial_address: Option<&str>,
        config: &EngineConfig,
    ) -> Result<&dyn EngineSession, EngineError> {
        if !self.entries.contains_key(&key) {
            let handle = self.engine.create_session(config)?;
            let interceptor =
                EventInterceptor::install(handle.as_ref(), key, Rc::clone(&self.router));
            handle.set_visible(false);
            if let Some(address) = initial_address {
                handle.navigate(address);
            }
            info!("Created session {key} in partition {}", config.partition);
            self.entries.insert(key, SessionEntry { handle, interceptor });
        }
        Ok(self.entries[&key].handle.as_ref())
    }

    /// Make `key` visible and hide every other entry. A no-op for absent
    /// keys; callers are expected to `get_or_create` first.
    pub fn show(&mut self, key: &SessionKey) {
        if !self.entries.contains_key(key) {
            return;
        }
        // Hide first so no instant ever has two visible instances.
        for (other, entry) in &self.entries {
            if other != key {
                entry.handle.set_visible(false);
            }
        }
        if let Some(entry) = self.entries.get(key) {
            entry.handle.set_visible(true);
        }
        self.visible = Some(*key);
    }

    /// Detach and dispose the instance for `key`. Removing the visible
    /// session leaves visibility at "none"; the registry never auto-selects
    /// a replacement. Idempotent: removing an absent key is a no-op.
    pub fn remove(&mut self, key: &SessionKey) {
        let Some(entry) = self.entries.remove(key) else {
            return;
        };
        if self.visible.as_ref() == Some(key) {
            self.visible = None;
        }
        entry.handle.detach();
        info!("Removed session {key}");
        // The entry drops here; the registry held the only strong reference.
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible_key(&self) -> Option<SessionKey> {
        self.visible
    }

    pub fn current_visible(&self) -> Option<&dyn EngineSession> {
        let key = self.visible.as_ref()?;
        self.entries.get(key).map(|entry| entry.handle.as_ref())
    }

    /// Borrow the handle for a key, if present.
    pub fn handle(&self, key: &SessionKey) -> Option<&dyn EngineSession> {
        self.entries.get(key).map(|entry| entry.handle.as_ref())
    }

    /// Shared handle for crate-internal holders (the poller). External
    /// consumers must go through the borrowing accessors.
    pub(crate) fn shared_handle(&self, key: &SessionKey) -> Option<Rc<dyn EngineSession>> {
        self.entries.get(key).map(|entry| Rc::clone(&entry.handle))
    }

    /// Attach (or replace) the presentation-layer observer for a session.
    /// Only the interceptor's primary slot changes; the reconciliation tap
    /// is untouched.
    pub fn attach_observer(&self, key: &SessionKey, observer: Rc<dyn NavigationObserver>) {
        if let Some(entry) = self.entries.get(key) {
            entry.interceptor.set_primary(Some(observer));
        }
    }
}
