/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The presentation-layer consumer of the session core.
//!
//! `BrowserShell` wires the registry, reconciliation router, poller, domain
//! store, and preferences together and exposes the operations a UI needs:
//! open, focus, close, pin, bookmark, navigate. It also owns the cooperative
//! loop turn ([`BrowserShell::pump`]): drain reconciled updates into the
//! store, tick the poller, let the store snapshot. All of it runs on one
//! presentation thread; no registry operation ever interleaves with another.

pub mod repl;

use std::rc::Rc;
use std::time::Instant;

use log::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::engine::{ContentEngine, EngineConfig, EngineError};
use crate::model::{EntityUpdate, PageRecord};
use crate::persistence::DomainStore;
use crate::prefs::AppPreferences;
use crate::session::heal;
use crate::session::{
    NavigationPoller, NavigationSnapshot, ReconciliationRouter, SessionKey, SessionKind,
    SessionRegistry,
};

/// What one cooperative loop turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSummary {
    pub updates_applied: usize,
    pub snapshot_refreshed: bool,
}

pub struct BrowserShell {
    prefs: AppPreferences,
    store: DomainStore,
    registry: SessionRegistry,
    router: Rc<ReconciliationRouter>,
    poller: NavigationPoller,
    profile_id: Uuid,
    space_id: Uuid,
}

impl BrowserShell {
    pub fn new(
        prefs: AppPreferences,
        mut store: DomainStore,
        engine: Rc<dyn ContentEngine>,
    ) -> Self {
        let profile_id = store.ensure_profile(&prefs.profile_name);
        let space_id = store
            .active_space()
            .or_else(|| store.ensure_space(profile_id, &prefs.space_name))
            .expect("space creation cannot fail for a just-ensured profile");
        store.set_active_space(space_id);

        let router = ReconciliationRouter::new();
        let registry = SessionRegistry::new(engine, Rc::clone(&router));
        let poller = NavigationPoller::new(prefs.poll_interval());

        Self {
            prefs,
            store,
            registry,
            router,
            poller,
            profile_id,
            space_id,
        }
    }

    pub fn prefs(&self) -> &AppPreferences {
        &self.prefs
    }

    pub fn store(&self) -> &DomainStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DomainStore {
        &mut self.store
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut self.registry
    }

    pub fn router(&self) -> &Rc<ReconciliationRouter> {
        &self.router
    }

    pub fn active_space(&self) -> Uuid {
        self.space_id
    }

    fn engine_config(&self) -> EngineConfig {
        let partition = self
            .store
            .profile(self.profile_id)
            .map(|profile| profile.partition())
            .unwrap_or_else(|| format!("profile-{}", self.profile_id));
        EngineConfig::for_partition(partition)
    }

    /// Create a tab record for the given location input and open its session.
    pub fn open_tab(&mut self, input: &str) -> Result<SessionKey, EngineError> {
        if self.store.space(self.space_id).is_none() {
            // The active space was deleted out from under us; recover with
            // the configured default.
            self.space_id = self
                .store
                .ensure_space(self.profile_id, &self.prefs.space_name)
                .expect("space creation cannot fail for a just-ensured profile");
            self.store.set_active_space(self.space_id);
        }
        let url = location_input_to_url(input, &self.prefs.search_origin);
        let id = self
            .store
            .add_tab(self.space_id, &url)
            .expect("active space verified above");
        let key = SessionKey::tab(id);
        self.open_session(key)?;
        Ok(key)
    }

    /// Open (or focus) the session for a persisted record.
    ///
    /// On first open, the stored address seeds the initial navigation; a tab
    /// whose stored address is blank but whose title names a page goes
    /// through self-healing instead, and the inferred address is written back
    /// through the reconciliation queue.
    pub fn open_session(&mut self, key: SessionKey) -> Result<(), EngineError> {
        let mut healed: Option<String> = None;
        let initial = if self.registry.contains(&key) {
            None
        } else if let Some(record) = self.store.find_entity(&key) {
            if self.prefs.heal_blank_addresses
                && key.kind == SessionKind::Tab
                && let Some(target) = heal::healing_target(record, &self.prefs.search_origin)
            {
                info!(
                    "Self-healing blank address for {key}: title {:?} -> {target}",
                    record.title
                );
                healed = Some(target.clone());
                Some(target)
            } else {
                (!record.url.is_empty()).then(|| record.url.clone())
            }
        } else {
            None
        };

        let config = self.engine_config();
        self.registry.get_or_create(key, initial.as_deref(), &config)?;
        if let Some(target) = healed {
            // The engine's own address reports keep the record current from
            // here; this write-back covers sessions that never load.
            self.router.enqueue(key, EntityUpdate::Address(target));
        }
        self.focus(key);
        Ok(())
    }

    /// Make an already-created session visible and point the poller at it.
    /// A no-op when the key has no live session.
    pub fn focus(&mut self, key: SessionKey) {
        self.registry.show(&key);
        if self.registry.visible_key() == Some(key)
            && let Some(handle) = self.registry.shared_handle(&key)
        {
            self.poller.start(key, handle);
        }
    }

    /// Tear down a session. Tab and pinned-tab records are removed with the
    /// session; bookmark records outlive their sessions.
    pub fn close(&mut self, key: SessionKey) {
        if self.poller.target_key() == Some(key) {
            self.poller.stop();
        }
        self.registry.remove(&key);
        if key.kind != SessionKind::Bookmark {
            self.store.remove_entity(&key);
        }
    }

    /// Convert a tab into a pinned tab. Identity is the namespaced key, so
    /// the kind change re-keys the session: the old instance is torn down and
    /// a fresh one is created under the new key (immediately when the tab was
    /// visible, lazily otherwise).
    pub fn pin_tab(&mut self, key: SessionKey) -> Option<SessionKey> {
        if key.kind != SessionKind::Tab || !self.store.convert_tab_to_pinned(key.entity_id) {
            return None;
        }
        let was_visible = self.registry.visible_key() == Some(key);
        if self.poller.target_key() == Some(key) {
            self.poller.stop();
        }
        self.registry.remove(&key);

        let new_key = SessionKey::pinned_tab(key.entity_id);
        if was_visible
            && let Err(e) = self.open_session(new_key)
        {
            warn!("Failed to reopen pinned session {new_key}: {e}");
        }
        Some(new_key)
    }

    /// Save the entity behind `key` as a bookmark. The source record and its
    /// session are untouched.
    pub fn bookmark(&mut self, key: SessionKey) -> Option<SessionKey> {
        let id = self.store.bookmark_from(&key)?;
        Some(SessionKey::bookmark(id))
    }

    pub fn go_back(&self) {
        if let Some(handle) = self.registry.current_visible() {
            handle.go_back();
        }
    }

    pub fn go_forward(&self) {
        if let Some(handle) = self.registry.current_visible() {
            handle.go_forward();
        }
    }

    pub fn reload(&self) {
        if let Some(handle) = self.registry.current_visible() {
            handle.reload();
        }
    }

    pub fn navigation_snapshot(&self) -> Option<&NavigationSnapshot> {
        self.poller.snapshot()
    }

    pub fn tabs(&self) -> Vec<&PageRecord> {
        self.store.records_in_space(SessionKind::Tab, self.space_id)
    }

    pub fn pinned_tabs(&self) -> Vec<&PageRecord> {
        self.store
            .records_in_space(SessionKind::PinnedTab, self.space_id)
    }

    pub fn bookmarks(&self) -> Vec<&PageRecord> {
        self.store
            .records_in_space(SessionKind::Bookmark, self.space_id)
    }

    /// One cooperative turn of the presentation loop: drain reconciliation,
    /// tick the poller, let the store snapshot if due.
    pub fn pump(&mut self) -> PumpSummary {
        let updates_applied = self.router.apply_pending(&mut self.store);
        let snapshot_refreshed = self.poller.tick(Instant::now());
        self.store.maybe_snapshot();
        PumpSummary {
            updates_applied,
            snapshot_refreshed,
        }
    }

    /// Final drain and snapshot before exit.
    pub fn shutdown(&mut self) {
        self.router.apply_pending(&mut self.store);
        self.poller.stop();
        self.store.snapshot_now();
    }
}

/// Turn location-bar input into a navigable URL: a parseable URL is taken as
/// is, something domain-shaped gets an https scheme, and everything else
/// becomes a search against the configured origin.
pub fn location_input_to_url(input: &str, search_origin: &str) -> String {
    let input = input.trim();
    if let Ok(url) = Url::parse(input) {
        return url.to_string();
    }
    if input.contains('.')
        && !input.contains(' ')
        && let Ok(url) = Url::parse(&format!("https://{input}"))
    {
        return url.to_string();
    }
    let query: String = url::form_urlencoded::byte_serialize(input.as_bytes()).collect();
    format!("{}/search?q={query}", search_origin.trim_end_matches('/'))
}
