/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::rc::Rc;

use tabshell::engine::headless::{HeadlessEngine, HeadlessSession};
use tabshell::persistence::DomainStore;
use tabshell::prefs::AppPreferences;
use tabshell::session::SessionKey;
use tabshell::shell::BrowserShell;

pub struct ShellHarness {
    pub shell: BrowserShell,
    pub engine: Rc<HeadlessEngine>,
}

impl ShellHarness {
    pub fn new() -> Self {
        Self::with_prefs(Self::test_prefs())
    }

    /// Default test preferences: poll on every pump so snapshots are never
    /// stale in assertions.
    pub fn test_prefs() -> AppPreferences {
        let mut prefs = AppPreferences::default();
        prefs.poll_interval_ms = 0;
        prefs
    }

    pub fn with_prefs(prefs: AppPreferences) -> Self {
        let engine = HeadlessEngine::new();
        let shell = BrowserShell::new(prefs, DomainStore::ephemeral(), engine.clone());
        Self { shell, engine }
    }

    pub fn with_store(prefs: AppPreferences, store: DomainStore) -> Self {
        let engine = HeadlessEngine::new();
        let shell = BrowserShell::new(prefs, store, engine.clone());
        Self { shell, engine }
    }

    /// The concrete headless session behind a key. Panics when the key has
    /// no live session; scenarios always create before they inspect.
    pub fn session(&self, key: &SessionKey) -> &HeadlessSession {
        self.shell
            .registry()
            .handle(key)
            .expect("session should exist")
            .as_any()
            .downcast_ref::<HeadlessSession>()
            .expect("headless session")
    }
}
