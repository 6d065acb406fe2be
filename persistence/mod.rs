/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Domain persistence using redb snapshots.
//!
//! The whole domain model (profiles, spaces, tabs, pinned tabs, bookmarks) is
//! small enough to snapshot wholesale: every mutation marks the store dirty,
//! and a periodic `Instant`-gated snapshot writes the full model to redb as a
//! serde_json payload. On startup the latest snapshot is loaded; a corrupt or
//! missing snapshot starts an empty model rather than failing the shell.
//!
//! Reconciliation updates arrive through [`DomainStore::apply_update`] and
//! are no-ops when the referenced entity has been deleted concurrently;
//! background reconciliation never surfaces errors.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::warn;
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EntityUpdate, PageRecord, Profile, Space};
use crate::session::{SessionKey, SessionKind};

const SNAPSHOT_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("snapshots");
pub const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 30;

/// Errors from the domain store
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Redb(String),
    Encoding(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Redb(e) => write!(f, "Redb error: {e}"),
            StoreError::Encoding(e) => write!(f, "Encoding error: {e}"),
        }
    }
}

/// Serialized form of the full domain model.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DomainSnapshot {
    profiles: Vec<Profile>,
    spaces: Vec<Space>,
    tabs: Vec<PageRecord>,
    pinned_tabs: Vec<PageRecord>,
    bookmarks: Vec<PageRecord>,
    active_space: Option<Uuid>,
}

/// Persistent domain store backed by a redb snapshot table.
pub struct DomainStore {
    profiles: BTreeMap<Uuid, Profile>,
    spaces: BTreeMap<Uuid, Space>,
    tabs: BTreeMap<Uuid, PageRecord>,
    pinned_tabs: BTreeMap<Uuid, PageRecord>,
    bookmarks: BTreeMap<Uuid, PageRecord>,
    active_space: Option<Uuid>,
    snapshot_db: Option<redb::Database>,
    last_snapshot: Instant,
    snapshot_interval: Duration,
    dirty: bool,
}

impl DomainStore {
    /// Open or create a domain store at the given directory
    pub fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create dir: {e}")))?;
        let snapshot_path = base_dir.join("domain.redb");
        let snapshot_db = redb::Database::create(&snapshot_path)
            .map_err(|e| StoreError::Redb(format!("{e}")))?;

        let mut store = Self::with_db(Some(snapshot_db));
        if let Some(snapshot) = store.load_snapshot() {
            store.restore(snapshot);
        }
        Ok(store)
    }

    /// In-memory store with no backing database. Mutations are kept but
    /// snapshot calls are no-ops.
    pub fn ephemeral() -> Self {
        Self::with_db(None)
    }

    fn with_db(snapshot_db: Option<redb::Database>) -> Self {
        Self {
            profiles: BTreeMap::new(),
            spaces: BTreeMap::new(),
            tabs: BTreeMap::new(),
            pinned_tabs: BTreeMap::new(),
            bookmarks: BTreeMap::new(),
            active_space: None,
            snapshot_db,
            last_snapshot: Instant::now(),
            snapshot_interval: Duration::from_secs(DEFAULT_SNAPSHOT_INTERVAL_SECS),
            dirty: false,
        }
    }

    /// Get the default storage directory for domain data
    pub fn default_data_dir() -> PathBuf {
        let mut dir = dirs::config_dir().expect("No config directory available");
        dir.push("tabshell");
        dir.push("domain");
        dir
    }

    // Profiles and spaces.

    /// Find a profile by name, creating it if absent.
    pub fn ensure_profile(&mut self, name: &str) -> Uuid {
        if let Some(profile) = self.profiles.values().find(|p| p.name == name) {
            return profile.id;
        }
        let profile = Profile::new(name);
        let id = profile.id;
        self.profiles.insert(id, profile);
        self.dirty = true;
        id
    }

    /// Find a space by name under a profile, creating it if absent. Returns
    /// `None` when the profile does not exist.
    pub fn ensure_space(&mut self, profile_id: Uuid, name: &str) -> Option<Uuid> {
        self.profiles.get(&profile_id)?;
        if let Some(space) = self
            .spaces
            .values()
            .find(|s| s.profile_id == profile_id && s.name == name)
        {
            return Some(space.id);
        }
        let sort_index = self
            .spaces
            .values()
            .filter(|s| s.profile_id == profile_id)
            .count() as u32;
        let space = Space {
            id: Uuid::new_v4(),
            profile_id,
            name: name.to_string(),
            sort_index,
        };
        let id = space.id;
        self.spaces.insert(id, space);
        self.dirty = true;
        Some(id)
    }

    pub fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    pub fn space(&self, id: Uuid) -> Option<&Space> {
        self.spaces.get(&id)
    }

    pub fn profile_for_space(&self, space_id: Uuid) -> Option<&Profile> {
        let space = self.spaces.get(&space_id)?;
        self.profiles.get(&space.profile_id)
    }

    /// Delete a space and every record inside it.
    pub fn remove_space(&mut self, space_id: Uuid) -> bool {
        if self.spaces.remove(&space_id).is_none() {
            return false;
        }
        self.tabs.retain(|_, r| r.space_id != space_id);
        self.pinned_tabs.retain(|_, r| r.space_id != space_id);
        self.bookmarks.retain(|_, r| r.space_id != space_id);
        if self.active_space == Some(space_id) {
            self.active_space = None;
        }
        self.dirty = true;
        true
    }

    /// Delete a profile, cascading through its spaces.
    pub fn remove_profile(&mut self, profile_id: Uuid) -> bool {
        if self.profiles.remove(&profile_id).is_none() {
            return false;
        }
        let owned: Vec<Uuid> = self
            .spaces
            .values()
            .filter(|s| s.profile_id == profile_id)
            .map(|s| s.id)
            .collect();
        for space_id in owned {
            self.remove_space(space_id);
        }
        self.dirty = true;
        true
    }

    pub fn active_space(&self) -> Option<Uuid> {
        self.active_space
    }

    pub fn set_active_space(&mut self, space_id: Uuid) {
        if self.spaces.contains_key(&space_id) && self.active_space != Some(space_id) {
            self.active_space = Some(space_id);
            self.dirty = true;
        }
    }

    // Page records.

    fn collection(&self, kind: SessionKind) -> &BTreeMap<Uuid, PageRecord> {
        match kind {
            SessionKind::Tab => &self.tabs,
            SessionKind::PinnedTab => &self.pinned_tabs,
            SessionKind::Bookmark => &self.bookmarks,
        }
    }

    fn collection_mut(&mut self, kind: SessionKind) -> &mut BTreeMap<Uuid, PageRecord> {
        match kind {
            SessionKind::Tab => &mut self.tabs,
            SessionKind::PinnedTab => &mut self.pinned_tabs,
            SessionKind::Bookmark => &mut self.bookmarks,
        }
    }

    fn next_sort_index(&self, kind: SessionKind, space_id: Uuid) -> u32 {
        self.collection(kind)
            .values()
            .filter(|r| r.space_id == space_id)
            .count() as u32
    }

    /// Add a record of the given kind; returns `None` if the space is absent.
    pub fn add_record(&mut self, kind: SessionKind, space_id: Uuid, url: &str) -> Option<Uuid> {
        self.spaces.get(&space_id)?;
        let record = PageRecord::new(space_id, url, self.next_sort_index(kind, space_id));
        let id = record.id;
        self.collection_mut(kind).insert(id, record);
        self.dirty = true;
        Some(id)
    }

    pub fn add_tab(&mut self, space_id: Uuid, url: &str) -> Option<Uuid> {
        self.add_record(SessionKind::Tab, space_id, url)
    }

    /// Move a tab record into the pinned-tab collection, keeping its id.
    /// The session keyed on the old kind must be torn down by the caller:
    /// a kind change is a new session identity.
    pub fn convert_tab_to_pinned(&mut self, id: Uuid) -> bool {
        let Some(mut record) = self.tabs.remove(&id) else {
            return false;
        };
        self.reindex_space(SessionKind::Tab, record.space_id);
        record.sort_index = self.next_sort_index(SessionKind::PinnedTab, record.space_id);
        self.pinned_tabs.insert(id, record);
        self.dirty = true;
        true
    }

    /// Save a copy of a tab or pinned tab as a bookmark. The bookmark is a
    /// new entity with its own id; the source record is untouched.
    pub fn bookmark_from(&mut self, key: &SessionKey) -> Option<Uuid> {
        let source = self.find_entity(key)?.clone();
        let mut record = PageRecord::new(
            source.space_id,
            &source.url,
            self.next_sort_index(SessionKind::Bookmark, source.space_id),
        );
        record.title = source.title;
        record.favicon = source.favicon;
        let id = record.id;
        self.bookmarks.insert(id, record);
        self.dirty = true;
        Some(id)
    }

    pub fn find_entity(&self, key: &SessionKey) -> Option<&PageRecord> {
        self.collection(key.kind).get(&key.entity_id)
    }

    pub fn remove_entity(&mut self, key: &SessionKey) -> bool {
        let Some(record) = self.collection_mut(key.kind).remove(&key.entity_id) else {
            return false;
        };
        self.reindex_space(key.kind, record.space_id);
        self.dirty = true;
        true
    }

    /// Compact sort indices for one kind within one space after removal.
    fn reindex_space(&mut self, kind: SessionKind, space_id: Uuid) {
        let mut ids: Vec<(u32, Uuid)> = self
            .collection(kind)
            .values()
            .filter(|r| r.space_id == space_id)
            .map(|r| (r.sort_index, r.id))
            .collect();
        ids.sort_unstable();
        for (index, (_, id)) in ids.into_iter().enumerate() {
            if let Some(record) = self.collection_mut(kind).get_mut(&id) {
                record.sort_index = index as u32;
            }
        }
    }

    pub fn records_in_space(&self, kind: SessionKind, space_id: Uuid) -> Vec<&PageRecord> {
        let mut records: Vec<&PageRecord> = self
            .collection(kind)
            .values()
            .filter(|r| r.space_id == space_id)
            .collect();
        records.sort_by_key(|r| r.sort_index);
        records
    }

    /// Apply one reconciled field update. Returns false (a no-op, not an
    /// error) when the entity no longer exists.
    pub fn apply_update(&mut self, key: &SessionKey, update: &EntityUpdate) -> bool {
        let Some(record) = self.collection_mut(key.kind).get_mut(&key.entity_id) else {
            return false;
        };
        match update {
            EntityUpdate::Title(title) => record.title = title.clone(),
            EntityUpdate::Favicon(bytes) => record.favicon = Some(bytes.clone()),
            EntityUpdate::Address(url) => record.url = url.clone(),
        }
        self.dirty = true;
        self.maybe_snapshot();
        true
    }

    // Snapshots.

    /// Write a snapshot if the model is dirty and the interval has elapsed.
    pub fn maybe_snapshot(&mut self) {
        if self.dirty && self.last_snapshot.elapsed() >= self.snapshot_interval {
            self.snapshot_now();
        }
    }

    /// Write a snapshot unconditionally. Failures are logged, not propagated;
    /// retry policy is the next interval tick.
    pub fn snapshot_now(&mut self) {
        let Some(db) = &self.snapshot_db else {
            self.dirty = false;
            return;
        };

        let write_result = (|| -> Result<(), StoreError> {
            let bytes = serde_json::to_vec(&self.to_snapshot())
                .map_err(|e| StoreError::Encoding(format!("{e}")))?;
            let write_txn = db
                .begin_write()
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
            {
                let mut table = write_txn
                    .open_table(SNAPSHOT_TABLE)
                    .map_err(|e| StoreError::Redb(format!("{e}")))?;
                table
                    .insert("latest", bytes.as_slice())
                    .map_err(|e| StoreError::Redb(format!("{e}")))?;
            }
            write_txn
                .commit()
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
            Ok(())
        })();

        if let Err(e) = write_result {
            warn!("Failed to write domain snapshot: {e}");
            return;
        }
        self.last_snapshot = Instant::now();
        self.dirty = false;
    }

    pub fn set_snapshot_interval_secs(&mut self, secs: u64) -> Result<(), StoreError> {
        if secs == 0 {
            return Err(StoreError::Io(
                "Snapshot interval must be greater than zero seconds".to_string(),
            ));
        }
        self.snapshot_interval = Duration::from_secs(secs);
        Ok(())
    }

    fn to_snapshot(&self) -> DomainSnapshot {
        DomainSnapshot {
            profiles: self.profiles.values().cloned().collect(),
            spaces: self.spaces.values().cloned().collect(),
            tabs: self.tabs.values().cloned().collect(),
            pinned_tabs: self.pinned_tabs.values().cloned().collect(),
            bookmarks: self.bookmarks.values().cloned().collect(),
            active_space: self.active_space,
        }
    }

    fn restore(&mut self, snapshot: DomainSnapshot) {
        self.profiles = snapshot.profiles.into_iter().map(|p| (p.id, p)).collect();
        self.spaces = snapshot.spaces.into_iter().map(|s| (s.id, s)).collect();
        self.tabs = snapshot.tabs.into_iter().map(|r| (r.id, r)).collect();
        self.pinned_tabs = snapshot
            .pinned_tabs
            .into_iter()
            .map(|r| (r.id, r))
            .collect();
        self.bookmarks = snapshot.bookmarks.into_iter().map(|r| (r.id, r)).collect();
        self.active_space = snapshot
            .active_space
            .filter(|id| self.spaces.contains_key(id));
        self.dirty = false;
    }

    /// Load the latest snapshot if present. A corrupt payload starts empty.
    fn load_snapshot(&self) -> Option<DomainSnapshot> {
        let db = self.snapshot_db.as_ref()?;
        let read_txn = db.begin_read().ok()?;
        let table = read_txn.open_table(SNAPSHOT_TABLE).ok()?;
        let entry = table.get("latest").ok()??;
        match serde_json::from_slice(entry.value()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Discarding corrupt domain snapshot: {e}");
                None
            },
        }
    }
}
