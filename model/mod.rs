/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Persisted domain records.
//!
//! The domain store owns these; the session core only reads them at session
//! creation time and requests field updates through reconciliation. Tabs,
//! pinned tabs, and bookmarks share one record shape; the kinds differ in
//! lifecycle and routing rules, not in stored fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder title for a not-yet-navigated tab. Also the title the
/// self-healing heuristic treats as carrying no information.
pub const DEFAULT_TAB_TITLE: &str = "New Tab";

/// A browsing profile. Each profile gets its own engine storage partition so
/// cookies and site data never leak across profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    /// Isolation token handed to the content engine at session creation.
    pub fn partition(&self) -> String {
        format!("profile-{}", self.id)
    }
}

/// A named group of tabs/pinned tabs/bookmarks inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub sort_index: u32,
}

/// One persisted page entity: a tab, pinned tab, or bookmark record. The
/// owning kind is carried by the collection it lives in, not by the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: Uuid,
    pub space_id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<Vec<u8>>,
    pub sort_index: u32,
}

impl PageRecord {
    pub fn new(space_id: Uuid, url: &str, sort_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            space_id,
            title: DEFAULT_TAB_TITLE.to_string(),
            url: url.to_string(),
            favicon: None,
            sort_index,
        }
    }
}

/// A single reconciled field change, produced by the session core and applied
/// by the store. At most one update is derived per engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityUpdate {
    Title(String),
    Favicon(Vec<u8>),
    Address(String),
}
