/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Namespaced session identifiers.
//!
//! A session is addressed by `{kind, entity id}` everywhere inside the crate;
//! the string form `"<kindPrefix>-<uuid>"` exists only at the boundary with
//! the persisted store's records, and this module is the single place that
//! touches it.

use std::fmt;

use uuid::Uuid;

/// Which persisted entity a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Bookmark,
    Tab,
    PinnedTab,
}

/// Wire prefixes, most specific first. The prefixes are disjoint, but keeping
/// the longest first means decode order can never matter even if a future
/// prefix embeds another.
const KIND_PREFIXES: [(&str, SessionKind); 3] = [
    ("pinnedTab-", SessionKind::PinnedTab),
    ("bookmark-", SessionKind::Bookmark),
    ("tab-", SessionKind::Tab),
];

impl SessionKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SessionKind::Bookmark => "bookmark-",
            SessionKind::Tab => "tab-",
            SessionKind::PinnedTab => "pinnedTab-",
        }
    }
}

/// Identity of one browsing session, routing engine events back to the
/// persisted entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub kind: SessionKind,
    pub entity_id: Uuid,
}

impl SessionKey {
    pub fn new(kind: SessionKind, entity_id: Uuid) -> Self {
        Self { kind, entity_id }
    }

    pub fn bookmark(entity_id: Uuid) -> Self {
        Self::new(SessionKind::Bookmark, entity_id)
    }

    pub fn tab(entity_id: Uuid) -> Self {
        Self::new(SessionKind::Tab, entity_id)
    }

    pub fn pinned_tab(entity_id: Uuid) -> Self {
        Self::new(SessionKind::PinnedTab, entity_id)
    }

    /// Canonical string form, `"<kindPrefix><uuid>"`. Must round-trip through
    /// [`SessionKey::decode`] exactly; existing store records depend on it.
    pub fn encode(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.entity_id)
    }

    /// Decode the string form. Returns `None` for unknown prefixes and for
    /// malformed UUIDs; unroutable keys fail closed rather than guessing.
    pub fn decode(raw: &str) -> Option<Self> {
        for (prefix, kind) in KIND_PREFIXES {
            if let Some(rest) = raw.strip_prefix(prefix) {
                return Uuid::try_parse(rest).ok().map(|id| Self::new(kind, id));
            }
        }
        None
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.entity_id)
    }
}
