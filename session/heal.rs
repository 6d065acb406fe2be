/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Blank-address self-healing.
//!
//! A known corruption pattern leaves a tab with the blank sentinel as its
//! stored address while its title still names the page it used to show. When
//! such a record is opened, the title is matched against a small table of
//! well-known site keywords to infer a navigation target; anything
//! unrecognized falls back to the configured search origin. Best-effort
//! repair only: records with a real stored address are never touched, and
//! every repair is logged. Gated by `AppPreferences::heal_blank_addresses`.

use crate::model::{DEFAULT_TAB_TITLE, PageRecord};
use crate::session::reconcile::BLANK_ADDRESS;

/// Keyword → canonical origin, matched against the lowercased title.
const KEYWORD_ORIGINS: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("github", "https://github.com"),
    ("gmail", "https://mail.google.com"),
    ("reddit", "https://reddit.com"),
    ("wikipedia", "https://wikipedia.org"),
    ("stack overflow", "https://stackoverflow.com"),
    ("twitter", "https://twitter.com"),
    ("netflix", "https://netflix.com"),
    ("spotify", "https://spotify.com"),
    ("amazon", "https://amazon.com"),
    ("figma", "https://figma.com"),
    ("notion", "https://notion.so"),
];

/// A record needs healing only when its address resolves to the blank
/// sentinel while its title carries real information.
pub fn needs_healing(url: &str, title: &str) -> bool {
    (url.is_empty() || url == BLANK_ADDRESS) && !title.is_empty() && title != DEFAULT_TAB_TITLE
}

/// Infer a navigation target from a title known to be non-trivial.
pub fn infer_address(title: &str, search_origin: &str) -> String {
    let lowered = title.to_lowercase();
    for (keyword, origin) in KEYWORD_ORIGINS {
        if lowered.contains(keyword) {
            return (*origin).to_string();
        }
    }
    search_origin.to_string()
}

/// The repair target for a record, or `None` when the record is healthy.
pub fn healing_target(record: &PageRecord, search_origin: &str) -> Option<String> {
    needs_healing(&record.url, &record.title)
        .then(|| infer_address(&record.title, search_origin))
}
