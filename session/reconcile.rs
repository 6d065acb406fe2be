/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Reconciliation of engine-observed state into the persisted model.
//!
//! Every event observed by an interceptor tap is translated into at most one
//! [`EntityUpdate`] by pure per-event rules, then queued. The queue is drained
//! on the presentation thread by [`ReconciliationRouter::apply_pending`], so
//! event delivery (which can happen mid-way through a registry or engine call)
//! never mutates the store re-entrantly. Per-key application order equals
//! delivery order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::debug;

use crate::model::EntityUpdate;
use crate::persistence::DomainStore;
use crate::session::key::{SessionKey, SessionKind};

/// The reserved "no address yet" value. A legitimate transient state for a
/// newly created session; must never overwrite a real stored address.
pub const BLANK_ADDRESS: &str = "about:blank";

/// One engine event, as seen by the reconciliation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent<'a> {
    NavigationStarted { url: &'a str },
    NavigationFinished { url: &'a str },
    NavigationFailed { reason: &'a str },
    TitleChanged { title: &'a str },
    FaviconChanged { bytes: &'a [u8] },
    AddressChanged { url: &'a str },
}

/// Translate one event into at most one persisted-field update.
///
/// Rules: empty titles and empty favicons carry no information and are
/// dropped; bookmark addresses are immutable once created; the blank sentinel
/// never overwrites a stored address. Navigation lifecycle events have no
/// persisted counterpart.
pub fn update_for_event(kind: SessionKind, event: &SessionEvent<'_>) -> Option<EntityUpdate> {
    match event {
        SessionEvent::TitleChanged { title } => {
            (!title.is_empty()).then(|| EntityUpdate::Title((*title).to_string()))
        },
        SessionEvent::FaviconChanged { bytes } => {
            (!bytes.is_empty()).then(|| EntityUpdate::Favicon(bytes.to_vec()))
        },
        SessionEvent::AddressChanged { url } => {
            if kind == SessionKind::Bookmark || *url == BLANK_ADDRESS {
                return None;
            }
            Some(EntityUpdate::Address((*url).to_string()))
        },
        SessionEvent::NavigationStarted { .. }
        | SessionEvent::NavigationFinished { .. }
        | SessionEvent::NavigationFailed { .. } => None,
    }
}

/// Queues reconciled updates for application on the presentation thread.
///
/// Shared (via `Rc`) between every session's interceptor tap and the shell
/// loop that drains it; updates against entities that have since been deleted
/// are silent no-ops.
#[derive(Default)]
pub struct ReconciliationRouter {
    pending: RefCell<VecDeque<(SessionKey, EntityUpdate)>>,
}

impl ReconciliationRouter {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Observe one event for a routed key. Called by interceptor taps.
    pub fn observe(&self, key: &SessionKey, event: &SessionEvent<'_>) {
        if let Some(update) = update_for_event(key.kind, event) {
            self.pending.borrow_mut().push_back((*key, update));
        }
    }

    /// Observe an event tagged with an encoded key, decoding at the boundary.
    /// Keys that do not decode are unroutable and dropped; sessions can
    /// exist for contexts the router does not persist.
    pub fn observe_raw(&self, raw_key: &str, event: &SessionEvent<'_>) {
        let Some(key) = SessionKey::decode(raw_key) else {
            debug!("Dropping event for unroutable session key {raw_key:?}");
            return;
        };
        self.observe(&key, event);
    }

    /// Queue a direct write-back (used by the self-healing path).
    pub fn enqueue(&self, key: SessionKey, update: EntityUpdate) {
        self.pending.borrow_mut().push_back((key, update));
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Drain the queue into the store, in delivery order. Returns how many
    /// updates found a live entity.
    pub fn apply_pending(&self, store: &mut DomainStore) -> usize {
        let drained: Vec<(SessionKey, EntityUpdate)> =
            self.pending.borrow_mut().drain(..).collect();
        let mut applied = 0;
        for (key, update) in drained {
            if store.apply_update(&key, &update) {
                applied += 1;
            } else {
                debug!("Reconciliation skipped for {key}: entity no longer exists");
            }
        }
        applied
    }
}
