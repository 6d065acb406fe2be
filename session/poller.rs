/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Navigation-state polling for the visible session.
//!
//! The content engine does not reliably push back/forward-availability or
//! URL-change events, so the visible session's toolbar state is refreshed by
//! polling: the shell loop ticks the poller, and the poller re-reads engine
//! state at most once per period. Polling is read-only. It never navigates
//! and never touches the persisted model; reconciliation stays the router's
//! job. Kept behind the [`NavigationSnapshot`] surface so a push-based engine
//! can replace it without touching anything else.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::engine::EngineSession;
use crate::session::key::SessionKey;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Ephemeral, polled view of the visible session's navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub current_url: Option<String>,
}

struct PollTarget {
    key: SessionKey,
    handle: Rc<dyn EngineSession>,
    last_poll: Option<Instant>,
    snapshot: Option<NavigationSnapshot>,
}

/// The single recurring poller. At most one target at a time: starting a new
/// target cancels the previous one, and stopping releases the held handle so
/// a removed instance is never kept alive by the poller.
pub struct NavigationPoller {
    interval: Duration,
    target: Option<PollTarget>,
}

impl NavigationPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            target: None,
        }
    }

    /// Begin polling `handle` for `key`, replacing any prior target. The
    /// first tick after `start` polls immediately; the prior target's
    /// snapshot is discarded, never carried over.
    pub fn start(&mut self, key: SessionKey, handle: Rc<dyn EngineSession>) {
        self.target = Some(PollTarget {
            key,
            handle,
            last_poll: None,
            snapshot: None,
        });
    }

    /// Stop polling and drop the held handle and snapshot.
    pub fn stop(&mut self) {
        self.target = None;
    }

    pub fn is_running(&self) -> bool {
        self.target.is_some()
    }

    pub fn target_key(&self) -> Option<SessionKey> {
        self.target.as_ref().map(|target| target.key)
    }

    pub fn snapshot(&self) -> Option<&NavigationSnapshot> {
        self.target.as_ref()?.snapshot.as_ref()
    }

    /// Re-read engine state if the period has elapsed. Returns true when the
    /// published snapshot changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(target) = &mut self.target else {
            return false;
        };
        if let Some(last) = target.last_poll
            && now.duration_since(last) < self.interval
        {
            return false;
        }
        target.last_poll = Some(now);

        let next = NavigationSnapshot {
            can_go_back: target.handle.can_go_back(),
            can_go_forward: target.handle.can_go_forward(),
            current_url: target.handle.current_address(),
        };
        let changed = target.snapshot.as_ref() != Some(&next);
        target.snapshot = Some(next);
        changed
    }
}

impl Default for NavigationPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
