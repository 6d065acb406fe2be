/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The session core: identity, registry, interception, reconciliation,
//! polling, and self-healing for concurrently open browsing contexts.

pub mod heal;
pub mod interceptor;
pub mod key;
pub mod poller;
pub mod reconcile;
pub mod registry;

pub use key::{SessionKey, SessionKind};
pub use poller::{DEFAULT_POLL_INTERVAL, NavigationPoller, NavigationSnapshot};
pub use reconcile::{BLANK_ADDRESS, ReconciliationRouter, SessionEvent};
pub use registry::SessionRegistry;
