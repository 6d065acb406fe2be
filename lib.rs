/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tabshell: a multi-session browsing surface.
//!
//! Many browsing contexts (tabs, pinned tabs, bookmark-backed views) stay
//! live at once while exactly one is presented. The session core manages the
//! lifecycle and identity of the underlying content-engine instances,
//! intercepts their navigation events, and reconciles engine-observed state
//! back into the persisted domain model addressed by namespaced
//! `"<kind>-<uuid>"` keys.

pub mod engine;
pub mod model;
pub mod persistence;
pub mod prefs;
pub mod session;
pub mod shell;

/// Install the global tracing subscriber. `log` macro records are bridged
/// through; `filter` falls back to the `TABSHELL_LOG` environment variable,
/// then to "info".
pub fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let env_filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_env("TABSHELL_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();
}
