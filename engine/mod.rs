/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Content-engine collaborator surface.
//!
//! The engine that actually renders web content is an external collaborator;
//! this module specifies it only at the boundary the session core needs:
//! per-session handles with navigation, history availability, visibility,
//! and a single observer slot for asynchronous navigation events. The
//! in-process [`headless`] engine implements the same surface for the demo
//! shell and the test suite.

pub mod headless;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Per-session engine configuration supplied at creation time.
///
/// `partition` names the storage/cookie isolation context. Sessions created
/// under different partitions must never share state; the registry derives
/// one partition per profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub partition: String,
    pub user_agent: Option<String>,
}

impl EngineConfig {
    pub fn for_partition(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            user_agent: None,
        }
    }
}

/// Errors from engine-instance construction. The only engine failure that
/// propagates to callers; everything after creation is fire-and-forget.
#[derive(Debug)]
pub enum EngineError {
    Creation(String),
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Creation(e) => write!(f, "Engine instance creation failed: {e}"),
            EngineError::Config(e) => write!(f, "Invalid engine configuration: {e}"),
        }
    }
}

/// Observer for a session's asynchronous navigation events.
///
/// Handlers default to no-ops so presentation-layer observers implement only
/// what they consume. One observer is attached per session handle; fan-out to
/// the reconciliation tap is layered on top by the session core, not by the
/// engine.
pub trait NavigationObserver {
    fn on_navigation_started(&self, _url: &str) {}
    fn on_navigation_finished(&self, _url: &str) {}
    fn on_navigation_failed(&self, _reason: &str) {}
    fn on_title_changed(&self, _title: &str) {}
    fn on_favicon_changed(&self, _bytes: &[u8]) {}
    fn on_address_changed(&self, _url: &str) {}
}

/// Handle to one live engine instance.
///
/// Handles are owned by the session registry; everything else borrows them
/// for the duration of a call.
pub trait EngineSession {
    fn navigate(&self, url: &str);
    fn go_back(&self);
    fn go_forward(&self);
    fn reload(&self);

    fn current_address(&self) -> Option<String>;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;

    /// Composite or hide this instance. Hidden instances keep running; they
    /// are never torn down by a visibility change.
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;

    /// Remove the instance from the display surface. Called exactly once,
    /// before the handle is dropped.
    fn detach(&self);

    fn observer(&self) -> Option<Rc<dyn NavigationObserver>>;
    fn attach_observer(&self, observer: Rc<dyn NavigationObserver>);

    /// Escape hatch for embedders that know the concrete session type.
    fn as_any(&self) -> &dyn Any;
}

/// Factory for engine instances. One instance per session, created lazily by
/// the registry on first access to a key.
pub trait ContentEngine {
    fn create_session(&self, config: &EngineConfig) -> Result<Rc<dyn EngineSession>, EngineError>;
}
