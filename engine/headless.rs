/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-process headless engine.
//!
//! Simulates the content-engine collaborator without rendering anything:
//! per-session navigation history, visibility, and synchronous observer
//! delivery. The demo shell runs against it, and the test suite scripts it
//! (including construction failures) to exercise the session core.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{ContentEngine, EngineConfig, EngineError, EngineSession, NavigationObserver};

#[derive(Default)]
pub struct HeadlessEngine {
    created: Cell<usize>,
    fail_next_create: Cell<bool>,
}

impl HeadlessEngine {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Total sessions created over the engine's lifetime.
    pub fn created_count(&self) -> usize {
        self.created.get()
    }

    /// Script the next `create_session` call to fail.
    pub fn fail_next_create(&self) {
        self.fail_next_create.set(true);
    }
}

impl ContentEngine for HeadlessEngine {
    fn create_session(&self, config: &EngineConfig) -> Result<Rc<dyn EngineSession>, EngineError> {
        if config.partition.is_empty() {
            return Err(EngineError::Config(
                "storage partition must be non-empty".to_string(),
            ));
        }
        if self.fail_next_create.take() {
            return Err(EngineError::Creation(
                "scripted headless construction failure".to_string(),
            ));
        }
        self.created.set(self.created.get() + 1);
        Ok(Rc::new(HeadlessSession::new(&config.partition)))
    }
}

/// One simulated engine instance: a linear history plus an observer slot.
pub struct HeadlessSession {
    partition: String,
    observer: RefCell<Option<Rc<dyn NavigationObserver>>>,
    history: RefCell<Vec<String>>,
    index: Cell<usize>,
    visible: Cell<bool>,
    detached: Cell<bool>,
    navigations: Cell<usize>,
}

impl HeadlessSession {
    fn new(partition: &str) -> Self {
        Self {
            partition: partition.to_string(),
            observer: RefCell::new(None),
            history: RefCell::new(Vec::new()),
            index: Cell::new(0),
            visible: Cell::new(false),
            detached: Cell::new(false),
            navigations: Cell::new(0),
        }
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Total `navigate` calls this session has received.
    pub fn navigation_count(&self) -> usize {
        self.navigations.get()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }

    /// Raise a title-changed event, as a real engine would after parsing a
    /// document's `<title>`.
    pub fn emit_title_changed(&self, title: &str) {
        self.notify(|observer| observer.on_title_changed(title));
    }

    /// Raise a favicon-changed event with decoded icon bytes.
    pub fn emit_favicon_changed(&self, bytes: &[u8]) {
        self.notify(|observer| observer.on_favicon_changed(bytes));
    }

    pub fn emit_navigation_failed(&self, reason: &str) {
        self.notify(|observer| observer.on_navigation_failed(reason));
    }

    /// Clone the observer out of the slot before invoking it, so a handler
    /// that re-attaches an observer does not hit a re-entrant borrow.
    fn notify(&self, deliver: impl Fn(&dyn NavigationObserver)) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            deliver(observer.as_ref());
        }
    }
}

impl EngineSession for HeadlessSession {
    fn navigate(&self, url: &str) {
        self.navigations.set(self.navigations.get() + 1);
        {
            let mut history = self.history.borrow_mut();
            if !history.is_empty() {
                history.truncate(self.index.get() + 1);
            }
            history.push(url.to_string());
            self.index.set(history.len() - 1);
        }
        self.notify(|observer| observer.on_navigation_started(url));
        self.notify(|observer| observer.on_address_changed(url));
        self.notify(|observer| observer.on_navigation_finished(url));
    }

    fn go_back(&self) {
        if !self.can_go_back() {
            return;
        }
        self.index.set(self.index.get() - 1);
        if let Some(url) = self.current_address() {
            self.notify(|observer| observer.on_address_changed(&url));
        }
    }

    fn go_forward(&self) {
        if !self.can_go_forward() {
            return;
        }
        self.index.set(self.index.get() + 1);
        if let Some(url) = self.current_address() {
            self.notify(|observer| observer.on_address_changed(&url));
        }
    }

    fn reload(&self) {
        if let Some(url) = self.current_address() {
            self.notify(|observer| observer.on_navigation_started(&url));
            self.notify(|observer| observer.on_navigation_finished(&url));
        }
    }

    fn current_address(&self) -> Option<String> {
        self.history.borrow().get(self.index.get()).cloned()
    }

    fn can_go_back(&self) -> bool {
        self.index.get() > 0
    }

    fn can_go_forward(&self) -> bool {
        let len = self.history.borrow().len();
        len > 0 && self.index.get() + 1 < len
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn detach(&self) {
        self.visible.set(false);
        self.detached.set(true);
    }

    fn observer(&self) -> Option<Rc<dyn NavigationObserver>> {
        self.observer.borrow().clone()
    }

    fn attach_observer(&self, observer: Rc<dyn NavigationObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
