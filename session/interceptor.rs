/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Event interception for one engine session.
//!
//! The engine exposes a single observer slot per session. The interceptor
//! occupies that slot and fans every event out to two places, in order: the
//! observer that was attached before interception (the "primary", typically a
//! presentation component), then the reconciliation router tagged with this
//! session's key. The primary slot is replaceable: a UI component re-attaching
//! on re-render swaps only that slot and never disturbs the tap, so neither
//! the engine nor the primary observer can tell interception happened.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{EngineSession, NavigationObserver};
use crate::session::key::SessionKey;
use crate::session::reconcile::{ReconciliationRouter, SessionEvent};

pub struct EventInterceptor {
    key: SessionKey,
    primary: RefCell<Option<Rc<dyn NavigationObserver>>>,
    router: Rc<ReconciliationRouter>,
}

impl EventInterceptor {
    /// Wrap the session's observer slot. Whatever observer is currently
    /// attached becomes the primary; the interceptor takes the slot.
    pub fn install(
        session: &dyn EngineSession,
        key: SessionKey,
        router: Rc<ReconciliationRouter>,
    ) -> Rc<Self> {
        let interceptor = Rc::new(Self {
            key,
            primary: RefCell::new(session.observer()),
            router,
        });
        session.attach_observer(interceptor.clone());
        interceptor
    }

    /// Replace the primary observer. The reconciliation tap stays in place.
    pub fn set_primary(&self, observer: Option<Rc<dyn NavigationObserver>>) {
        *self.primary.borrow_mut() = observer;
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    /// Clone the primary out of its slot before invoking it, so a handler
    /// that re-attaches during delivery cannot hit a re-entrant borrow.
    fn primary(&self) -> Option<Rc<dyn NavigationObserver>> {
        self.primary.borrow().clone()
    }

    fn forward(
        &self,
        deliver: impl Fn(&dyn NavigationObserver),
        event: SessionEvent<'_>,
    ) {
        if let Some(primary) = self.primary() {
            deliver(primary.as_ref());
        }
        self.router.observe(&self.key, &event);
    }
}

impl NavigationObserver for EventInterceptor {
    fn on_navigation_started(&self, url: &str) {
        self.forward(
            |observer| observer.on_navigation_started(url),
            SessionEvent::NavigationStarted { url },
        );
    }

    fn on_navigation_finished(&self, url: &str) {
        self.forward(
            |observer| observer.on_navigation_finished(url),
            SessionEvent::NavigationFinished { url },
        );
    }

    fn on_navigation_failed(&self, reason: &str) {
        self.forward(
            |observer| observer.on_navigation_failed(reason),
            SessionEvent::NavigationFailed { reason },
        );
    }

    fn on_title_changed(&self, title: &str) {
        self.forward(
            |observer| observer.on_title_changed(title),
            SessionEvent::TitleChanged { title },
        );
    }

    fn on_favicon_changed(&self, bytes: &[u8]) {
        self.forward(
            |observer| observer.on_favicon_changed(bytes),
            SessionEvent::FaviconChanged { bytes },
        );
    }

    fn on_address_changed(&self, url: &str) {
        self.forward(
            |observer| observer.on_address_changed(url),
            SessionEvent::AddressChanged { url },
        );
    }
}
