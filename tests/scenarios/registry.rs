/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use tabshell::engine::headless::{HeadlessEngine, HeadlessSession};
use tabshell::engine::{EngineConfig, EngineError, EngineSession};
use tabshell::session::{ReconciliationRouter, SessionKey, SessionRegistry};

use super::harness::ShellHarness;

fn registry() -> (SessionRegistry, std::rc::Rc<HeadlessEngine>) {
    let engine = HeadlessEngine::new();
    (
        SessionRegistry::new(engine.clone(), ReconciliationRouter::new()),
        engine,
    )
}

fn config() -> EngineConfig {
    EngineConfig::for_partition("profile-test")
}

fn headless<'a>(registry: &'a SessionRegistry, key: &SessionKey) -> &'a HeadlessSession {
    registry
        .handle(key)
        .expect("session should exist")
        .as_any()
        .downcast_ref::<HeadlessSession>()
        .expect("headless session")
}

#[test]
fn creating_and_showing_a_tab_session_navigates_exactly_once() {
    let (mut registry, engine) = registry();
    let key = SessionKey::decode("tab-11111111-1111-1111-1111-111111111111")
        .expect("literal key should decode");

    registry
        .get_or_create(key, Some("https://example.com"), &config())
        .unwrap();
    registry.show(&key);

    assert_eq!(engine.created_count(), 1);
    assert_eq!(registry.visible_key(), Some(key));
    let session = headless(&registry, &key);
    assert_eq!(session.navigation_count(), 1);
    assert_eq!(
        session.current_address().as_deref(),
        Some("https://example.com")
    );
    assert!(!session.can_go_back());
}

#[test]
fn switching_visibility_hides_without_destroying() {
    let (mut registry, engine) = registry();
    let a = SessionKey::tab(uuid::Uuid::new_v4());
    let b = SessionKey::tab(uuid::Uuid::new_v4());

    registry
        .get_or_create(a, Some("https://a.example"), &config())
        .unwrap();
    registry
        .get_or_create(b, Some("https://b.example"), &config())
        .unwrap();
    registry.show(&a);
    registry.show(&b);

    assert_eq!(registry.visible_key(), Some(b));
    assert!(!headless(&registry, &a).is_visible());
    assert!(headless(&registry, &b).is_visible());

    // A is still live: re-requesting it is a lookup, not a recreation.
    registry
        .get_or_create(a, Some("https://a.example"), &config())
        .unwrap();
    assert_eq!(engine.created_count(), 2);
    assert_eq!(headless(&registry, &a).navigation_count(), 1);
}

#[test]
fn removing_the_visible_session_selects_nothing() {
    let (mut registry, _) = registry();
    let key = SessionKey::tab(uuid::Uuid::new_v4());
    registry
        .get_or_create(key, Some("https://example.com"), &config())
        .unwrap();
    registry.show(&key);

    registry.remove(&key);
    assert!(registry.current_visible().is_none());

    // A show for the removed key stays a no-op until the key is recreated.
    registry.show(&key);
    assert!(registry.current_visible().is_none());
    assert_eq!(registry.visible_key(), None);
}

#[test]
fn remove_then_recreate_proves_real_teardown() {
    let (mut registry, engine) = registry();
    let key = SessionKey::tab(uuid::Uuid::new_v4());

    registry
        .get_or_create(key, Some("https://example.com"), &config())
        .unwrap();
    registry.remove(&key);
    registry
        .get_or_create(key, Some("https://example.com"), &config())
        .unwrap();

    assert_eq!(engine.created_count(), 2);
    assert_eq!(headless(&registry, &key).navigation_count(), 1);
}

#[test]
fn construction_failure_is_typed_and_leaves_no_entry() {
    let (mut registry, engine) = registry();
    let key = SessionKey::tab(uuid::Uuid::new_v4());
    engine.fail_next_create();

    let result = registry.get_or_create(key, Some("https://example.com"), &config());
    assert!(matches!(result, Err(EngineError::Creation(_))));
    assert!(!registry.contains(&key));
    assert_eq!(registry.len(), 0);
}

#[test]
fn poller_reports_immediately_after_open() {
    let mut harness = ShellHarness::new();
    harness.shell.open_tab("https://example.com").unwrap();

    let summary = harness.shell.pump();
    assert!(summary.snapshot_refreshed);
    let snapshot = harness.shell.navigation_snapshot().unwrap();
    assert!(!snapshot.can_go_back);
    assert!(!snapshot.can_go_forward);
    assert_eq!(snapshot.current_url.as_deref(), Some("https://example.com/"));
}

#[test]
fn poller_tracks_history_availability_across_navigations() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://a.example").unwrap();
    harness.session(&key).navigate("https://b.example");
    harness.shell.pump();
    assert!(harness.shell.navigation_snapshot().unwrap().can_go_back);

    harness.shell.go_back();
    harness.shell.pump();
    let snapshot = harness.shell.navigation_snapshot().unwrap();
    assert!(!snapshot.can_go_back);
    assert!(snapshot.can_go_forward);
}

#[test]
fn profiles_isolate_engine_partitions() {
    let mut work_prefs = ShellHarness::test_prefs();
    work_prefs.profile_name = "Work".to_string();
    let mut personal = ShellHarness::new();
    let mut work = ShellHarness::with_prefs(work_prefs);

    let a = personal.shell.open_tab("https://a.example").unwrap();
    let b = work.shell.open_tab("https://a.example").unwrap();

    let partition_a = personal.session(&a).partition().to_string();
    let partition_b = work.session(&b).partition().to_string();
    assert_ne!(partition_a, partition_b);
}
