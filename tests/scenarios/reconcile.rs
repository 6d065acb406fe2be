/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use tabshell::engine::EngineSession;
use tabshell::session::{BLANK_ADDRESS, SessionEvent, SessionKind};

use super::harness::ShellHarness;

#[test]
fn title_changes_reconcile_into_the_store() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://example.com").unwrap();

    harness.session(&key).emit_title_changed("Example Domain");
    let summary = harness.shell.pump();

    assert_eq!(summary.updates_applied, 2); // initial address + title
    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.title, "Example Domain");
}

#[test]
fn empty_titles_never_overwrite_a_stored_title() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://example.com").unwrap();
    harness.session(&key).emit_title_changed("Example Domain");
    harness.shell.pump();

    harness.session(&key).emit_title_changed("");
    harness.shell.pump();

    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.title, "Example Domain");
}

#[test]
fn the_blank_sentinel_never_overwrites_a_stored_address() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://example.com").unwrap();
    harness.shell.pump();
    assert_eq!(
        harness.shell.store().find_entity(&key).unwrap().url,
        "https://example.com/"
    );

    harness.session(&key).navigate(BLANK_ADDRESS);
    harness.shell.pump();

    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.url, "https://example.com/");
}

#[test]
fn favicon_bytes_reconcile_and_empty_favicons_are_dropped() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://example.com").unwrap();

    harness.session(&key).emit_favicon_changed(&[0x89, 0x50]);
    harness.shell.pump();
    assert_eq!(
        harness.shell.store().find_entity(&key).unwrap().favicon,
        Some(vec![0x89, 0x50])
    );

    harness.session(&key).emit_favicon_changed(&[]);
    harness.shell.pump();
    assert_eq!(
        harness.shell.store().find_entity(&key).unwrap().favicon,
        Some(vec![0x89, 0x50])
    );
}

#[test]
fn bookmark_addresses_are_immutable_but_titles_still_update() {
    let mut harness = ShellHarness::new();
    let tab = harness.shell.open_tab("https://example.com").unwrap();
    harness.shell.pump();
    let bookmark = harness.shell.bookmark(tab).unwrap();
    harness.shell.open_session(bookmark).unwrap();

    let session = harness.session(&bookmark);
    session.navigate("https://elsewhere.example/deep/link");
    session.emit_title_changed("Elsewhere");
    harness.shell.pump();

    let record = harness.shell.store().find_entity(&bookmark).unwrap();
    assert_eq!(record.url, "https://example.com/");
    assert_eq!(record.title, "Elsewhere");
}

#[test]
fn unroutable_keys_are_dropped_without_error() {
    let mut harness = ShellHarness::new();
    let router = harness.shell.router().clone();

    router.observe_raw(
        "tab-not-a-uuid",
        &SessionEvent::TitleChanged { title: "Orphan" },
    );
    let summary = harness.shell.pump();
    assert_eq!(summary.updates_applied, 0);
}

#[test]
fn updates_for_vanished_entities_are_silent_no_ops() {
    let mut harness = ShellHarness::new();
    let key = harness.shell.open_tab("https://example.com").unwrap();
    harness.shell.pump();

    // Delete the record out from under the live session, then let the
    // session keep reporting.
    harness.shell.store_mut().remove_entity(&key);
    harness.session(&key).emit_title_changed("Too Late");
    let summary = harness.shell.pump();

    assert_eq!(summary.updates_applied, 0);
    assert!(harness.shell.store().find_entity(&key).is_none());
}

#[test]
fn events_are_routed_only_to_their_own_entity() {
    let mut harness = ShellHarness::new();
    let a = harness.shell.open_tab("https://a.example").unwrap();
    let b = harness.shell.open_tab("https://b.example").unwrap();
    harness.shell.pump();

    harness.session(&a).emit_title_changed("Only A");
    harness.shell.pump();

    let store = harness.shell.store();
    assert_eq!(store.find_entity(&a).unwrap().title, "Only A");
    assert_eq!(store.find_entity(&b).unwrap().title, "New Tab");
    assert_eq!(a.kind, SessionKind::Tab);
}
