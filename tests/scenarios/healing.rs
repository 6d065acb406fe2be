/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use tabshell::engine::EngineSession;
use tabshell::model::EntityUpdate;
use tabshell::session::{BLANK_ADDRESS, SessionKey};

use super::harness::ShellHarness;

/// Seed a persisted tab with a blank address and the given title, as the
/// known corruption pattern leaves it.
fn corrupt_tab(harness: &mut ShellHarness, title: &str) -> SessionKey {
    let space = harness.shell.active_space();
    let id = harness
        .shell
        .store_mut()
        .add_tab(space, BLANK_ADDRESS)
        .unwrap();
    let key = SessionKey::tab(id);
    harness
        .shell
        .store_mut()
        .apply_update(&key, &EntityUpdate::Title(title.to_string()));
    key
}

#[test]
fn blank_tab_with_known_title_heals_to_canonical_origin() {
    let mut harness = ShellHarness::new();
    let key = corrupt_tab(&mut harness, "YouTube - Funny Cats");

    harness.shell.open_session(key).unwrap();
    harness.shell.pump();

    let session = harness.session(&key);
    assert_eq!(session.navigation_count(), 1);
    assert_eq!(
        session.current_address().as_deref(),
        Some("https://youtube.com")
    );
    // The inferred address was written back to the persisted record.
    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.url, "https://youtube.com");
}

#[test]
fn engine_reports_refine_the_healed_address() {
    let mut harness = ShellHarness::new();
    let key = corrupt_tab(&mut harness, "YouTube - Funny Cats");
    harness.shell.open_session(key).unwrap();
    harness.shell.pump();

    // Once the engine settles on a concrete page, reconciliation persists it.
    harness
        .session(&key)
        .navigate("https://youtube.com/watch?v=cats");
    harness.shell.pump();
    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.url, "https://youtube.com/watch?v=cats");
}

#[test]
fn unknown_titles_fall_back_to_the_search_origin() {
    let mut harness = ShellHarness::new();
    let key = corrupt_tab(&mut harness, "quarterly planning doc");

    harness.shell.open_session(key).unwrap();
    harness.shell.pump();

    assert_eq!(
        harness.session(&key).current_address().as_deref(),
        Some("https://www.google.com")
    );
}

#[test]
fn healing_respects_the_preference_flag() {
    let mut prefs = ShellHarness::test_prefs();
    prefs.heal_blank_addresses = false;
    let mut harness = ShellHarness::with_prefs(prefs);
    let key = corrupt_tab(&mut harness, "YouTube - Funny Cats");

    harness.shell.open_session(key).unwrap();
    harness.shell.pump();

    let session = harness.session(&key);
    assert_eq!(session.current_address().as_deref(), Some(BLANK_ADDRESS));
    // The blank sentinel never overwrites anything, and nothing was healed.
    let record = harness.shell.store().find_entity(&key).unwrap();
    assert_eq!(record.url, BLANK_ADDRESS);
}

#[test]
fn well_formed_addresses_are_never_healed() {
    let mut harness = ShellHarness::new();

    // A healthy record must navigate to its stored address even though the
    // title matches a healing keyword.
    let space = harness.shell.active_space();
    let id = harness
        .shell
        .store_mut()
        .add_tab(space, "https://example.com/watch")
        .unwrap();
    let key = SessionKey::tab(id);
    harness
        .shell
        .store_mut()
        .apply_update(&key, &EntityUpdate::Title("YouTube - Funny Cats".to_string()));

    harness.shell.open_session(key).unwrap();
    assert_eq!(
        harness.session(&key).current_address().as_deref(),
        Some("https://example.com/watch")
    );
}

#[test]
fn blank_tabs_with_placeholder_titles_are_left_alone() {
    let mut harness = ShellHarness::new();
    let space = harness.shell.active_space();
    let id = harness
        .shell
        .store_mut()
        .add_tab(space, BLANK_ADDRESS)
        .unwrap();
    let key = SessionKey::tab(id);

    harness.shell.open_session(key).unwrap();
    assert_eq!(
        harness.session(&key).current_address().as_deref(),
        Some(BLANK_ADDRESS)
    );
}
