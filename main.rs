/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use tabshell::engine::headless::HeadlessEngine;
use tabshell::persistence::DomainStore;
use tabshell::prefs::{AppPreferences, cli_options};
use tabshell::shell::{BrowserShell, repl};

fn main() {
    let cli = cli_options().run();
    tabshell::init_tracing(cli.log_filter.as_deref());

    let prefs = AppPreferences::load(cli.config.as_deref()).with_overrides(&cli);

    let store = if cli.ephemeral {
        DomainStore::ephemeral()
    } else {
        let data_dir = prefs
            .data_dir
            .clone()
            .unwrap_or_else(DomainStore::default_data_dir);
        match DomainStore::open(data_dir) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Failed to open domain store: {e}");
                std::process::exit(1);
            },
        }
    };

    let engine = HeadlessEngine::new();
    let mut shell = BrowserShell::new(prefs, store, engine);

    if let Err(e) = repl::run(&mut shell) {
        log::error!("Shell terminated: {e}");
    }
    shell.shutdown();
}
