/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Line-oriented development shell.
//!
//! Drives the session core end-to-end against the headless engine: open,
//! focus, navigate, pin, bookmark, close, and inspect the polled navigation
//! snapshot. Not a product UI, just a way to exercise the core from a
//! terminal.

use std::io::{self, BufRead, Write};

use crate::session::{SessionKey, SessionKind};

use super::BrowserShell;

const HELP: &str = "\
commands:
  open <url|query>     create a tab and show it
  list                 list tabs, pinned tabs, and bookmarks
  show <n>             show entry <n> from the last listing
  close <n>            close entry <n> (bookmarks keep their record)
  pin <n>              convert tab <n> into a pinned tab
  bookmark <n>         save entry <n> as a bookmark
  back | forward | reload
  poll                 print the current navigation snapshot
  quit";

struct Listing {
    keys: Vec<SessionKey>,
}

impl Listing {
    fn capture(shell: &BrowserShell, out: &mut impl Write) -> io::Result<Self> {
        let mut keys = Vec::new();
        let visible = shell.registry().visible_key();
        for (label, kind) in [
            ("pinned", SessionKind::PinnedTab),
            ("tab", SessionKind::Tab),
            ("bookmark", SessionKind::Bookmark),
        ] {
            let records = match kind {
                SessionKind::PinnedTab => shell.pinned_tabs(),
                SessionKind::Tab => shell.tabs(),
                SessionKind::Bookmark => shell.bookmarks(),
            };
            for record in records {
                let key = SessionKey::new(kind, record.id);
                let marker = if visible == Some(key) { "*" } else { " " };
                writeln!(
                    out,
                    "{marker}[{}] {label:<8} {}  {}",
                    keys.len(),
                    record.title,
                    record.url
                )?;
                keys.push(key);
            }
        }
        if keys.is_empty() {
            writeln!(out, "(nothing open)")?;
        }
        Ok(Self { keys })
    }

    fn resolve(&self, arg: Option<&str>) -> Option<SessionKey> {
        let index: usize = arg?.parse().ok()?;
        self.keys.get(index).copied()
    }
}

pub fn run(shell: &mut BrowserShell) -> io::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    let mut listing = Listing { keys: Vec::new() };

    writeln!(out, "tabshell (type 'help' for commands)")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let rest = parts.next();

        match command {
            "" => {},
            "help" => writeln!(out, "{HELP}")?,
            "open" => {
                let input = line.trim().strip_prefix("open").unwrap_or("").trim();
                if input.is_empty() {
                    writeln!(out, "usage: open <url|query>")?;
                } else {
                    match shell.open_tab(input) {
                        Ok(key) => writeln!(out, "opened {key}")?,
                        Err(e) => writeln!(out, "this session could not be opened: {e}")?,
                    }
                }
            },
            "list" => listing = Listing::capture(shell, &mut out)?,
            "show" => match listing.resolve(rest) {
                Some(key) => {
                    if let Err(e) = shell.open_session(key) {
                        writeln!(out, "this session could not be opened: {e}")?;
                    }
                },
                None => writeln!(out, "usage: show <n> (after 'list')")?,
            },
            "close" => match listing.resolve(rest) {
                Some(key) => shell.close(key),
                None => writeln!(out, "usage: close <n> (after 'list')")?,
            },
            "pin" => match listing.resolve(rest).and_then(|key| shell.pin_tab(key)) {
                Some(key) => writeln!(out, "pinned as {key}")?,
                None => writeln!(out, "usage: pin <n> where <n> is a tab")?,
            },
            "bookmark" => match listing.resolve(rest).and_then(|key| shell.bookmark(key)) {
                Some(key) => writeln!(out, "bookmarked as {key}")?,
                None => writeln!(out, "usage: bookmark <n> (after 'list')")?,
            },
            "back" => shell.go_back(),
            "forward" => shell.go_forward(),
            "reload" => shell.reload(),
            "poll" => {
                shell.pump();
                match shell.navigation_snapshot() {
                    Some(snapshot) => writeln!(
                        out,
                        "back: {}  forward: {}  url: {}",
                        snapshot.can_go_back,
                        snapshot.can_go_forward,
                        snapshot.current_url.as_deref().unwrap_or("-")
                    )?,
                    None => writeln!(out, "(no visible session)")?,
                }
            },
            "quit" | "exit" => break,
            other => writeln!(out, "unknown command {other:?}; try 'help'")?,
        }
        shell.pump();
    }
    Ok(())
}
