/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application preferences: a TOML file under the platform config directory,
//! with command-line overrides on top. Unknown keys in the file are ignored;
//! a malformed file logs a warning and falls back to defaults rather than
//! failing startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bpaf::Bpaf;
use log::warn;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppPreferences {
    pub data_dir: Option<PathBuf>,
    pub poll_interval_ms: u64,
    pub heal_blank_addresses: bool,
    pub search_origin: String,
    pub profile_name: String,
    pub space_name: String,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            data_dir: None,
            poll_interval_ms: 500,
            heal_blank_addresses: true,
            search_origin: "https://www.google.com".to_string(),
            profile_name: "Default".to_string(),
            space_name: "Personal".to_string(),
        }
    }
}

impl AppPreferences {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("tabshell");
        path.push("prefs.toml");
        Some(path)
    }

    /// Load preferences from `path`, or from the default location when no
    /// path is given. Absent or malformed files yield defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Ignoring malformed preferences at {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Apply command-line overrides on top of file preferences.
    pub fn with_overrides(mut self, cli: &CliOptions) -> Self {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if let Some(ms) = cli.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if cli.no_heal {
            self.heal_blank_addresses = false;
        }
        if let Some(origin) = &cli.search_origin {
            self.search_origin = origin.clone();
        }
        self
    }
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct CliOptions {
    /// Domain store directory (defaults to the platform config dir)
    #[bpaf(argument("DIR"))]
    pub data_dir: Option<PathBuf>,

    /// Preferences file to load instead of the default location
    #[bpaf(argument("PATH"))]
    pub config: Option<PathBuf>,

    /// Navigation poll interval in milliseconds
    #[bpaf(argument("MS"))]
    pub poll_interval_ms: Option<u64>,

    /// Search origin used for non-URL input and self-healing fallback
    #[bpaf(argument("URL"))]
    pub search_origin: Option<String>,

    /// Disable blank-address self-healing
    pub no_heal: bool,

    /// Run with an in-memory store, persisting nothing
    pub ephemeral: bool,

    /// Log filter, e.g. "info" or "tabshell=debug"
    #[bpaf(argument("FILTER"))]
    pub log_filter: Option<String>,
}
