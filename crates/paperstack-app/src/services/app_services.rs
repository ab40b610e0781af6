// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — opens the document store, loads the config, and
// picks the platform bridge. Provided to the Dioxus tree as context.
//
// The SQLite store is `Send` but not `Sync`, so it is wrapped in
// `Arc<Mutex<>>`. Mutex contention is minimal because every query is short
// and made from the UI thread.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use paperstack_core::AppConfig;
use paperstack_core::error::Result;
use paperstack_document::ScratchDir;
use paperstack_store::SqliteDocumentStore;
use paperstack_viewmodel::{SharedBridge, SharedStore};
use tracing::{info, warn};

use super::data_dir;

const DATABASE_FILE: &str = "documents.db";
const CONFIG_FILE: &str = "config.json";

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable so the struct can be moved into closures.
#[derive(Clone)]
pub struct AppServices {
    store: SharedStore,
    bridge: SharedBridge,
    config: AppConfig,
}

impl AppServices {
    /// Initialise all services. Call once at startup.
    ///
    /// Creates the data directory and opens the document database. A missing
    /// config is written out with defaults so it can be edited; an
    /// unreadable one is left on disk untouched and defaults are used.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let store = SqliteDocumentStore::open(dir.join(DATABASE_FILE))?;

        let config = load_or_init_config(&dir);

        let bridge: SharedBridge = Arc::from(paperstack_bridge::platform_bridge());
        info!(platform = bridge.platform_name(), "app services initialised");

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            bridge,
            config,
        })
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn bridge(&self) -> SharedBridge {
        Arc::clone(&self.bridge)
    }

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.clone()
    }

    /// Delete leftover scratch PDFs when the config asks for it.
    pub fn purge_scratch_if_configured(&self) {
        if !self.config.purge_scratch_on_start {
            return;
        }
        let scratch = ScratchDir::new(self.config.scratch_dir());
        if let Err(e) = scratch.purge() {
            warn!(path = %scratch.path().display(), error = %e, "scratch purge failed");
        }
    }
}

// -- Config file persistence -------------------------------------------------

/// Outcome of reading the config file.
#[derive(Debug, PartialEq)]
enum ConfigFile {
    Loaded(AppConfig),
    Missing,
    Unreadable,
}

fn load_config(data_dir: &Path) -> ConfigFile {
    let path = data_dir.join(CONFIG_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConfigFile::Missing,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read config");
            return ConfigFile::Unreadable;
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => ConfigFile::Loaded(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            ConfigFile::Unreadable
        }
    }
}

/// Load the config, writing defaults only when no config file exists.
fn load_or_init_config(data_dir: &Path) -> AppConfig {
    match load_config(data_dir) {
        ConfigFile::Loaded(config) => config,
        ConfigFile::Unreadable => AppConfig::default(),
        ConfigFile::Missing => {
            let config = AppConfig::default();
            if let Err(e) = persist_config(data_dir, &config) {
                warn!(error = %e, "could not write default config");
            }
            config
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<PathBuf> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperstack_core::{PageLayout, PaperSize};

    #[test]
    fn missing_config_loads_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_config(dir.path()), ConfigFile::Missing);
    }

    #[test]
    fn persisted_config_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            default_document_name: "Receipt".into(),
            page_layout: PageLayout::FitToPaper(PaperSize::Letter),
            purge_scratch_on_start: true,
            ..AppConfig::default()
        };

        let path = persist_config(dir.path(), &config).expect("persist");
        assert!(path.ends_with(CONFIG_FILE));
        assert_eq!(load_config(dir.path()), ConfigFile::Loaded(config));
    }

    #[test]
    fn corrupt_config_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").expect("write");
        assert_eq!(load_config(dir.path()), ConfigFile::Unreadable);
    }

    #[test]
    fn corrupt_config_is_left_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let hand_edited = "{ \"default_document_name\": \"Receipt\", ";
        std::fs::write(&path, hand_edited).expect("write");

        let config = load_or_init_config(dir.path());

        assert_eq!(config, AppConfig::default());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), hand_edited);
    }

    #[test]
    fn missing_config_is_written_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");

        let config = load_or_init_config(dir.path());

        assert_eq!(config, AppConfig::default());
        assert_eq!(
            load_config(dir.path()),
            ConfigFile::Loaded(AppConfig::default())
        );
    }
}
