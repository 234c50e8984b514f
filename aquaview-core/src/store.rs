//! Persisted user settings.
//!
//! One JSON blob at a fixed path. Loading never fails to the caller: a
//! missing or malformed blob falls back to defaults with a log line. Updates
//! merge into memory first and treat persistence as a separate commit step
//! that fails soft, so the in-memory settings always advance.

use aquaview_schemas::settings::{Settings, SettingsPatch, MIN_REFRESH_INTERVAL_MS};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AquaViewError;

pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Open the store at `path`, loading persisted settings if present.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = load_or_default(&path);
        Self { path, settings }
    }

    /// In-memory store for tests and ephemeral sessions; persistence becomes
    /// a no-op that always fails soft.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            settings: Settings::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge a partial update and commit the result.
    ///
    /// The alert table merges parameter by parameter, so patching one
    /// threshold leaves the rest untouched. A refresh interval below
    /// [`MIN_REFRESH_INTERVAL_MS`] is not applied; the prior value stays.
    /// The merged settings are returned even when the commit fails.
    pub fn update(&mut self, patch: SettingsPatch) -> Settings {
        if let Some(units) = patch.units {
            self.settings.units = units;
        }
        if let Some(alerts) = patch.alerts {
            self.settings.alerts.apply(alerts);
        }
        if let Some(interval) = patch.refresh_interval_ms {
            if interval >= MIN_REFRESH_INTERVAL_MS {
                self.settings.refresh_interval_ms = interval;
            } else {
                log::warn!(
                    "ignoring refresh interval {} ms, minimum is {} ms",
                    interval,
                    MIN_REFRESH_INTERVAL_MS
                );
            }
        }

        if let Err(e) = self.persist() {
            log::warn!("settings update applied but not persisted: {}", e);
        }
        self.settings.clone()
    }

    fn persist(&self) -> Result<(), AquaViewError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let blob = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, blob)
            .map_err(|e| AquaViewError::SettingsIo(self.path.display().to_string(), e))
    }
}

fn load_or_default(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            log::info!("no settings blob at '{}', using defaults", path.display());
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&text) {
        Ok(mut settings) => {
            if settings.refresh_interval_ms < MIN_REFRESH_INTERVAL_MS {
                log::warn!(
                    "persisted refresh interval {} ms below minimum, raising to {} ms",
                    settings.refresh_interval_ms,
                    MIN_REFRESH_INTERVAL_MS
                );
                settings.refresh_interval_ms = MIN_REFRESH_INTERVAL_MS;
            }
            settings
        }
        Err(e) => {
            log::warn!(
                "malformed settings blob at '{}' ({}), using defaults",
                path.display(),
                e
            );
            Settings::default()
        }
    }
}
