//! Persisted user preferences (currently just the theme).
//!
//! Stored as TOML at `{config_dir}/shinobix/prefs.toml`. Fetched catalog data
//! is never written here.

use crate::theme::Theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform config location, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shinobix")
            .join("prefs.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<PrefsFile> {
        if !self.path.exists() {
            return Ok(PrefsFile::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read prefs file: {}", self.path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse prefs file: {}", self.path.display()))
    }

    /// Stored theme. Only an explicit `"light"` selects light; anything else,
    /// including an unreadable file, is dark.
    pub fn load_theme(&self) -> Theme {
        match self.read() {
            Ok(prefs) => match prefs.theme.as_deref() {
                Some("light") => Theme::Light,
                _ => Theme::Dark,
            },
            Err(e) => {
                log::warn!("[prefs] {e:#}; using default theme");
                Theme::Dark
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        let mut prefs = self.read().unwrap_or_default();
        prefs.theme = Some(theme.as_str().to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(&prefs).context("Failed to encode prefs")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write prefs file: {}", self.path.display()))?;
        log::debug!("[prefs] saved theme={} to {}", theme, self.path.display());
        Ok(())
    }
}
