//! Persisted theme preference.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key the theme is stored under in key-value stores.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Stored value first, then the OS preference signal, then dark.
    pub fn resolve(stored: Option<Theme>, system_prefers_dark: Option<bool>) -> Theme {
        match (stored, system_prefers_dark) {
            (Some(theme), _) => theme,
            (None, Some(true)) => Theme::Dark,
            (None, Some(false)) => Theme::Light,
            (None, None) => Theme::default(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme {other:?}")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// Where preferences are persisted.
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences>;
    fn save(&mut self, prefs: &Preferences) -> Result<()>;
}

/// Theme preference on top of a store and an optional OS signal.
pub struct ThemeSettings<S: PreferenceStore> {
    store: S,
    system_prefers_dark: Option<bool>,
}

impl<S: PreferenceStore> ThemeSettings<S> {
    pub fn new(store: S, system_prefers_dark: Option<bool>) -> Self {
        Self { store, system_prefers_dark }
    }

    fn stored(&self) -> Preferences {
        self.store.load().unwrap_or_else(|e| {
            log::warn!("failed to read preferences: {e}");
            Preferences::default()
        })
    }

    /// Current theme. Unreadable stored preferences are ignored.
    pub fn theme(&self) -> Theme {
        Theme::resolve(self.stored().theme, self.system_prefers_dark)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let mut prefs = self.stored();
        prefs.theme = Some(theme);
        self.store.save(&prefs)
    }

    /// Flip the current theme and persist it.
    pub fn toggle(&mut self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    prefs: Preferences,
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences> {
        Ok(self.prefs)
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        self.prefs = *prefs;
        Ok(())
    }
}

/// Preferences serialized as JSON in a file.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/asciify/preferences.json`
    pub fn default_path() -> Result<std::path::PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("asciify").join("preferences.json"))
            .ok_or_else(|| crate::AsciiError::Preferences("no config directory on this platform".into()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for JsonFileStore {
    /// Missing file gives defaults. A file that does not parse is ignored.
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                log::warn!("ignoring corrupt preferences file {}: {e}", self.path.display());
                Ok(Preferences::default())
            }
        }
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(prefs)?)?;
        log::debug!("saved preferences to {}", self.path.display());
        Ok(())
    }
}
