//! # Configuration
//!
//! Wardrobe configuration is a [`confique`] struct loaded from layered
//! sources.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `WARDROBE_SEARCH_DEBOUNCE_MS`, `WARDROBE_REMOVE_BACKGROUND`.
//! 2. **Explicit file**: the path passed to [`WardrobeConfig::load`], if any.
//! 3. **Global Config**: `wardrobe.toml` in the OS config directory (via `directories`).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! Missing files are skipped.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `search_debounce_ms` | `300` | Quiet period before a search string is applied |
//! | `remove_background` | `false` | Remove image backgrounds unless a category says otherwise |

use std::path::{Path, PathBuf};
use std::time::Duration;

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CONFIG_FILE_NAME: &str = "wardrobe.toml";

/// Configuration for the wardrobe core, stored in `wardrobe.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WardrobeConfig {
    /// Milliseconds to wait after the last search keystroke before filtering.
    #[config(env = "WARDROBE_SEARCH_DEBOUNCE_MS", default = 300)]
    pub search_debounce_ms: u64,

    /// Default background-removal preference for new images.
    #[config(env = "WARDROBE_REMOVE_BACKGROUND", default = false)]
    pub remove_background: bool,
}

impl Default for WardrobeConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            remove_background: false,
        }
    }
}

impl WardrobeConfig {
    /// Load from the environment, an optional explicit file, the global
    /// config file and finally the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        Ok(builder.load()?)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Resolve a category's background-removal preference against the default.
    pub fn remove_background_for(&self, category_preference: Option<bool>) -> bool {
        category_preference.unwrap_or(self.remove_background)
    }
}

/// `wardrobe.toml` in the OS-specific config directory, if one can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "wardrobe", "wardrobe")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
