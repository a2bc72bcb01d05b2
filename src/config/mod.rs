//! Configuration management for mushaf

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::addressing::DEFAULT_VERSE_AUDIO_BASE;
use crate::invocation::Reciter;
use crate::theme::Theme;

/// Paths of the backend endpoints, relative to `api_base_url`
///
/// `{number}`, `{id}` and `{offset}` are substituted per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    /// Chapter catalogue
    pub chapters: String,
    /// One chapter with its verses
    pub chapter: String,
    /// Word metadata, keyed by verse id and zero-based word offset
    pub word: String,
    /// Opening invocation record
    pub invocation: String,
    /// Bookmark creation
    pub bookmarks: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            chapters: "/api/surahs/".to_string(),
            chapter: "/api/surahs/{number}/".to_string(),
            word: "/api/verse/{id}/word/{offset}/".to_string(),
            invocation: "/api/bismillah/".to_string(),
            bookmarks: "/api/bookmarks/".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the content backend
    pub api_base_url: String,

    /// Endpoint paths under `api_base_url`
    pub endpoints: ApiEndpoints,

    /// Base URL of the primary verse recitation provider
    pub verse_audio_base_url: String,

    /// Verses shown per page
    pub verses_per_page: usize,

    /// Surah opened on start
    pub default_surah: u16,

    /// Reciter of the full invocation audio
    pub reciter: Reciter,

    /// Play a word's audio as soon as its detail opens
    pub auto_play_word_audio: bool,

    /// Timeout for backend and audio requests
    pub request_timeout_secs: u64,

    /// Selected theme name
    pub theme: String,

    /// Custom theme overrides (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<Theme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            endpoints: ApiEndpoints::default(),
            verse_audio_base_url: DEFAULT_VERSE_AUDIO_BASE.to_string(),
            verses_per_page: 10,
            default_surah: 1,
            reciter: Reciter::default(),
            auto_play_word_audio: false,
            request_timeout_secs: 30,
            theme: "Tokyo Night".to_string(),
            custom_theme: None,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mushaf").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mushaf").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the log file path used while the terminal UI is running
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("mushaf.log"))
    }

    /// Verses per page, never below one
    pub fn page_size(&self) -> usize {
        self.verses_per_page.max(1)
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        self.custom_theme.clone().unwrap_or_else(Theme::tokyo_night)
    }
}
