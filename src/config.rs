use crate::domain::availability::WorkingHours;
use crate::domain::codec::DEFAULT_INITIAL_STATUS;
use crate::infrastructure::notion_adapter::{NotionConfig, DEFAULT_API_BASE_URL};
use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const API_KEY_ENV: &str = "NOTION_API_KEY";
pub const DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_id: Option<String>,
    pub api_base_url: String,
    pub initial_status: String,
    pub work_start: u32,
    pub work_end: u32,
    pub recent_limit: usize,
    pub theme: ThemeMode,
    pub log_file: Option<PathBuf>,

    // Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            initial_status: DEFAULT_INITIAL_STATUS.to_string(),
            work_start: 9,
            work_end: 17,
            recent_limit: 10,
            theme: ThemeMode::Dark,
            log_file: None,
            api_key: None,
        }
    }
}

#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(".config");
        path.push("pagechat");
        path
    })
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

impl AppConfig {
    /// Load `path` (or the default location), then apply environment overrides.
    /// A missing or unreadable file yields the defaults.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let mut config = path.as_deref().map(Self::from_file).unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn from_file(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                Self::default()
            }
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(id) = lookup(DATABASE_ID_ENV).filter(|v| !v.is_empty()) {
            self.database_id = Some(id);
        }
    }

    /// Configured working hours, or the defaults when they are out of range.
    #[must_use]
    pub fn working_hours(&self) -> WorkingHours {
        WorkingHours::new(self.work_start, self.work_end).unwrap_or_else(|| {
            warn!(
                start = self.work_start,
                end = self.work_end,
                "invalid working hours, falling back to defaults"
            );
            WorkingHours::default()
        })
    }

    #[must_use]
    pub fn notion(&self) -> NotionConfig {
        NotionConfig {
            api_key: self.api_key.clone(),
            database_id: self.database_id.clone(),
            base_url: self.api_base_url.clone(),
        }
    }

    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| config_dir().map(|dir| dir.join("pagechat.log")))
    }
}
