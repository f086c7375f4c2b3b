//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (VODSITE_*)
//! 2. TOML config file (if VODSITE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

use crate::sitemap::SitemapConfig;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (VODSITE_*)
/// 2. TOML config file (if VODSITE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store project identifier selecting the logical dataset/tenant.
    ///
    /// Set via VODSITE_PROJECT_ID environment variable.
    /// Required whenever the store client is constructed.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Database name within the project.
    ///
    /// Set via VODSITE_DATABASE environment variable.
    #[serde(default = "default_database")]
    pub database: String,

    /// Store API key for restricted datasets.
    ///
    /// Set via VODSITE_API_KEY environment variable. Not needed for the
    /// emulator or datasets with open read rules.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Documents fetched per page during collection scans.
    ///
    /// Set via VODSITE_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Public site origin that sitemap locations are joined onto.
    ///
    /// Set via VODSITE_SITE_BASE_URL environment variable.
    /// Required only when rendering sitemap XML.
    #[serde(default)]
    pub site_base_url: Option<String>,

    /// Base URL of the host serving directly hosted video files.
    ///
    /// Set via VODSITE_MEDIA_BASE_URL environment variable. When unset,
    /// every video entry falls back to its external player URL.
    #[serde(default)]
    pub media_base_url: Option<String>,

    /// Prefix for external player watch URLs.
    ///
    /// Set via VODSITE_PLAYER_BASE_URL environment variable.
    #[serde(default = "default_player_base_url")]
    pub player_base_url: String,

    /// User-Agent string for store requests.
    ///
    /// Set via VODSITE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via VODSITE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_database() -> String {
    "(default)".into()
}

fn default_page_size() -> usize {
    20
}

fn default_player_base_url() -> String {
    "https://www.youtube.com/watch?v=".into()
}

fn default_user_agent() -> String {
    "vodsite/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database: default_database(),
            api_key: None,
            page_size: default_page_size(),
            site_base_url: None,
            media_base_url: None,
            player_base_url: default_player_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `VODSITE_`
    /// 2. TOML file from `VODSITE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("VODSITE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("VODSITE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the project id is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the project id is not set.
    pub fn require_project_id(&self) -> Result<&str, ConfigError> {
        self.project_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "project_id".into(),
            hint: "Set VODSITE_PROJECT_ID environment variable".into(),
        })
    }

    /// Check if the site base URL is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the site base URL is not set.
    pub fn require_site_base_url(&self) -> Result<&str, ConfigError> {
        self.site_base_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "site_base_url".into(),
            hint: "Set VODSITE_SITE_BASE_URL environment variable".into(),
        })
    }

    /// Projection settings derived from this configuration.
    pub fn sitemap(&self) -> SitemapConfig {
        SitemapConfig {
            media_base_url: self.media_base_url.clone(),
            player_base_url: self.player_base_url.clone(),
        }
    }
}
