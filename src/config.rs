//! Configuration management for ghlink using the prefer crate.
//!
//! Settings come from three places, later ones winning:
//! 1. A config file (explicit `--config`, prefer discovery, or the default
//!    location under the user's config directory)
//! 2. `GHLINK_*` environment variables (and `GITHUB_TOKEN`)
//! 3. CLI flags

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Branch assumed for raw file URLs when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default config filename inside the config directory.
const CONFIG_FILENAME: &str = "config.toml";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "token",
    "owner",
    "repo",
    "custom_domain",
    "branch",
    "layout",
    "api_url",
    "request_timeout",
];

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown config key '{0}' (expected one of: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("No config directory available; pass --config")]
    NoConfigDir,
}

/// How links are stored in the repository.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RegistryLayout {
    /// One `database.json` index at the repository root.
    #[default]
    Index,
    /// One folder of static pages per slug.
    Pages,
}

impl RegistryLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Pages => "pages",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "index" => Some(Self::Index),
            "pages" => Some(Self::Pages),
            _ => None,
        }
    }
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Personal access token.
    pub token: String,
    /// Repository owner (GitHub username or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Custom domain serving the repository's pages, if any.
    pub custom_domain: Option<String>,
    /// Branch to read and write. `None` uses the repository default.
    pub branch: Option<String>,
    /// Storage layout.
    pub layout: RegistryLayout,
    /// GitHub REST API base URL.
    pub api_url: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            custom_domain: None,
            branch: None,
            layout: RegistryLayout::default(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Check that token, owner and repository are all set.
    pub fn has_credentials(&self) -> bool {
        !self.token.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }

    /// Public base URL the repository's pages are served from.
    pub fn base_url(&self) -> String {
        match self.custom_domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => format!("https://{}", domain.trim_end_matches('/')),
            None => format!("https://{}.github.io/{}", self.owner, self.repo),
        }
    }

    /// Base URL without the scheme, ending with `/`.
    pub fn slug_prefix(&self) -> String {
        let base = self.base_url();
        format!("{}/", base.trim_start_matches("https://"))
    }

    /// Short URL for a slug.
    pub fn short_url(&self, slug: impl AsRef<str>) -> String {
        format!("{}/{}", self.base_url(), slug.as_ref())
    }

    /// Branch used in raw file URLs.
    pub fn branch_or_default(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Raw download URL for a file in the repository.
    pub fn raw_file_url(&self, path: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            self.owner,
            self.repo,
            self.branch_or_default(),
            path
        )
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Personal access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Repository owner.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "username")]
    pub owner: Option<String>,
    /// Repository name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Custom domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    /// Branch to read and write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Storage layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<RegistryLayout>,
    /// GitHub API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to the default config location, then to an empty config.
    pub async fn load() -> Self {
        if let Ok(pref_config) = prefer::load("ghlink").await {
            if let Some(path) = pref_config.source_path() {
                match Self::load_from_path(path).await {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring unreadable config: {}", e),
                }
            }
        }

        if let Some(path) = Self::default_path().filter(|p| p.exists()) {
            match Self::load_from_path(&path).await {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring unreadable config: {}", e),
            }
        }

        Self::default()
    }

    /// Default config file location (`<config dir>/ghlink/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ghlink").join(CONFIG_FILENAME))
    }

    /// Load configuration from a specific file path.
    /// TOML for `.toml`, JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: Config = if is_toml(path) {
            toml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to a file, creating parent directories.
    pub async fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let contents = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(path, contents).await.map_err(io_err)?;

        restrict_permissions(path);
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Set a single field by key. An empty value clears the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let text = (!value.is_empty()).then(|| value.to_string());
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "token" => self.token = text,
            "owner" | "username" => self.owner = text,
            "repo" => self.repo = text,
            "custom_domain" | "domain" => self.custom_domain = text,
            "branch" => self.branch = text,
            "api_url" => self.api_url = text,
            "layout" => {
                self.layout = match text {
                    Some(v) => Some(RegistryLayout::from_str(&v).ok_or_else(invalid)?),
                    None => None,
                }
            }
            "request_timeout" => {
                self.request_timeout = match text {
                    Some(v) => Some(v.parse().map_err(|_| invalid())?),
                    None => None,
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref token) = self.token {
            settings.token = token.clone();
        }
        if let Some(ref owner) = self.owner {
            settings.owner = owner.clone();
        }
        if let Some(ref repo) = self.repo {
            settings.repo = repo.clone();
        }
        if let Some(ref domain) = self.custom_domain {
            settings.custom_domain = Some(domain.clone());
        }
        if let Some(ref branch) = self.branch {
            settings.branch = Some(branch.clone());
        }
        if let Some(layout) = self.layout {
            settings.layout = layout;
        }
        if let Some(ref api_url) = self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(true, |ext| ext.eq_ignore_ascii_case("toml"))
}

/// The file holds a token; keep it owner-readable only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::debug!("Could not restrict permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Layout override from the command line.
    pub layout: Option<RegistryLayout>,
}

impl LoadOptions {
    /// Path `config set` writes to: explicit flag, else the loaded file,
    /// else the default location.
    pub fn write_path(&self, config: &Config) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.config_path {
            return Ok(expand_path(path));
        }
        if let Some(ref path) = config.source_path {
            return Ok(path.clone());
        }
        Config::default_path().ok_or(ConfigError::NoConfigDir)
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Apply `GHLINK_*` overrides using the given variable lookup.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(token) = var("GHLINK_TOKEN").or_else(|| var("GITHUB_TOKEN")) {
        settings.token = token;
    }
    if let Some(owner) = var("GHLINK_OWNER") {
        settings.owner = owner;
    }
    if let Some(repo) = var("GHLINK_REPO") {
        settings.repo = repo;
    }
    if let Some(domain) = var("GHLINK_DOMAIN") {
        settings.custom_domain = Some(domain);
    }
    if let Some(branch) = var("GHLINK_BRANCH") {
        settings.branch = Some(branch);
    }
    if let Some(api_url) = var("GHLINK_API_URL") {
        settings.api_url = api_url;
    }
    if let Some(layout) = var("GHLINK_LAYOUT") {
        match RegistryLayout::from_str(&layout) {
            Some(layout) => settings.layout = layout,
            None => tracing::warn!("Ignoring unknown GHLINK_LAYOUT '{}'", layout),
        }
    }
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: &LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        // Priority 1: explicit --config flag; a missing file is fine for `config set`
        Some(ref path) => {
            let path = expand_path(path);
            if path.exists() {
                Config::load_from_path(&path).await?
            } else {
                tracing::debug!("Config file {} does not exist yet", path.display());
                Config::default()
            }
        }
        // Priority 2: discovery
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    if let Some(layout) = options.layout {
        settings.layout = layout;
    }

    Ok((settings, config))
}
