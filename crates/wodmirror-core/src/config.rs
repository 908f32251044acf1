//! Configuration module for wodmirror.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! The configuration is static: it is resolved once at startup and never
//! reloaded during a run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "WODMIRROR_CONFIG";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for wodmirror.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Source feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Origin of the blog; listing pages live at `{base_url}/page/{n}/`.
    pub base_url: String,
    /// Highest listing page visited in one run (safety ceiling).
    pub max_pages: u32,
    /// Deadline for each individual HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// Fixed outbound user agent. When `None` one is looked up at startup.
    pub user_agent: Option<String>,
    /// JSON list of current browser user agents to pick from.
    pub user_agent_source: String,
    /// Operating system the chosen user agent must mention.
    pub user_agent_os: String,
    /// Browser the chosen user agent must mention.
    pub user_agent_browser: String,
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON artifact per record.
    pub output_dir: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return [`Config::default`].
    ///
    /// Unlike a silent fallback, a file that exists but cannot be read or
    /// parsed is an error.
    pub fn load_if_exists(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/wodmirror/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("wodmirror")
            .join("config.yaml")
    }

    /// Configuration path honouring the [`CONFIG_PATH_ENV`] override.
    pub fn resolve_path() -> PathBuf {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => Self::default_path(),
        }
    }
}

impl FeedConfig {
    /// Parsed [`FeedConfig::base_url`].
    pub fn base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid feed.base_url '{}'", self.base_url))
    }

    /// URL of the listing page with the given 1-based index.
    pub fn listing_url(&self, page: u32) -> anyhow::Result<Url> {
        let raw = format!("{}/page/{}/", self.base_url.trim_end_matches('/'), page);
        Url::parse(&raw).with_context(|| format!("Invalid listing URL '{raw}'"))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.
// (clippy::derivable_impls)

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wods.crossfitpanda.com".to_string(),
            max_pages: 300,
            request_timeout_secs: 30,
            user_agent: None,
            user_agent_source: "https://jnrbsn.github.io/user-agents/user-agents.json"
                .to_string(),
            user_agent_os: "windows".to_string(),
            user_agent_browser: "chrome".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("workouts"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"feed.max_pages"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- feed ---
        match Url::parse(&self.feed.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError {
                field: "feed.base_url".into(),
                message: format!("unsupported scheme '{}'; expected http or https", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "feed.base_url".into(),
                message: format!("not a valid URL: {e}"),
            }),
        }
        if self.feed.max_pages == 0 {
            errors.push(ValidationError {
                field: "feed.max_pages".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.feed.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "feed.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if let Some(ref ua) = self.feed.user_agent {
            if ua.trim().is_empty() {
                errors.push(ValidationError {
                    field: "feed.user_agent".into(),
                    message: "must not be empty when set".into(),
                });
            }
        }
        if let Err(e) = Url::parse(&self.feed.user_agent_source) {
            errors.push(ValidationError {
                field: "feed.user_agent_source".into(),
                message: format!("not a valid URL: {e}"),
            });
        }

        // --- store ---
        if self.store.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "store.output_dir".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use wodmirror_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .feed_base_url("https://blog.example.com")
///     .feed_max_pages(5)
///     .store_output_dir("/tmp/workouts")
///     .build();
/// assert_eq!(config.feed.max_pages, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- feed ---

    pub fn feed_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.feed.base_url = url.into();
        self
    }

    pub fn feed_max_pages(mut self, pages: u32) -> Self {
        self.config.feed.max_pages = pages;
        self
    }

    pub fn feed_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.feed.request_timeout_secs = seconds;
        self
    }

    pub fn feed_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.feed.user_agent = Some(user_agent.into());
        self
    }

    pub fn feed_user_agent_source(mut self, url: impl Into<String>) -> Self {
        self.config.feed.user_agent_source = url.into();
        self
    }

    // --- store ---

    pub fn store_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.store.output_dir = dir.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
