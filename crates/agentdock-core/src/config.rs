//! Configuration management for agentdock.
//!
//! Loads configuration from ${AGENTDOCK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::relay::DEFAULT_TIMEOUT;

/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "AGENTDOCK_BASE_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for agentdock configuration and data directories.
    //!
    //! AGENTDOCK_HOME resolution order:
    //! 1. AGENTDOCK_HOME environment variable (if set)
    //! 2. ~/.config/agentdock (default)

    use std::path::PathBuf;

    /// Returns the agentdock home directory.
    pub fn agentdock_home() -> PathBuf {
        if let Ok(home) = std::env::var("AGENTDOCK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".agentdock"),
            |h| h.join(".config").join("agentdock"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        agentdock_home().join("config.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        agentdock_home().join("logs")
    }
}

/// Agent endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the backend (optional; falls back to the default).
    pub base_url: Option<String>,
    /// Chat endpoint path.
    pub chat_path: String,
    /// Conversation reset endpoint path.
    pub reset_path: String,
    /// Client-side timeout in seconds (0 uses the default).
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000";
    pub const DEFAULT_CHAT_PATH: &'static str = "/api/agent/chat";
    pub const DEFAULT_RESET_PATH: &'static str = "/api/agent/reset";

    /// Returns the configured base URL, treating empty strings as unset.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Returns the client-side timeout for one relay call.
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            chat_path: Self::DEFAULT_CHAT_PATH.to_string(),
            reset_path: Self::DEFAULT_RESET_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Widget presentation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Header title.
    pub title: String,
    /// First agent message shown at startup.
    pub greeting: String,
    /// Muted hint appended under the greeting (empty hides it).
    pub hint: String,
    /// Placeholder shown in an empty input line.
    pub input_placeholder: String,
    /// Footer line under the input.
    pub footer: String,
    /// Whether the widget starts open.
    pub start_open: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "AI Agent Assistant".to_string(),
            greeting: "Hello! I'm the ERP system's AI assistant.\n\n\
                       I can help you:\n\
                       📦 Create and look up orders\n\
                       📊 Check inventory status\n\
                       📈 Get sales reports"
                .to_string(),
            hint: "Tip: start the LLM agent backend first: ./start_llm_agent.sh".to_string(),
            input_placeholder: "Type a request, e.g. list all orders...".to_string(),
            footer: "Powered by Ollama + Qwen 2.5".to_string(),
            start_open: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing filter directive (e.g. "warn", "agentdock_core=debug").
    pub filter: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub widget: WidgetConfig,
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the base URL with precedence: override > env > config > default.
    ///
    /// # Errors
    /// Returns an error if the winning value is not a valid URL.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> Result<String> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        let candidates = [
            override_url,
            env_url.as_deref(),
            self.endpoint.effective_base_url(),
        ];

        for candidate in candidates.into_iter().flatten() {
            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        Ok(EndpointConfig::DEFAULT_BASE_URL.to_string())
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only `endpoint.base_url` to the default config file.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the file cannot be written.
    pub fn save_base_url(url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), url)
    }

    /// Saves only `endpoint.base_url` to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the file cannot be written.
    pub fn save_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let url = url.trim();
        validate_url(url)?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["endpoint"]["base_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).with_context(|| format!("Invalid agent base URL: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid agent base URL: {url} (expected http or https)");
    }
    Ok(())
}
