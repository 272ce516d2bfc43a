//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;

/// Placeholder written by `init-config`; never a usable token
pub const TOKEN_PLACEHOLDER: &str = "your_bot_token_here";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub commands: CommandsConfig,
    pub credentials: CredentialsConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: char,
    /// User id allowed to run owner-only commands
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandsConfig {
    pub directory: PathBuf,
    /// Commands to activate; all built-in commands when unset
    pub enabled: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CredentialsConfig {
    pub token: Option<String>,
    pub server_id: Option<String>,
    pub alerts_channel_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub telegram: TelegramConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "discbot".to_string(),
            prefix: '$',
            owner: None,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./commands"),
            enabled: None,
        }
    }
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            console: ConsoleConfig { enabled: true },
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Load the file if it exists, otherwise defaults, then apply environment overrides
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("BOT_TOKEN") {
            self.credentials.token = Some(token);
        }
        if let Some(server_id) = var("BOT_SERVER_ID") {
            self.credentials.server_id = Some(server_id);
        }
        if let Some(channel) = var("BOT_ALERTS_CHANNEL_ID") {
            self.credentials.alerts_channel_id = Some(channel);
        }
        if let Some(owner) = var("BOT_OWNER_ID") {
            self.bot.owner = Some(owner);
        }
        if let Some(dir) = var("BOT_COMMANDS_DIR") {
            self.commands.directory = PathBuf::from(dir);
        }
        if let Some(prefix) = var("BOT_PREFIX") {
            let mut chars = prefix.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.bot.prefix = c,
                _ => tracing::warn!("Ignoring BOT_PREFIX '{}': must be a single character", prefix),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.bot.prefix;
        if prefix.is_whitespace() || prefix.is_alphanumeric() {
            return Err(ConfigError::InvalidValue(format!(
                "bot.prefix '{}' must be a symbol",
                prefix
            )));
        }
        Ok(())
    }

    /// Token usable for connecting, ignoring blanks and the placeholder
    pub fn token(&self) -> Option<&str> {
        self.credentials
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != TOKEN_PLACEHOLDER)
    }

    /// Token to connect to Telegram with, when that adapter is enabled
    pub fn telegram_token(&self) -> Option<&str> {
        self.token().filter(|_| self.adapters.telegram.enabled)
    }
}
