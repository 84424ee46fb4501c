//! Configuration management for awsquiz
//!
//! Parses TOML configuration files and provides typed access to settings.
//! API keys are secrets and never live in the file; see [`ApiKeys`].

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Upper bound for any provider timeout, in seconds
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Provider settings, one entry per supported LLM API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(
        default = "ProviderSettings::openai_defaults",
        deserialize_with = "ProviderSettings::deserialize_openai"
    )]
    pub openai: ProviderSettings,
    #[serde(
        default = "ProviderSettings::gemini_defaults",
        deserialize_with = "ProviderSettings::deserialize_gemini"
    )]
    pub gemini: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::openai_defaults(),
            gemini: ProviderSettings::gemini_defaults(),
        }
    }
}

/// Settings for a single provider
///
/// Fields are private; the file is the only way to set them and
/// `Config::validate()` checks them once after parsing. Fields missing from
/// a provider section fall back to that provider's own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSettings {
    model: String,
    base_url: String,
    timeout_seconds: u64,
}

/// A provider section as written in the file, before defaults are applied
#[derive(Deserialize)]
struct ProviderSection {
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ProviderSection {
    fn or_defaults(self, defaults: ProviderSettings) -> ProviderSettings {
        ProviderSettings {
            model: self.model.unwrap_or(defaults.model),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            timeout_seconds: self.timeout_seconds.unwrap_or(defaults.timeout_seconds),
        }
    }
}

fn default_provider_timeout() -> u64 {
    15
}

impl ProviderSettings {
    fn deserialize_openai<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ProviderSection::deserialize(deserializer).map(|s| s.or_defaults(Self::openai_defaults()))
    }

    fn deserialize_gemini<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ProviderSection::deserialize(deserializer).map(|s| s.or_defaults(Self::gemini_defaults()))
    }

    fn openai_defaults() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_seconds: default_provider_timeout(),
        }
    }

    fn gemini_defaults() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: default_provider_timeout(),
        }
    }

    /// Model identifier sent to the provider
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Per-call timeout in seconds
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate(&self, provider: &str) -> crate::error::AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(crate::error::AppError::Config(format!(
                "providers.{}.model must not be empty",
                provider
            )));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(crate::error::AppError::Config(format!(
                "providers.{}.base_url '{}' must start with 'http://' or 'https://'",
                provider, self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(format!(
                "providers.{}.timeout_seconds must be greater than 0",
                provider
            )));
        }
        if self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(crate::error::AppError::Config(format!(
                "providers.{}.timeout_seconds cannot exceed {} seconds, got {}",
                provider, MAX_TIMEOUT_SECONDS, self.timeout_seconds
            )));
        }

        Ok(())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load from `path` if it exists
    ///
    /// Returns `Ok(None)` when there is no file, so the caller can fall back
    /// to `Config::default()` and say so once logging is up.
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Option<Self>> {
        if path.as_ref().exists() {
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`.
    pub fn validate(&self) -> crate::error::AppResult<()> {
        self.providers.openai.validate("openai")?;
        self.providers.gemini.validate("gemini")?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Provider API keys, read once at process start
///
/// An empty value counts as absent.
#[derive(Clone, Default)]
pub struct ApiKeys {
    openai: Option<String>,
    gemini: Option<String>,
}

impl ApiKeys {
    pub fn new(openai: Option<String>, gemini: Option<String>) -> Self {
        let present = |key: Option<String>| key.filter(|k| !k.trim().is_empty());
        Self {
            openai: present(openai),
            gemini: present(gemini),
        }
    }

    /// Read `OPENAI_API_KEY` and `GEMINI_API_KEY` from the process environment
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(OPENAI_API_KEY_ENV).ok(),
            std::env::var(GEMINI_API_KEY_ENV).ok(),
        )
    }

    pub fn openai(&self) -> Option<&str> {
        self.openai.as_deref()
    }

    pub fn gemini(&self) -> Option<&str> {
        self.gemini.as_deref()
    }

    /// True when neither key is configured
    pub fn is_empty(&self) -> bool {
        self.openai.is_none() && self.gemini.is_none()
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "<redacted>"))
            .field("gemini", &self.gemini.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
