use anyhow::{Context, Result};
use directories::UserDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::util::write_atomic;

// ── Top-level config ──────────────────────────────────────────────

/// Top-level Solace configuration, loaded from `config.toml`.
///
/// Resolution order: `SOLACE_CONFIG_DIR` env → `~/.solace/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Data directory for stored collections - computed, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Default log filter when `RUST_LOG` is unset. Default: `"info"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Remote classification/response service (`[classifier]`).
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Chat behaviour (`[chat]`).
    #[serde(default)]
    pub chat: ChatConfig,

    /// Persistent store (`[storage]`).
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_log_level() -> String {
    "info".into()
}

/// Classifier service configuration (`[classifier]` section).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifierConfig {
    /// Endpoint receiving `{message, conversationHistory}`. Overridden by `SOLACE_API_URL`.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Bearer token identifying the user session. Overridden by `SOLACE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Upper bound on one classifier call, in seconds. Default: `30`.
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: default_classifier_timeout_secs(),
        }
    }
}

/// Chat configuration (`[chat]` section).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatConfig {
    /// Cosmetic "typing" pause before a reply is shown, in milliseconds. Default: `600`.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
    /// Name used for greetings when none has been stored through onboarding.
    #[serde(default)]
    pub display_name: Option<String>,
}

fn default_typing_delay_ms() -> u64 {
    600
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            display_name: None,
        }
    }
}

/// Storage configuration (`[storage]` section).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// `"file"` (default) or `"memory"`.
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Override for the data directory. Default: `<config dir>/data`.
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_storage_backend() -> String {
    "file".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            dir: None,
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let solace_dir = home.join(".solace");

        Self {
            data_dir: solace_dir.join("data"),
            config_path: solace_dir.join("config.toml"),
            log_level: default_log_level(),
            classifier: ClassifierConfig::default(),
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".solace"))
}

fn resolve_config_dir() -> Result<PathBuf> {
    if let Ok(custom_config_dir) = std::env::var("SOLACE_CONFIG_DIR") {
        let custom_config_dir = custom_config_dir.trim();
        if !custom_config_dir.is_empty() {
            return Ok(PathBuf::from(custom_config_dir));
        }
    }
    default_config_dir()
}

fn resolve_data_dir(config_dir: &Path, storage: &StorageConfig) -> PathBuf {
    match storage.dir.as_deref().map(str::trim) {
        Some(dir) if !dir.is_empty() => {
            let dir = PathBuf::from(dir);
            if dir.is_absolute() {
                dir
            } else {
                config_dir.join(dir)
            }
        }
        _ => config_dir.join("data"),
    }
}

impl Config {
    pub async fn load_or_init() -> Result<Self> {
        let config_dir = resolve_config_dir()?;
        Self::load_or_init_in(&config_dir).await
    }

    /// Load `config.toml` from `config_dir`, writing defaults if it does not
    /// exist yet.
    pub async fn load_or_init_in(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");

        fs::create_dir_all(config_dir).await.with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;

        let initialized = !config_path.exists();
        let mut config = if initialized {
            let mut config = Config::default();
            config.config_path = config_path.clone();
            config.save().await?;

            // Restrict permissions on newly created config file (may contain an API key)
            #[cfg(unix)]
            {
                use std::{fs::Permissions, os::unix::fs::PermissionsExt};
                let _ = fs::set_permissions(&config_path, Permissions::from_mode(0o600)).await;
            }
            config
        } else {
            let contents = fs::read_to_string(&config_path)
                .await
                .context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.clone();
            config
        };

        config.data_dir = resolve_data_dir(config_dir, &config.storage);
        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(
            path = %config.config_path.display(),
            data = %config.data_dir.display(),
            initialized,
            "Config loaded"
        );
        Ok(config)
    }

    /// Validate configuration values that would cause runtime failures.
    pub fn validate(&self) -> Result<()> {
        if self.classifier.timeout_secs == 0 {
            anyhow::bail!("classifier.timeout_secs must be greater than 0");
        }
        if let Some(url) = &self.classifier.api_url {
            let url = url.trim();
            if url.is_empty() {
                anyhow::bail!("classifier.api_url must not be empty when set");
            }
            reqwest::Url::parse(url)
                .with_context(|| format!("classifier.api_url is not a valid URL: {url}"))?;
        }
        match self.storage.backend.trim().to_ascii_lowercase().as_str() {
            "file" | "memory" => {}
            other => anyhow::bail!("storage.backend must be \"file\" or \"memory\", got {other:?}"),
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("log_level must not be empty");
        }
        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SOLACE_API_URL") {
            if !url.is_empty() {
                self.classifier.api_url = Some(url);
            }
        }

        if let Ok(key) = std::env::var("SOLACE_API_KEY") {
            if !key.is_empty() {
                self.classifier.api_key = Some(key);
            }
        }

        if let Ok(timeout) = std::env::var("SOLACE_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.classifier.timeout_secs = secs,
                _ => tracing::warn!(value = %timeout, "Ignoring invalid SOLACE_TIMEOUT_SECS"),
            }
        }

        if let Ok(dir) = std::env::var("SOLACE_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Ok(level) = std::env::var("SOLACE_LOG") {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_string();
            }
        }
    }

    pub async fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let parent_dir = self
            .config_path
            .parent()
            .context("Config path must have a parent directory")?;

        fs::create_dir_all(parent_dir).await.with_context(|| {
            format!(
                "Failed to create config directory: {}",
                parent_dir.display()
            )
        })?;

        let file_name = self
            .config_path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("config.toml");
        let backup_path = parent_dir.join(format!("{file_name}.bak"));

        let had_existing_config = self.config_path.exists();
        if had_existing_config {
            fs::copy(&self.config_path, &backup_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create config backup before atomic replace: {}",
                        backup_path.display()
                    )
                })?;
        }

        if let Err(e) = write_atomic(&self.config_path, toml_str.as_bytes()).await {
            if had_existing_config && backup_path.exists() {
                fs::copy(&backup_path, &self.config_path)
                    .await
                    .context("Failed to restore config backup")?;
            }
            return Err(e.context("Failed to save config file"));
        }

        if had_existing_config {
            let _ = fs::remove_file(&backup_path).await;
        }

        Ok(())
    }

    /// Log filter to use before the config is fully loaded.
    ///
    /// `SOLACE_LOG` wins, then `log_level` from an existing `config.toml`,
    /// then `"info"`. Read or parse failures fall through to the default;
    /// `load_or_init` reports them once logging is up.
    pub fn startup_log_level() -> String {
        let env_level = std::env::var("SOLACE_LOG").ok();
        match resolve_config_dir() {
            Ok(dir) => startup_log_level_in(&dir, env_level.as_deref()),
            Err(_) => env_level
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(default_log_level),
        }
    }
}

#[derive(Deserialize)]
struct LogLevelOnly {
    log_level: Option<String>,
}

fn startup_log_level_in(config_dir: &Path, env_level: Option<&str>) -> String {
    if let Some(level) = env_level.map(str::trim).filter(|l| !l.is_empty()) {
        return level.to_string();
    }
    std::fs::read_to_string(config_dir.join("config.toml"))
        .ok()
        .and_then(|raw| toml::from_str::<LogLevelOnly>(&raw).ok())
        .and_then(|c| c.log_level)
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(default_log_level)
}
