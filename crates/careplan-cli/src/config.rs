//! Configuration file management for careplan.
//!
//! Provides a TOML-based config file at `~/.config/careplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use careplan_core::generator::GeneratorConfig;

pub const ENV_API_URL: &str = "CAREPLAN_API_URL";
pub const ENV_MODEL: &str = "CAREPLAN_MODEL";
pub const ENV_API_KEY: &str = "CAREPLAN_API_KEY";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            base_url: GeneratorConfig::DEFAULT_URL.to_string(),
            model: GeneratorConfig::DEFAULT_MODEL.to_string(),
            temperature: GeneratorConfig::DEFAULT_TEMPERATURE,
            max_retries: GeneratorConfig::DEFAULT_MAX_RETRIES,
            timeout_secs: GeneratorConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the careplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/careplan` or
/// `~/.config/careplan`, including on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("careplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("careplan")
}

/// Return the path to the careplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct CareplanConfig {
    pub generator: GeneratorConfig,
}

impl CareplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - URL: `--api-url` > `CAREPLAN_API_URL` > `generator.base_url` > `GeneratorConfig::DEFAULT_URL`
    /// - Model: `--model` > `CAREPLAN_MODEL` > `generator.model` > `GeneratorConfig::DEFAULT_MODEL`
    /// - API key: `--api-key` > `CAREPLAN_API_KEY` > `auth.api_key` > unset
    ///
    /// A missing API key is not an error here; the client reports it when a
    /// command actually needs to generate.
    pub fn resolve(cli: &CliOverrides) -> Self {
        let file_config = load_config().ok();
        Self::resolve_with(cli, file_config)
    }

    /// Same as [`CareplanConfig::resolve`] with an already-loaded config file.
    pub fn resolve_with(cli: &CliOverrides, file_config: Option<ConfigFile>) -> Self {
        let file = file_config.unwrap_or_default();

        let base_url = pick(cli.api_url.clone(), ENV_API_URL, Some(file.generator.base_url))
            .unwrap_or_else(|| GeneratorConfig::DEFAULT_URL.to_string());
        let model = pick(cli.model.clone(), ENV_MODEL, Some(file.generator.model))
            .unwrap_or_else(|| GeneratorConfig::DEFAULT_MODEL.to_string());
        let api_key = pick(cli.api_key.clone(), ENV_API_KEY, file.auth.api_key);

        let generator = GeneratorConfig {
            base_url,
            model,
            api_key,
            temperature: file.generator.temperature,
            max_retries: file.generator.max_retries,
            timeout: Duration::from_secs(file.generator.timeout_secs),
            ..GeneratorConfig::default()
        };

        Self { generator }
    }
}

/// First non-blank value of: CLI flag, env var, file value.
fn pick(cli: Option<String>, env_key: &str, file: Option<String>) -> Option<String> {
    let non_blank = |v: &String| !v.trim().is_empty();
    cli.filter(non_blank)
        .or_else(|| std::env::var(env_key).ok().filter(non_blank))
        .or_else(|| file.filter(non_blank))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
