//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notely_core::config::{API_TIMEOUT_ENV, API_URL_ENV};
use notely_core::ApiConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";
const CONFIG_PATH_ENV: &str = "NOTELY_CONFIG_PATH";
const PROFILE_ENV: &str = "NOTELY_PROFILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("notely").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    notely_core::util::normalize_text_option(value)
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        if let Some(profile) = normalize_profile_name(explicit) {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(std::env::var(PROFILE_ENV).ok().as_deref()) {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(self.active_profile.as_deref()) {
            return profile;
        }
        "default".to_string()
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn api_base_url(&self) -> Option<String> {
        normalize_text_option(self.api_base_url.clone())
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.clone());
        self.timeout_secs = self.timeout_secs.filter(|secs| *secs > 0);
    }
}

/// Where the base URL ended up coming from, for `config show`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UrlSource {
    Flag,
    Environment,
    Profile,
    Default,
}

impl UrlSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flag => "--api-url",
            Self::Environment => API_URL_ENV,
            Self::Profile => "profile",
            Self::Default => "default",
        }
    }
}

/// Merge connection settings: flag, then environment, then profile, then defaults.
pub fn merge_api_config(
    flag_url: Option<String>,
    env_url: Option<String>,
    env_timeout: Option<String>,
    profile: Option<&CliProfile>,
) -> Result<(ApiConfig, UrlSource), notely_core::Error> {
    let profile_url = profile.and_then(CliProfile::api_base_url);
    let (url, source) = if let Some(url) = normalize_text_option(flag_url) {
        (Some(url), UrlSource::Flag)
    } else if let Some(url) = normalize_text_option(env_url) {
        (Some(url), UrlSource::Environment)
    } else if let Some(url) = profile_url {
        (Some(url), UrlSource::Profile)
    } else {
        (None, UrlSource::Default)
    };

    let timeout = normalize_text_option(env_timeout).or_else(|| {
        profile
            .and_then(|profile| profile.timeout_secs)
            .map(|secs| secs.to_string())
    });

    Ok((ApiConfig::resolve(url, timeout)?, source))
}

/// Resolve connection settings for this invocation from flag, env and profile file.
pub fn resolve_api_config(
    flag_url: Option<String>,
    profile_name: Option<&str>,
) -> Result<(ApiConfig, UrlSource), String> {
    let config = CliProfilesConfig::load()?;
    let name = config.resolve_profile_name(profile_name);
    tracing::debug!(profile = %name, "Resolving API configuration");
    merge_api_config(
        flag_url,
        std::env::var(API_URL_ENV).ok(),
        std::env::var(API_TIMEOUT_ENV).ok(),
        config.profile(&name),
    )
    .map_err(|error| error.to_string())
}
