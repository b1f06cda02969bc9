use crate::encoding::EncodingPrefs;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
}

/// Which encoding-preference table the adapter runs with. The external tool
/// emits CP866-family text behind Windows consoles and UTF-8 under a forced
/// POSIX locale, so the choice is made once at configuration time instead of
/// branching on `cfg!` throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Posix => "posix",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "posix" | "linux" => Ok(Self::Posix),
            _ => Err("platform must be one of: windows, posix".to_string()),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_encoding_windows() -> String {
    "cp866".to_string()
}

fn default_encoding_linux() -> String {
    "utf-8".to_string()
}

fn default_fallback_encodings() -> Vec<String> {
    ["utf-8", "windows-1251", "koi8-r", "cp866"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub tool_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_encoding_windows")]
    pub encoding_windows: String,
    #[serde(default = "default_encoding_linux")]
    pub encoding_linux: String,
    #[serde(default = "default_fallback_encodings")]
    pub fallback_encodings: Vec<String>,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool_path.trim().is_empty() {
            return Err(ConfigError::Settings(
                "tool_path must be non-empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        resolve_label(&self.encoding_windows)?;
        resolve_label(&self.encoding_linux)?;
        for label in &self.fallback_encodings {
            resolve_label(label)?;
        }
        Ok(())
    }

    pub fn primary_encoding_label(&self, platform: Platform) -> &str {
        match platform {
            Platform::Windows => &self.encoding_windows,
            Platform::Posix => &self.encoding_linux,
        }
    }

    /// Build the resolver preference table for one platform. The primary
    /// encoding is trusted outright only on POSIX, where the runner forces a
    /// UTF-8 locale on the child; a clean CP866 decode on Windows proves
    /// nothing, so there the primary must additionally show Cyrillic
    /// evidence before it wins.
    pub fn encoding_prefs(&self, platform: Platform) -> Result<EncodingPrefs, ConfigError> {
        let primary = resolve_label(self.primary_encoding_label(platform))?;
        let mut fallbacks = Vec::with_capacity(self.fallback_encodings.len());
        for label in &self.fallback_encodings {
            fallbacks.push(resolve_label(label)?);
        }
        Ok(EncodingPrefs {
            primary,
            fallbacks,
            trust_primary: platform == Platform::Posix,
        })
    }
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::from_path(path)?;
    settings.validate()?;
    Ok(settings)
}

fn resolve_label(label: &str) -> Result<&'static Encoding, ConfigError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::Settings(format!("unknown encoding label `{label}`")))
}
