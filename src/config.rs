use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Library database used when `--database` is not given.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    #[serde(default)]
    pub exiftool: ExifToolConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub xattr: XattrConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExifToolConfig {
    /// Explicit exiftool executable. Searched on PATH when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Person name the library uses for detected but unnamed faces.
    #[serde(default = "default_unknown_person")]
    pub unknown_person: String,

    /// Treat album names as keywords even without `--albums-as-keywords`.
    #[serde(default)]
    pub albums_as_keywords: bool,
}

fn default_unknown_person() -> String {
    "_UNKNOWN_".to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            unknown_person: default_unknown_person(),
            albums_as_keywords: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XattrConfig {
    /// Extended attribute that holds the comma separated tag list.
    #[serde(default = "default_xattr_attribute")]
    pub attribute: String,
}

fn default_xattr_attribute() -> String {
    "user.xdg.tags".to_string()
}

impl Default for XattrConfig {
    fn default() -> Self {
        Self {
            attribute: default_xattr_attribute(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("photometa")
        .join("logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_path: None,
            exiftool: ExifToolConfig::default(),
            metadata: MetadataConfig::default(),
            xattr: XattrConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load from `PHOTOMETA_CONFIG` or the default location, writing a
    /// default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("photometa")
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PHOTOMETA_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
