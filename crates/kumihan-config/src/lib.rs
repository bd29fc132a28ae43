use kumihan_engine::{KeywordDefinition, KeywordRegistry, ParserOptions, RegistryError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read keyword file at {path}: {source}")]
    KeywordFileReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse keyword file at {path}: {source}")]
    KeywordFileParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid keyword definition: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra TOML files holding `[[keywords]]` tables.
    pub keyword_files: Vec<PathBuf>,
    pub parser: ParserOptions,
    /// Custom keywords defined inline.
    pub keywords: Vec<KeywordDefinition>,
}

/// Layout of a file listed in `keyword_files`.
#[derive(Debug, Default, Deserialize)]
struct KeywordFile {
    #[serde(default)]
    keywords: Vec<KeywordDefinition>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in keyword file paths
        config.keyword_files = config
            .keyword_files
            .into_iter()
            .map(|p| Self::expand_path(&p).unwrap_or(p))
            .collect();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/kumihan");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Builds the keyword registry: built-ins, then inline keywords, then
    /// every keyword file in order. Any conflict is an error.
    pub fn registry(&self) -> Result<KeywordRegistry, ConfigError> {
        let mut registry = KeywordRegistry::with_defaults();
        for def in &self.keywords {
            registry.register(def.clone())?;
        }
        for path in &self.keyword_files {
            for def in Self::read_keyword_file(path)? {
                registry.register(def)?;
            }
        }
        Ok(registry)
    }

    fn read_keyword_file(path: &Path) -> Result<Vec<KeywordDefinition>, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::KeywordFileReadError {
                path: path.to_path_buf(),
                source,
            })?;
        let file: KeywordFile =
            toml::from_str(&content).map_err(|source| ConfigError::KeywordFileParseError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(file.keywords)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
