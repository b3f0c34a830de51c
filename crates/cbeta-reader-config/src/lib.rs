use cbeta_reader_engine::{IoError, MarkerStyle, RenderOptions, io};
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

    #[error("Configured corpus_path {corpus_path} is unusable: {source}")]
    InvalidCorpusPath {
        corpus_path: PathBuf,
        source: IoError,
    },
}

/// Reader settings, stored as TOML.
///
/// ```toml
/// corpus_path = "~/cbeta/XML"
/// marker_style = "superscript"
///
/// [render]
/// collect_notes = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the CBETA XML corpus.
    pub corpus_path: PathBuf,
    #[serde(default)]
    pub marker_style: MarkerStyle,
    #[serde(default)]
    pub render: RenderOptions,
}

impl Config {
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            marker_style: MarkerStyle::default(),
            render: RenderOptions::default(),
        }
    }

    /// The configured corpus root, once it is known to be a directory.
    pub fn corpus_dir(&self) -> Result<&Path, ConfigError> {
        io::validate_corpus_dir(&self.corpus_path).map_err(|source| {
            ConfigError::InvalidCorpusPath {
                corpus_path: self.corpus_path.clone(),
                source,
            }
        })?;
        Ok(&self.corpus_path)
    }

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

        match Self::expand_path(&config.corpus_path) {
            Ok(expanded) => config.corpus_path = expanded,
            Err(e) => log::warn!("Leaving corpus_path unexpanded: {e}"),
        }

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

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/cbeta-reader");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and `$VARS`; an unset variable is an error.
    fn expand_path(path: &Path) -> Result<PathBuf, shellexpand::LookupError<std::env::VarError>> {
        let expanded = shellexpand::full(&path.to_string_lossy())?.into_owned();
        Ok(PathBuf::from(expanded))
    }
}
