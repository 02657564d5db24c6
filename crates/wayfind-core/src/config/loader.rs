use super::schema::WayfindConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const LOCAL_CONFIG: &str = "wayfind.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Locations searched by [`ConfigLoader::load_default`], most specific first.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(LOCAL_CONFIG)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".wayfind").join("config.yaml"));
        }
        paths
    }

    /// Load the first existing candidate file, or the built-in defaults.
    pub async fn load_default() -> Result<WayfindConfig, ConfigError> {
        match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(WayfindConfig::default())
            }
        }
    }

    pub async fn load_from(path: &Path) -> Result<WayfindConfig, ConfigError> {
        debug!(path = %path.display(), "Loading config");
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content)
    }

    /// Parse and validate YAML content. Empty content yields the defaults.
    pub fn parse(content: &str) -> Result<WayfindConfig, ConfigError> {
        let config = if content.trim().is_empty() {
            WayfindConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &WayfindConfig) -> Result<(), ConfigError> {
    check_threshold("synthesis.fuzzy_threshold", config.synthesis.fuzzy_threshold)?;
    check_threshold(
        "resolution.default_fuzzy_threshold",
        config.resolution.default_fuzzy_threshold,
    )?;
    if config.synthesis.scroll_pixels_per_page <= 0 {
        return Err(ConfigError::Invalid {
            field: "synthesis.scroll_pixels_per_page",
            reason: format!("must be positive, got {}", config.synthesis.scroll_pixels_per_page),
        });
    }
    Ok(())
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within 0.0..=1.0, got {}", value),
        })
    }
}
