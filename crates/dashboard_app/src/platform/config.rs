use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_core::{EmbedDelivery, EmbedTarget, EmbedTargetError};
use dashboard_engine::UploadSettings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "dashboard.ron";

const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/upload";
const DEFAULT_EMBED_BASE: &str = "https://public.tableau.com/views/SalesAnalysis/Dashboard1?:embed=y&:showVizHome=no&:toolbar=no&:tabs=no";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("embed_base is not usable: {0}")]
    EmbedTarget(#[from] EmbedTargetError),
}

/// Embed delivery as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryConfig {
    Iframe { height: u32 },
    WebComponent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Processing service upload URL.
    pub endpoint: String,
    /// Dashboard embed URL without the refresh discriminator.
    pub embed_base: String,
    pub delivery: DeliveryConfig,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            embed_base: DEFAULT_EMBED_BASE.to_string(),
            delivery: DeliveryConfig::Iframe { height: 827 },
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
        }
    }
}

impl DashboardConfig {
    pub fn embed_target(&self) -> Result<EmbedTarget, ConfigError> {
        Ok(EmbedTarget::parse(&self.embed_base)?)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn delivery(&self) -> EmbedDelivery {
        match self.delivery {
            DeliveryConfig::Iframe { height } => EmbedDelivery::Iframe { height },
            DeliveryConfig::WebComponent => EmbedDelivery::WebComponent,
        }
    }

    /// Configured level, or `Info` when the name is not recognised.
    pub fn level_filter(&self) -> LevelFilter {
        dashboard_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the path; built-in defaults are used.
    Defaults(PathBuf),
}

/// Loads the config at `path`. A missing file is not an error.
pub fn load_config(path: &Path) -> Result<(DashboardConfig, ConfigSource), ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok((
                DashboardConfig::default(),
                ConfigSource::Defaults(path.to_path_buf()),
            ));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);

        let (config, source) = load_config(&path).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(source, ConfigSource::Defaults(path));
        assert!(config.embed_target().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dashboard.ron");
        fs::write(
            &path,
            r#"(
                endpoint: "https://analysis.example.com/api/upload",
                delivery: WebComponent,
                log_level: "debug",
            )"#,
        )
        .unwrap();

        let (config, source) = load_config(&path).unwrap();
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.endpoint, "https://analysis.example.com/api/upload");
        assert_eq!(config.delivery(), EmbedDelivery::WebComponent);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.embed_base, DEFAULT_EMBED_BASE);
        assert_eq!(config.upload_settings().request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dashboard.ron");
        fs::write(&path, "(endpoint: 42").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn bad_embed_base_is_reported() {
        let config = DashboardConfig {
            embed_base: "ftp://viz.example.com/dash".to_string(),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.embed_target(),
            Err(ConfigError::EmbedTarget(EmbedTargetError::UnsupportedScheme(_)))
        ));
    }

    #[test]
    fn unknown_log_level_defaults_to_info() {
        let config = DashboardConfig {
            log_level: "chatty".to_string(),
            ..DashboardConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
