//! Deployment configuration loading
//!
//! `MountSettings` mirrors the registration surface as a serde struct so a
//! deployment can keep mount path, limits and feature toggles in a YAML
//! file next to its other service config.

use crate::core::error::{BridgeResult, ConfigError};
use crate::server::host::GraphQlHost;
use crate::server::uploads::UploadLimits;
use crate::server::{DEFAULT_BODY_LIMIT, DEFAULT_GRAPHQL_PATH, ServerRegistration};
use async_graphql::Executor;
use serde::{Deserialize, Serialize};

/// Mount configuration loadable from YAML
///
/// ```yaml
/// path: /api/graphql
/// health_check: true
/// body_limit: 1048576
/// uploads:
///   enabled: true
///   max_file_size: 8388608
///   max_num_files: 4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountSettings {
    /// Mount path for the query endpoint
    #[serde(default = "default_path")]
    pub path: String,

    /// Register the well-known health endpoint
    #[serde(default = "default_enabled")]
    pub health_check: bool,

    /// Cap on JSON POST bodies, in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// Multipart upload pipeline settings
    #[serde(default)]
    pub uploads: UploadSettings,
}

/// Upload pipeline section of [`MountSettings`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub max_file_size: Option<usize>,

    #[serde(default)]
    pub max_num_files: Option<usize>,
}

fn default_path() -> String {
    DEFAULT_GRAPHQL_PATH.to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            path: default_path(),
            health_check: true,
            body_limit: default_body_limit(),
            uploads: UploadSettings::default(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_file_size: None,
            max_num_files: None,
        }
    }
}

impl MountSettings {
    /// Load settings from a YAML file
    pub fn from_yaml_file(path: &str) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: err.to_string(),
            },
        })?;

        let settings: Self =
            serde_yaml::from_str(&content).map_err(|err| ConfigError::ParseError {
                file: Some(path.to_string()),
                message: err.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> BridgeResult<Self> {
        let settings: Self =
            serde_yaml::from_str(yaml).map_err(|err| ConfigError::ParseError {
                file: None,
                message: err.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values a typo would most likely break
    pub fn validate(&self) -> BridgeResult<()> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "path".to_string(),
                value: self.path.clone(),
                message: "mount path must start with '/'".to_string(),
            }
            .into());
        }
        if self.body_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "body_limit".to_string(),
                value: self.body_limit.to_string(),
                message: "body limit must be non-zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Turn the settings into a registration for the given host
    pub fn into_registration<E: Executor>(self, server: GraphQlHost<E>) -> ServerRegistration<E> {
        let mut registration = ServerRegistration::new()
            .with_server(server)
            .path(self.path)
            .body_limit(self.body_limit);

        if !self.health_check {
            registration = registration.disable_health_check();
        }

        if self.uploads.enabled {
            registration = registration.uploads(UploadLimits {
                max_file_size: self.uploads.max_file_size,
                max_num_files: self.uploads.max_num_files,
            });
        } else {
            registration = registration.disable_uploads();
        }

        registration
    }
}
