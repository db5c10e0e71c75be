//! Top-level analysis configuration and YAML I/O

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::stage_configs::{BuilderConfig, ClosureConfig};

/// Supported YAML schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Complete configuration for one activity analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivityConfig {
    pub builder: BuilderConfig,
    pub closure: ClosureConfig,
}

impl ActivityConfig {
    /// Complete configuration for a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            builder: BuilderConfig::from_preset(preset),
            closure: ClosureConfig::from_preset(preset),
        }
    }

    /// Override builder settings
    pub fn builder(mut self, f: impl FnOnce(BuilderConfig) -> BuilderConfig) -> Self {
        self.builder = f(self.builder);
        self
    }

    /// Override closure settings
    pub fn closure(mut self, f: impl FnOnce(ClosureConfig) -> ClosureConfig) -> Self {
        self.closure = f(self.closure);
        self
    }

    /// Validate every phase
    pub fn validate(&self) -> ConfigResult<()> {
        self.builder.validate()?;
        self.closure.validate()?;
        Ok(())
    }

    /// Parse a versioned YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(yaml)?;
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match export.preset.as_deref() {
            Some(name) => Preset::parse(name)?,
            None => Preset::default(),
        };
        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            if let Some(builder) = overrides.builder {
                config.builder = builder;
            }
            if let Some(closure) = overrides.closure {
                config.closure = closure;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a versioned YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Export as a versioned YAML document (preset + explicit overrides)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: None,
            overrides: Some(ConfigOverrides {
                builder: Some(self.builder.clone()),
                closure: Some(self.closure.clone()),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closure: Option<ClosureConfig>,
}
