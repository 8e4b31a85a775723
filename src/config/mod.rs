//! Configuration types for the VSM pipeline.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for locating indexed data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// File extension to match exactly (case-sensitive), e.g. ".txt"
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Marker string immediately preceding the file index digits
    #[serde(default = "default_index_marker")]
    pub marker: String,
}

fn default_extension() -> String {
    ".txt".to_string()
}

fn default_index_marker() -> String {
    "#".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            marker: default_index_marker(),
        }
    }
}

/// Configuration for parsing VSM data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Marker line separating the header row from the data rows
    #[serde(default = "default_header_marker")]
    pub header_marker: String,

    /// Convert recognized CGS columns to SI units on load
    #[serde(default = "default_si_units")]
    pub si_units: bool,

    /// Unit conversion factors
    #[serde(default)]
    pub units: UnitConfig,
}

fn default_header_marker() -> String {
    "***DATA***".to_string()
}

fn default_si_units() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            header_marker: default_header_marker(),
            si_units: default_si_units(),
            units: UnitConfig::default(),
        }
    }
}

/// Unit conversion factors applied by `units_to_si`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Divisor applied to `Field(G)` values (gauss to militesla)
    #[serde(default = "default_field_divisor")]
    pub field_divisor: f64,

    /// Factor applied to `Moment(emu)` values (emu to A*m^2)
    #[serde(default = "default_moment_factor")]
    pub moment_factor: f64,

    /// Offset added to `Temperature(K)` values. The historical pipeline
    /// adds 273.15 despite the Kelvin naming; set to -273.15 for a
    /// Kelvin-to-Celsius conversion.
    #[serde(default = "default_temperature_offset")]
    pub temperature_offset: f64,
}

fn default_field_divisor() -> f64 {
    10.0
}

fn default_moment_factor() -> f64 {
    1000.0
}

fn default_temperature_offset() -> f64 {
    273.15
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            field_divisor: default_field_divisor(),
            moment_factor: default_moment_factor(),
            temperature_offset: default_temperature_offset(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub indexing: IndexConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: PipelineConfig =
            serde_yaml::from_str(&content).context("parsing YAML config")?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).context("serializing config")?;
        std::fs::write(path, content).context("writing config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_index_config() {
        let config = IndexConfig::default();
        assert_eq!(config.extension, ".txt");
        assert_eq!(config.marker, "#");
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.loader.header_marker, "***DATA***");
        assert!(config.loader.si_units);
        assert_eq!(config.loader.units.field_divisor, 10.0);
        assert_eq!(config.loader.units.moment_factor, 1000.0);
        assert_eq!(config.loader.units.temperature_offset, 273.15);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = PipelineConfig::default();
        config.indexing.marker = "scan".to_string();
        config.loader.units.temperature_offset = -273.15;
        config.to_yaml(&path).unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.indexing.marker, "scan");
        assert_eq!(loaded.loader.units.temperature_offset, -273.15);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "indexing:\n  marker: \"run_\"\n").unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.indexing.marker, "run_");
        assert_eq!(loaded.indexing.extension, ".txt");
        assert_eq!(loaded.loader.header_marker, "***DATA***");
    }
}
