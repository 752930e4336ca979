use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::predict::{GroundStation, Satellite};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub ground_stations: Vec<Arc<GroundStation>>,
    #[serde(default)]
    pub satellites: Vec<Arc<Satellite>>,
    #[serde(default)]
    pub elements: ElementsConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_prediction_days")]
    pub prediction_days: i64,
    #[serde(default = "default_sample_step_seconds")]
    pub sample_step_seconds: i64,
    #[serde(default = "default_refine_tolerance_seconds")]
    pub refine_tolerance_seconds: i64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            prediction_days: default_prediction_days(),
            sample_step_seconds: default_sample_step_seconds(),
            refine_tolerance_seconds: default_refine_tolerance_seconds(),
        }
    }
}

fn default_prediction_days() -> i64 {
    3
}

fn default_sample_step_seconds() -> i64 {
    30
}

fn default_refine_tolerance_seconds() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementsConfig {
    #[serde(default = "default_element_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            urls: default_element_urls(),
            cache_path: default_cache_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_element_urls() -> Vec<String> {
    vec![
        "https://celestrak.org/NORAD/elements/gp.php?GROUP=weather&FORMAT=tle".to_string(),
        "https://celestrak.org/NORAD/elements/gp.php?GROUP=noaa&FORMAT=tle".to_string(),
    ]
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("/data/elements.json")
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_recordings_claim")]
    pub recordings_claim: String,
    /// Cluster API endpoint. Absent means dry-run.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            image: default_image(),
            recordings_claim: default_recordings_claim(),
            api_url: None,
        }
    }
}

fn default_namespace() -> String {
    "recordings".to_string()
}

fn default_image() -> String {
    "recorder:latest".to_string()
}

fn default_recordings_claim() -> String {
    "recordings-pvc".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.prediction.prediction_days < 1 {
            return Err(ConfigError::Invalid(
                "prediction_days must be at least 1".to_string(),
            ));
        }
        if self.prediction.sample_step_seconds < 1 {
            return Err(ConfigError::Invalid(
                "sample_step_seconds must be at least 1".to_string(),
            ));
        }
        if self.prediction.refine_tolerance_seconds < 1 {
            return Err(ConfigError::Invalid(
                "refine_tolerance_seconds must be at least 1".to_string(),
            ));
        }
        if self.elements.urls.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one elements URL is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
prediction:
  prediction_days: 2
ground_stations:
  - name: alpha
    latitude: 45.0
    longitude: 2.0
    altitude: 100
    satellites: [33591]
satellites:
  - name: NOAA 19
    id: 33591
    frequency: 137.1
  - name: NOAA 15
    id: 25338
";

    #[test]
    fn parses_an_example_document() {
        let config: Config = serde_yaml::from_str(EXAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.prediction.prediction_days, 2);
        assert_eq!(config.ground_stations.len(), 1);
        assert_eq!(config.satellites.len(), 2);
        assert!(config.ground_stations[0].tracks(33591));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_yaml::from_str(EXAMPLE).unwrap();

        assert_eq!(config.prediction.sample_step_seconds, 30);
        assert_eq!(config.prediction.refine_tolerance_seconds, 1);
        assert_eq!(config.ground_stations[0].minimum_elevation, 10.0);
        assert_eq!(config.satellites[1].frequency, 137.5);
        assert_eq!(config.jobs.namespace, "recordings");
        assert!(config.jobs.api_url.is_none());
        assert_eq!(config.elements.urls.len(), 2);
    }

    #[test]
    fn rejects_a_degenerate_horizon() {
        let yaml = "prediction:\n  prediction_days: 0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result: Result<Config, _> = serde_yaml::from_str(": not yaml [");
        assert!(result.is_err());
    }
}
