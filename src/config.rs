use crate::control_system::timing_policy::TimingPolicy;
use crate::errors::{ConfigError, ConfigResult};
use crate::simulation_engine::sensors::TrafficProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs for the random detector and the length of simulated runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub seed: u64,
    pub pedestrian_probability: f64,
    pub emergency_probability: f64,
    /// Cycles to run; `None` runs until stopped.
    pub cycles: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 1,
            pedestrian_probability: 0.15,
            emergency_probability: 0.02,
            cycles: None,
        }
    }
}

impl SimulationSettings {
    pub fn traffic_profile(&self) -> TrafficProfile {
        TrafficProfile {
            pedestrian_probability: self.pedestrian_probability,
            emergency_probability: self.emergency_probability,
        }
    }
}

/// Where diagnostic output goes. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    pub amqp_url: Option<String>,
    pub events_csv: Option<PathBuf>,
    pub timeline_png: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub timing: TimingPolicy,
    pub simulation: SimulationSettings,
    pub monitoring: MonitoringSettings,
}

impl ControllerConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reads the file when a path is given, otherwise returns defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.timing.validate()?;
        for (name, p) in [
            ("pedestrian_probability", self.simulation.pedestrian_probability),
            ("emergency_probability", self.simulation.emergency_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = ControllerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_nested_overrides() {
        let config = ControllerConfig::from_json_str(
            r#"{
                "timing": { "max_green_ms": 12000 },
                "simulation": { "seed": 99, "cycles": 3 },
                "monitoring": { "events_csv": "out.csv" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.timing.max_green_ms, 12000);
        assert_eq!(config.simulation.seed, 99);
        assert_eq!(config.simulation.cycles, Some(3));
        assert_eq!(config.monitoring.events_csv, Some(PathBuf::from("out.csv")));
        assert!(config.monitoring.amqp_url.is_none());
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let err = ControllerConfig::from_json_str(r#"{ "simulation": { "emergency_probability": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ControllerConfig::from_json_str("{ timing: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ControllerConfig::from_json_file("/nonexistent/signal.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(ControllerConfig::load(None).unwrap(), ControllerConfig::default());
    }
}
