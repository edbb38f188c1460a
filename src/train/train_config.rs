use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters for a training run.
///
/// # Fields
/// - `epochs`        — full passes over the training data; `0` is allowed and
///                     leaves the parameters untouched
/// - `batch_size`    — samples per mini-batch; the last batch of an epoch may
///                     be shorter
/// - `learning_rate` — η in `param -= (η / B) · grad_sum`
/// - `seed`          — seeds the one generator used for both initialization
///                     and shuffling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 30,
            batch_size: 10,
            learning_rate: 3.0,
            seed: 1,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from JSON. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_reference_run() {
        let c = TrainConfig::default();
        assert_eq!((c.epochs, c.batch_size, c.learning_rate, c.seed), (30, 10, 3.0, 1));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: TrainConfig = serde_json::from_str(r#"{"epochs": 2}"#).unwrap();
        assert_eq!(c.epochs, 2);
        assert_eq!(c.batch_size, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(TrainConfig::new(1, 0, 1.0).validate().is_err());
        assert!(TrainConfig::new(1, 1, 0.0).validate().is_err());
        assert!(TrainConfig::new(1, 1, f64::NAN).validate().is_err());
        assert!(TrainConfig::new(0, 1, 0.5).validate().is_ok());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.json");
        let config = TrainConfig { epochs: 4, batch_size: 3, learning_rate: 0.25, seed: 99 };
        config.save_json(&path).unwrap();
        assert_eq!(TrainConfig::load_json(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_zero_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"batch_size": 0}"#).unwrap();
        assert!(matches!(TrainConfig::load_json(&path), Err(Error::InvalidConfig(_))));
    }
}
