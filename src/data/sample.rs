use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::dims::NetworkDims;

/// One labeled feature vector. `label` is a class index in `0..C`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    label: usize,
    features: Vec<f64>,
}

impl Sample {
    /// Builds a sample without checking it against any network shape.
    /// Training and [`Sample::check`] reject it later if it does not fit.
    pub fn new(label: usize, features: Vec<f64>) -> Sample {
        Sample { label, features }
    }

    /// Builds a sample, rejecting a label outside `0..dims.outputs` or a
    /// feature vector that is not `dims.inputs` long.
    pub fn try_new(label: usize, features: Vec<f64>, dims: NetworkDims) -> Result<Sample> {
        let sample = Sample { label, features };
        sample.check(dims)?;
        Ok(sample)
    }

    pub fn label(&self) -> usize {
        self.label
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Checks that this sample fits a network of shape `dims`.
    pub fn check(&self, dims: NetworkDims) -> Result<()> {
        if self.label >= dims.outputs {
            return Err(Error::InvalidSample(format!(
                "label {} >= class count {}",
                self.label, dims.outputs
            )));
        }
        if self.features.len() != dims.inputs {
            return Err(Error::InvalidSample(format!(
                "{} features, network expects {}",
                self.features.len(),
                dims.inputs
            )));
        }
        Ok(())
    }

    /// One-hot target of length `n_classes`.
    ///
    /// # Panics
    /// Panics if the label is not below `n_classes`.
    pub fn one_hot(&self, n_classes: usize) -> Vec<f64> {
        assert!(
            self.label < n_classes,
            "label {} out of range for {} classes",
            self.label,
            n_classes
        );
        let mut target = vec![0.0; n_classes];
        target[self.label] = 1.0;
        target
    }
}
