use std::path::Path;

use rand::Rng;

use crate::data::sample::Sample;
use crate::error::Result;
use crate::eval::evaluator::{self, Accuracy};
use crate::network::dims::NetworkDims;
use crate::network::forward::forward;
use crate::network::params::ParameterStore;
use crate::optim::sgd::Sgd;
use crate::persist::codec;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn;

/// A 3-layer sigmoid classifier together with its optimizer.
#[derive(Debug, Clone)]
pub struct Network {
    pub params: ParameterStore,
    pub optimizer: Sgd,
}

impl Network {
    /// Builds a network with randomly initialized parameters.
    pub fn new<R: Rng + ?Sized>(dims: NetworkDims, learning_rate: f64, rng: &mut R) -> Result<Network> {
        dims.validate()?;
        Ok(Network {
            params: ParameterStore::random(dims, rng),
            optimizer: Sgd::new(learning_rate),
        })
    }

    /// Wraps an existing parameter store.
    pub fn from_params(params: ParameterStore, learning_rate: f64) -> Network {
        Network { params, optimizer: Sgd::new(learning_rate) }
    }

    pub fn dims(&self) -> NetworkDims {
        self.params.dims()
    }

    /// Output probabilities for one feature vector.
    pub fn forward(&self, features: &[f64]) -> Vec<f64> {
        forward(&self.params, features).y
    }

    /// One shuffled epoch of mini-batch SGD. Returns the epoch's mean loss.
    pub fn run_epoch<R: Rng + ?Sized>(&mut self, samples: &[Sample], batch_size: usize, rng: &mut R) -> Result<f64> {
        loop_fn::run_epoch(&mut self.params, samples, &self.optimizer, batch_size, rng)
    }

    /// Trains for `epochs` epochs, calling `on_epoch` after each one.
    pub fn train<R, F>(
        &mut self,
        samples: &[Sample],
        epochs: usize,
        batch_size: usize,
        rng: &mut R,
        on_epoch: F,
    ) -> Result<Vec<EpochStats>>
    where
        R: Rng + ?Sized,
        F: FnMut(&EpochStats),
    {
        loop_fn::train_loop(&mut self.params, samples, &self.optimizer, epochs, batch_size, rng, on_epoch)
    }

    pub fn evaluate(&self, samples: &[Sample]) -> Accuracy {
        evaluator::evaluate(&self.params, samples)
    }

    /// Writes the parameters to a weight file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        codec::save(&self.params, path)
    }

    /// Replaces the parameters with those in a weight file. On any error the
    /// current parameters are left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.params = codec::load(path, self.dims())?;
        Ok(())
    }
}
