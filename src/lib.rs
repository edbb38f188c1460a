pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod optim;
pub mod train;
pub mod eval;
pub mod persist;
pub mod data;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::{Network, NetworkDims, ParameterStore, Activations};
pub use data::sample::Sample;
pub use optim::sgd::Sgd;
pub use eval::evaluator::{argmax, evaluate, Accuracy};
pub use train::{train_loop, run_epoch, EpochStats, TrainConfig};
