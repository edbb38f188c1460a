use serde::{Serialize, Deserialize};

use crate::eval::evaluator::Accuracy;

/// Per-epoch training statistics emitted by `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean quadratic loss over all samples, measured during the epoch's
    /// forward passes (before each batch's update).
    pub train_loss: f64,
    /// Accuracy on the training set after the epoch's last update.
    pub train_accuracy: Accuracy,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
