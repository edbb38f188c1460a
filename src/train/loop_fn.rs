use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::data::sample::Sample;
use crate::error::{Error, Result};
use crate::eval::evaluator::evaluate;
use crate::network::params::ParameterStore;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::gradients::accumulate_batch;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `params` for `epochs` epochs of mini-batch SGD and returns one
/// `EpochStats` per completed epoch.
///
/// # Arguments
/// - `params`     — parameters, updated in place
/// - `samples`    — training set; accuracy is also reported on it
/// - `optimizer`  — SGD optimizer (carries the learning rate)
/// - `epochs`     — number of passes; `0` returns immediately
/// - `batch_size` — samples per update; the final batch may be shorter
/// - `rng`        — shuffling source, reused across epochs
/// - `on_epoch`   — called with each epoch's stats as soon as it finishes
///
/// The sample order is kept between epochs: every epoch re-shuffles the
/// previous epoch's order, so a fixed seed reproduces the whole run.
pub fn train_loop<R, F>(
    params: &mut ParameterStore,
    samples: &[Sample],
    optimizer: &Sgd,
    epochs: usize,
    batch_size: usize,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<Vec<EpochStats>>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    check_inputs(params, samples, batch_size)?;

    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut history = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        let t_start = Instant::now();

        reshuffle(&mut order, rng);
        let train_loss = run_ordered_epoch(params, samples, &order, optimizer, batch_size);
        let train_accuracy = evaluate(params, samples);

        let stats = EpochStats {
            epoch,
            total_epochs: epochs,
            train_loss,
            train_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            epoch,
            total = epochs,
            accuracy = %stats.train_accuracy,
            loss = stats.train_loss,
            elapsed_ms = stats.elapsed_ms,
            "epoch complete"
        );
        on_epoch(&stats);
        history.push(stats);
    }

    Ok(history)
}

/// Runs one epoch from a fresh shuffle of `samples` and returns the mean
/// quadratic loss seen during it.
pub fn run_epoch<R: Rng + ?Sized>(
    params: &mut ParameterStore,
    samples: &[Sample],
    optimizer: &Sgd,
    batch_size: usize,
    rng: &mut R,
) -> Result<f64> {
    check_inputs(params, samples, batch_size)?;

    let mut order: Vec<usize> = (0..samples.len()).collect();
    reshuffle(&mut order, rng);
    Ok(run_ordered_epoch(params, samples, &order, optimizer, batch_size))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Rejects a zero batch size or any sample that does not fit `params`,
/// before a single update is made.
fn check_inputs(params: &ParameterStore, samples: &[Sample], batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
    }
    let dims = params.dims();
    for (idx, sample) in samples.iter().enumerate() {
        sample.check(dims).map_err(|e| match e {
            Error::InvalidSample(reason) => Error::InvalidSample(format!("sample {idx}: {reason}")),
            other => other,
        })?;
    }
    Ok(())
}

/// Permutes `order` in place. Called once per epoch on the same buffer.
fn reshuffle<R: Rng + ?Sized>(order: &mut [usize], rng: &mut R) {
    order.shuffle(rng);
}

/// One pass over `samples` in the given `order`, updating once per batch.
fn run_ordered_epoch(
    params: &mut ParameterStore,
    samples: &[Sample],
    order: &[usize],
    optimizer: &Sgd,
    batch_size: usize,
) -> f64 {
    assert!(batch_size > 0, "batch_size must be at least 1");
    if order.is_empty() {
        return 0.0;
    }

    let mut total_loss = 0.0;

    for batch in order.chunks(batch_size) {
        // Gradients are taken against the pre-update parameters for the
        // whole batch; the update happens once, afterwards.
        let grads = accumulate_batch(params, batch.iter().map(|&idx| &samples[idx]));
        total_loss += grads.loss;
        optimizer.step(params, &grads, batch.len());
    }

    total_loss / order.len() as f64
}
