use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with mini-batch SGD on the MSE objective for exactly
/// `config.epochs` epochs.
///
/// # Arguments
/// - `network`  — modified in place
/// - `inputs`   — one sample per row, `network.input_size()` columns
/// - `targets`  — one target row per sample, `network.output_size()` columns
/// - `config`   — hyperparameters and learning-rate schedule
/// - `rng`      — drives the per-epoch sample shuffle
/// - `on_epoch` — called once at the end of every epoch
///
/// The optimizer's rate is taken from `config.rate_at(epoch)` before each
/// epoch starts.
pub fn train_loop<R, F>(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    config: &TrainConfig,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<TrainReport>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    config.validate()?;
    if inputs.rows() == 0 {
        return Err(Error::EmptyDataset);
    }
    if inputs.rows() != targets.rows() {
        return Err(Error::LengthMismatch { inputs: inputs.rows(), outputs: targets.rows() });
    }
    if targets.cols() != network.output_size() {
        return Err(Error::InputShape { expected: network.output_size(), actual: targets.cols() });
    }

    info!(
        "training {} samples for {} epochs (batch size {}, base rate {})",
        inputs.rows(),
        config.epochs,
        config.batch_size,
        config.learning_rate
    );

    let run_start = Instant::now();
    let mut optimizer = Sgd::new(config.learning_rate);
    let mut history = Vec::with_capacity(config.epochs);
    let mut indices: Vec<usize> = (0..inputs.rows()).collect();

    for epoch in 0..config.epochs {
        let t_start = Instant::now();
        optimizer.set_learning_rate(config.rate_at(epoch));

        if config.shuffle {
            indices.shuffle(rng);
        }

        let loss = run_one_epoch(network, inputs, targets, &indices, &optimizer, config.batch_size)?;

        let stats = EpochStats {
            epoch: epoch + 1,
            total_epochs: config.epochs,
            loss,
            rmse: loss.sqrt(),
            learning_rate: optimizer.learning_rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("epoch {}/{}: loss {:.4} (lr {})", stats.epoch, stats.total_epochs, loss, stats.learning_rate);
        on_epoch(&stats);
        history.push(stats);
    }

    network.clear_caches();

    let final_loss = history.last().map(|s| s.loss).unwrap_or(0.0);
    let elapsed_ms = run_start.elapsed().as_millis() as u64;
    info!("training finished: loss {:.4} after {} ms", final_loss, elapsed_ms);

    Ok(TrainReport { history, final_loss, elapsed_ms })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over the data in the order given by `indices`.
/// Returns the mean loss over all samples.
fn run_one_epoch(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    indices: &[usize],
    optimizer: &Sgd,
    batch_size: usize,
) -> Result<f64> {
    let mut total_loss = 0.0;

    for batch in indices.chunks(batch_size) {
        let x = inputs.select_rows(batch);
        let y = targets.select_rows(batch);

        let predicted = network.forward(&x)?;
        total_loss += MseLoss::loss(&predicted, &y) * batch.len() as f64;

        let grads = network.backward(MseLoss::gradient(&predicted, &y));
        for (layer, g) in network.layers.iter_mut().zip(&grads) {
            optimizer.step(layer, g);
        }
    }

    Ok(total_loss / indices.len() as f64)
}
