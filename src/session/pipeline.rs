use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::RunConfig;
use crate::data::dataset::Dataset;
use crate::data::normalize::{normalize, MinMax, Normalized};
use crate::error::Result;
use crate::eval::{predict, Prediction};
use crate::math::matrix::Matrix;
use crate::math::memory::{memory, MemoryUsage};
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::session::panel::PanelSink;
use crate::train::epoch_stats::TrainReport;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

const RULE: &str = "⎯⎯⎯⎯⎯⎯⎯";

fn section(name: &str) -> String {
    format!("{} {} {}\n", RULE, name, RULE)
}

fn elapsed_line(start: Instant) -> String {
    format!("\n\n ⏳ {}MS", start.elapsed().as_millis())
}

/// Output of the prepare stage: a fresh model plus training tensors.
pub struct Prepared {
    pub network: Network,
    pub inputs: Matrix,
    pub targets: Matrix,
    pub bounds: MinMax,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub bounds: MinMax,
    pub report: TrainReport,
    pub predictions: Vec<Prediction>,
    /// Live buffers after every stage released its own.
    pub memory: MemoryUsage,
}

/// Shuffles the pairs, normalizes the inputs and builds the model.
pub fn prepare<R, P>(mut dataset: Dataset, spec: &NetworkSpec, rng: &mut R, panel: &mut P) -> Result<Prepared>
where
    R: Rng + ?Sized,
    P: PanelSink + ?Sized,
{
    let start = Instant::now();

    dataset.shuffle(rng);
    let raw_inputs = dataset.input_matrix();
    let targets = dataset.output_matrix();

    let Normalized { tensor, bounds } = normalize(&raw_inputs, None)?;
    panel.append(&format!("\n Normalized Inputs {}", tensor));
    panel.append(&format!("\n\n Normalized Min {:.2}", bounds.min));
    panel.append(&format!("\n\n Normalized Max {:.2}", bounds.max));
    drop(raw_inputs);

    let network = spec.build(rng)?;
    for line in network.summary().to_string().lines() {
        info!("{}", line);
    }

    panel.append(&elapsed_line(start));
    Ok(Prepared { network, inputs: tensor, targets, bounds })
}

/// Fits the model; the training tensors are consumed and released here.
pub fn train<R, P>(
    network: &mut Network,
    inputs: Matrix,
    targets: Matrix,
    config: &TrainConfig,
    rng: &mut R,
    panel: &mut P,
) -> Result<TrainReport>
where
    R: Rng + ?Sized,
    P: PanelSink + ?Sized,
{
    let start = Instant::now();
    let report = train_loop(network, &inputs, &targets, config, rng, |stats| {
        panel.append(&format!("\n E{} V {:.2}", stats.epoch, stats.rmse));
    })?;
    drop(inputs);
    drop(targets);

    panel.append(&elapsed_line(start));
    Ok(report)
}

/// Predicts every query with the training bounds; the model is released
/// afterwards.
pub fn evaluate<P>(network: Network, bounds: MinMax, queries: &[f64], panel: &mut P) -> Result<Vec<Prediction>>
where
    P: PanelSink + ?Sized,
{
    let start = Instant::now();
    let predictions = predict(&network, bounds, queries)?;
    for p in &predictions {
        panel.append(&format!("\n Result: [{}] = {:.2}", p.input, p.value));
    }
    drop(network);

    panel.append(&elapsed_line(start));
    Ok(predictions)
}

pub fn report_memory<P: PanelSink + ?Sized>(panel: &mut P) -> MemoryUsage {
    let usage = memory();
    panel.append(&format!("\n 💾 {:.2}MB ({})", usage.megabytes(), usage.num_tensors));
    usage
}

pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs prepare, train, evaluate and the memory report, appending the
/// transcript to `panel`. Stops at the first error.
pub fn run<P: PanelSink + ?Sized>(config: &RunConfig, panel: &mut P) -> Result<RunOutcome> {
    config.validate()?;
    let mut rng = rng_for(config.training.seed);

    info!("prepare: {} samples", config.dataset_size);
    panel.append(&section("PREPARE"));
    let Prepared { mut network, inputs, targets, bounds } =
        prepare(Dataset::squares(config.dataset_size), &config.network, &mut rng, panel)?;

    info!("train");
    panel.append(&format!("\n\n {}", section("TRAIN")));
    let report = train(&mut network, inputs, targets, &config.training, &mut rng, panel)?;

    info!("evaluate: {} queries", config.queries.len());
    panel.append(&format!("\n\n {}", section("EVALUATE")));
    let predictions = evaluate(network, bounds, &config.queries, panel)?;

    panel.append(&format!("\n\n {}", section("MEMORY")));
    let memory = report_memory(panel);

    Ok(RunOutcome { bounds, report, predictions, memory })
}
