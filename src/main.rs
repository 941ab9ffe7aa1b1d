//! squarefit: trains the x² network once and prints the panel transcript.
//!
//! Run with:
//!   cargo run --release -- --seed 7
//! or see `--help` for every option. The browser version is `--bin panel`.

use std::env;
use std::io;
use std::process;

use anyhow::{bail, Context};
use getopts::Options;
use log::info;

use squarefit::{run, RunConfig, WriterSink};

fn usage(program: &str, opts: &Options) -> String {
    let brief = format!("Usage: {} [options]", program);
    opts.usage(&brief)
}

fn parse_queries(list: &str) -> anyhow::Result<Vec<f64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().with_context(|| format!("invalid query value '{}'", s)))
        .collect()
}

fn build_config(matches: &getopts::Matches) -> anyhow::Result<RunConfig> {
    let mut config = match matches.opt_str("c") {
        Some(path) => RunConfig::load_json(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => RunConfig::default(),
    };

    if let Some(v) = matches.opt_str("e") {
        config.training.epochs = v.parse().with_context(|| format!("invalid epoch count '{}'", v))?;
    }
    if let Some(v) = matches.opt_str("b") {
        config.training.batch_size = v.parse().with_context(|| format!("invalid batch size '{}'", v))?;
    }
    if let Some(v) = matches.opt_str("l") {
        config.training.learning_rate = v.parse().with_context(|| format!("invalid learning rate '{}'", v))?;
    }
    if let Some(v) = matches.opt_str("s") {
        config.training.seed = Some(v.parse().with_context(|| format!("invalid seed '{}'", v))?);
    }
    if let Some(v) = matches.opt_str("q") {
        config.queries = parse_queries(&v)?;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("c", "config", "read the run configuration from a JSON file", "FILE");
    opts.optopt("e", "epochs", "number of training epochs (default 200)", "N");
    opts.optopt("b", "batch-size", "samples per SGD step (default 2)", "N");
    opts.optopt("l", "learning-rate", "base learning rate (default 0.001)", "RATE");
    opts.optopt("s", "seed", "seed for shuffling and initialization", "N");
    opts.optopt("q", "queries", "comma separated inputs to predict after training", "LIST");
    opts.optflag("", "print-config", "print the effective configuration as JSON and exit");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => bail!("{}\n\n{}", e, usage(&program, &opts)),
    };

    if matches.opt_present("h") {
        print!("{}", usage(&program, &opts));
        process::exit(0);
    }

    let config = build_config(&matches)?;

    if matches.opt_present("print-config") {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    info!(
        "starting run: {} epochs, batch size {}, rate {}",
        config.training.epochs, config.training.batch_size, config.training.learning_rate
    );

    let mut panel = WriterSink::new(io::stdout());
    let outcome = run(&config, &mut panel).context("run failed")?;
    println!();

    info!(
        "done: final loss {:.4}, {} predictions",
        outcome.report.final_loss,
        outcome.predictions.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_parse_with_spaces() {
        assert_eq!(parse_queries("1, 5,7 ,").unwrap(), vec![1.0, 5.0, 7.0]);
        assert!(parse_queries("1,x").is_err());
    }
}
