use log::LevelFilter;
use squarefit::{run, Dataset, MinMax, RunConfig, WriterSink};
use squarefit::data::shuffle_combo;
use squarefit::session::rng_for;

fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn seeded(epochs: usize, seed: u64) -> RunConfig {
    let mut config = RunConfig::default();
    config.training.epochs = epochs;
    config.training.seed = Some(seed);
    config
}

#[test]
fn shuffled_pairs_still_square() {
    let mut rng = rng_for(Some(123));
    let mut inputs: Vec<f64> = (0..10).map(|x| x as f64).collect();
    let mut outputs: Vec<f64> = inputs.iter().map(|x| x * x).collect();
    shuffle_combo(inputs.as_mut_slice(), outputs.as_mut_slice(), &mut rng).unwrap();
    let ds = Dataset::new(inputs, outputs).unwrap();
    assert!(ds.pairs().all(|(x, y)| y == x * x));
}

#[test]
fn full_default_run_reports_every_epoch_and_query() {
    init_logging();
    let config = seeded(200, 2024);
    let mut panel = WriterSink::new(Vec::new());
    let outcome = run(&config, &mut panel).unwrap();
    let text = String::from_utf8(panel.into_inner()).unwrap();

    assert_eq!(outcome.bounds, MinMax { min: 0.0, max: 9.0 });
    assert_eq!(outcome.report.history.len(), 200);
    assert_eq!(text.matches("\n E").count(), 200);
    assert!(text.starts_with("⎯⎯⎯⎯⎯⎯⎯ PREPARE ⎯⎯⎯⎯⎯⎯⎯\n"));

    let rates: Vec<f64> = [0, 49, 50, 99, 100, 149, 150, 199]
        .iter()
        .map(|&i| outcome.report.history[i].learning_rate)
        .collect();
    let base = config.training.learning_rate;
    let expected = [base, base, base / 2.0, base / 2.0, base / 4.0, base / 4.0, base / 8.0, base / 8.0];
    for (got, want) in rates.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-15);
    }

    let queries: Vec<f64> = outcome.predictions.iter().map(|p| p.input).collect();
    assert_eq!(queries, config.queries);

    let first = outcome.report.history[0].loss;
    assert!(outcome.report.final_loss < first);
}

#[test]
fn same_seed_same_result() {
    let config = seeded(20, 77);
    let a = run(&config, &mut String::new()).unwrap();
    let b = run(&config, &mut String::new()).unwrap();
    let va: Vec<f64> = a.predictions.iter().map(|p| p.value).collect();
    let vb: Vec<f64> = b.predictions.iter().map(|p| p.value).collect();
    assert_eq!(va, vb);
    assert_eq!(a.report.final_loss, b.report.final_loss);
}

#[test]
fn custom_queries_and_no_shuffle() {
    let mut config = seeded(10, 5);
    config.training.shuffle = false;
    config.queries = vec![3.0, 0.5];
    let mut panel = String::new();
    let outcome = run(&config, &mut panel).unwrap();
    assert_eq!(outcome.predictions.len(), 2);
    assert!(panel.contains("Result: [3] = "));
    assert!(panel.contains("Result: [0.5] = "));
}
