use anyhow::Context;
use log::{debug, info};
use machine_learning::{Evaluation, Hyperparams, LogReg};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::{Experiment, ExperimentConfig},
    loader::{self, Split},
    report::{SweepReporter, TrialsReporter},
};

/// The test accuracies measured for every amount of training samples.
///
/// `accuracies[i]` holds one accuracy per trial, all of them trained on `points[i]` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccuracyRecord {
    pub points: Vec<usize>,
    pub accuracies: Vec<Vec<f32>>,
}

/// Runs the experiment described by `config`.
pub fn run(config: &ExperimentConfig) -> anyhow::Result<AccuracyRecord> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let hyper = config.hyperparams();
    info!("training with {hyper:?}");

    match &config.experiment {
        Experiment::Sweep { points, .. } => {
            let split = loader::load(&config.data, None)?;
            let mut reporter = SweepReporter::new(config.sweep_output());
            run_sweep(&split, &points.points(), hyper, &mut rng, &mut reporter)
        }
        Experiment::Trials {
            trials,
            points,
            percent,
            accuracies,
            datapoints,
        } => {
            let splits = loader::load_trials(&config.data, *trials)?;
            let reporter = TrialsReporter::new(accuracies.clone(), datapoints.clone());
            let record = run_trials(&splits, points, *percent, hyper, &mut rng, &reporter)?;
            reporter.save(&record)?;
            Ok(record)
        }
    }
}

/// Trains a fresh classifier on the last `k` training samples and evaluates it on the test set.
fn train_and_evaluate(
    split: &Split,
    k: usize,
    hyper: Hyperparams,
    rng: &mut StdRng,
) -> anyhow::Result<Evaluation> {
    let train = split.train.tail(k)?;
    let n_classes = split.train.n_classes();

    let mut clf = LogReg::new(
        train.n_features(),
        n_classes,
        hyper,
        StdRng::from_rng(rng),
    )?;
    let losses = clf
        .fit(&train)
        .with_context(|| format!("failed to train on {k} datapoints"))?;
    debug!("final loss {:?} training on {} datapoints", losses.last(), train.len());

    Ok(clf.evaluate(&split.test)?)
}

/// Sweeps over the amount of training samples, one classifier per point.
///
/// # Arguments
/// * `split` - The datasets.
/// * `points` - The amounts of training samples, taken from the end of the training set.
/// * `hyper` - The training hyperparameters.
/// * `rng` - Seeds every classifier.
/// * `reporter` - Receives every evaluation.
pub fn run_sweep(
    split: &Split,
    points: &[usize],
    hyper: Hyperparams,
    rng: &mut StdRng,
    reporter: &mut SweepReporter,
) -> anyhow::Result<AccuracyRecord> {
    let mut record = AccuracyRecord::default();

    for &k in points {
        let evaluation = train_and_evaluate(split, k, hyper, rng)?;
        reporter.record(k, &evaluation, split.test.y())?;

        record.points.push(k);
        record.accuracies.push(vec![evaluation.accuracy]);
    }

    Ok(record)
}

/// Repeats the experiment over every trial's datasets for every point.
///
/// # Arguments
/// * `splits` - The datasets of each trial.
/// * `points` - The amounts of training samples.
/// * `percent` - Whether to scale the accuracies into `[0, 100]`.
/// * `hyper` - The training hyperparameters.
/// * `rng` - Seeds every classifier.
/// * `reporter` - Logs every trial and point.
pub fn run_trials(
    splits: &[Split],
    points: &[usize],
    percent: bool,
    hyper: Hyperparams,
    rng: &mut StdRng,
    reporter: &TrialsReporter,
) -> anyhow::Result<AccuracyRecord> {
    let scale = if percent { 100.0 } else { 1.0 };
    let mut record = AccuracyRecord::default();

    for &k in points {
        let mut accuracies = Vec::with_capacity(splits.len());

        for (trial, split) in splits.iter().enumerate() {
            let evaluation = train_and_evaluate(split, k, hyper, rng)?;
            let accuracy = evaluation.accuracy * scale;
            reporter.trial(trial, k, accuracy);
            accuracies.push(accuracy);
        }

        reporter.point(k, &accuracies);
        record.points.push(k);
        record.accuracies.push(accuracies);
    }

    Ok(record)
}
