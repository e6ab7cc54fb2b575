use std::path::Path;

use anyhow::{Context, ensure};
use datafiles::npy;
use log::info;
use machine_learning::Dataset;
use ndarray::{Array1, Array2};

use crate::tasks::{DataPaths, DataSource};

/// The train and test datasets of an experiment.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Loads the four arrays of `source`.
///
/// # Arguments
/// * `source` - Where the arrays are.
/// * `trial` - The trial index appended to the file prefix, if any.
pub fn load(source: &DataSource, trial: Option<usize>) -> anyhow::Result<Split> {
    load_paths(&source.paths(trial)?)
}

/// Loads the datasets of every trial once.
///
/// With a single trial the files are the unsuffixed ones, otherwise trial `t` reads the files
/// whose prefix ends in `t`.
pub fn load_trials(source: &DataSource, trials: usize) -> anyhow::Result<Vec<Split>> {
    (0..trials)
        .map(|trial| load(source, (trials > 1).then_some(trial)))
        .collect()
}

/// Loads the datasets stored at `paths`.
pub fn load_paths(paths: &DataPaths) -> anyhow::Result<Split> {
    let (train_x, train_y) = read_pair(&paths.train_set, &paths.train_labels)?;
    let (test_x, test_y) = read_pair(&paths.test_set, &paths.test_labels)?;

    info!(
        "train set {:?}, train labels {:?}, test set {:?}, test labels {:?}",
        train_x.dim(),
        train_y.dim(),
        test_x.dim(),
        test_y.dim()
    );

    ensure!(
        train_x.ncols() == test_x.ncols(),
        "train samples have {} features but test samples have {}",
        train_x.ncols(),
        test_x.ncols()
    );

    let train = Dataset::from_raw(train_x, train_y.view())
        .with_context(|| format!("invalid training data {}", paths.train_set.display()))?;
    let test = Dataset::from_raw(test_x, test_y.view())
        .with_context(|| format!("invalid test data {}", paths.test_set.display()))?;

    Ok(Split { train, test })
}

fn read_pair(set: &Path, labels: &Path) -> anyhow::Result<(Array2<f32>, Array1<i64>)> {
    let x = npy::read_array2_f32(set)
        .with_context(|| format!("failed to read features {}", set.display()))?;
    let y = npy::read_array1_i64(labels)
        .with_context(|| format!("failed to read labels {}", labels.display()))?;

    Ok((x, y))
}
