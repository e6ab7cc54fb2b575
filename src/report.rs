use std::path::{Path, PathBuf};

use anyhow::Context;
use datafiles::{SweepResults, npy};
use log::info;
use machine_learning::{Evaluation, metrics};
use ndarray::{Array1, Array2, ArrayView1};

use crate::experiment::AccuracyRecord;

/// Records the outcome of every point of a sweep, rewriting the results file each time so a
/// partial sweep is never lost.
pub struct SweepReporter {
    path: PathBuf,
    results: SweepResults,
}

impl SweepReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: SweepResults::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn results(&self) -> &SweepResults {
        &self.results
    }

    /// Appends the evaluation of the classifier trained on `k` samples and saves the results.
    ///
    /// # Arguments
    /// * `k` - The amount of training samples.
    /// * `evaluation` - The predictions over the test set and their accuracy.
    /// * `truth` - The test labels.
    pub fn record(
        &mut self,
        k: usize,
        evaluation: &Evaluation,
        truth: ArrayView1<usize>,
    ) -> anyhow::Result<()> {
        info!(
            "test accuracy at {} using {k} datapoints",
            significant(evaluation.accuracy, 5)
        );

        let results = &mut self.results;
        results.predicted_labels = evaluation.predicted.iter().map(|&c| c as i64).collect();
        results.true_labels = truth.iter().map(|&c| c as i64).collect();
        results.accuracy.push(evaluation.accuracy);
        results.points.push(k);

        results
            .save(&self.path)
            .with_context(|| format!("failed to write results to {}", self.path.display()))
    }
}

/// Reports the accuracies of repeated trials.
pub struct TrialsReporter {
    accuracies: PathBuf,
    datapoints: PathBuf,
}

impl TrialsReporter {
    pub fn new(accuracies: impl Into<PathBuf>, datapoints: impl Into<PathBuf>) -> Self {
        Self {
            accuracies: accuracies.into(),
            datapoints: datapoints.into(),
        }
    }

    /// Logs the accuracy of one trial.
    pub fn trial(&self, trial: usize, k: usize, accuracy: f32) {
        info!("trial {trial}: {accuracy} for {k} datapoints");
    }

    /// Logs the mean and standard deviation of the trials run on `k` samples.
    pub fn point(&self, k: usize, accuracies: &[f32]) {
        if let Some((mean, std)) = metrics::mean_std(accuracies) {
            info!("{mean} ± {std} for {k} datapoints");
        }
    }

    /// Saves the accuracies and the amounts of training samples as `.npy` files.
    ///
    /// A single trial is saved as one accuracy per point, several as a `points x trials` matrix.
    pub fn save(&self, record: &AccuracyRecord) -> anyhow::Result<()> {
        let trials = record.accuracies.first().map_or(0, Vec::len);
        let values: Vec<f64> = record
            .accuracies
            .iter()
            .flatten()
            .map(|&a| a as f64)
            .collect();

        let saved = if trials == 1 {
            npy::save(&self.accuracies, Array1::from(values).view())
        } else {
            let accuracies = Array2::from_shape_vec((record.points.len(), trials), values)
                .context("trials have different lengths")?;
            npy::save(&self.accuracies, accuracies.view())
        };
        saved.with_context(|| format!("failed to write {}", self.accuracies.display()))?;

        let points: Array1<i64> = record.points.iter().map(|&k| k as i64).collect();
        npy::save(&self.datapoints, points.view())
            .with_context(|| format!("failed to write {}", self.datapoints.display()))?;

        info!(
            "saved {} and {}",
            self.accuracies.display(),
            self.datapoints.display()
        );
        Ok(())
    }
}

/// Formats `v` with `digits` significant digits, switching to scientific notation for very
/// small or large magnitudes and dropping trailing zeros, e.g. `0.87654`, `1.0` or `1e-05`.
fn significant(v: f32, digits: usize) -> String {
    let digits = digits.max(1);
    if v == 0.0 || !v.is_finite() {
        return format!("{v:?}");
    }

    // The exponent after rounding decides the notation.
    let sci = format!("{:.*e}", digits - 1, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if (-4..digits as i32).contains(&exp) {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{v:.decimals$}");
        let trimmed = if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.')
        } else {
            &fixed
        };

        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        }
    } else {
        let mantissa = if mantissa.contains('.') {
            mantissa.trim_end_matches('0').trim_end_matches('.')
        } else {
            mantissa
        };
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafiles::npy::NpyArray;
    use ndarray::array;
    use std::{env, fs};

    fn scratch(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("readout-report-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn accuracies_are_printed_with_five_significant_digits() {
        assert_eq!(significant(0.87654321, 5), "0.87654");
        assert_eq!(significant(0.123456, 5), "0.12346");
        assert_eq!(significant(0.5, 5), "0.5");
        assert_eq!(significant(1.0, 5), "1.0");
        assert_eq!(significant(0.999999, 5), "1.0");
        assert_eq!(significant(0.0, 5), "0.0");
        assert_eq!(significant(0.00012345678, 5), "0.00012346");
        assert_eq!(significant(0.00001, 5), "1e-05");
        assert_eq!(significant(87.654321, 5), "87.654");
    }

    #[test]
    fn sweep_results_are_rewritten_after_every_point() {
        let dir = scratch("sweep");
        let mut reporter = SweepReporter::new(dir.join("results.json"));
        let truth = array![0, 1, 1];

        let first = Evaluation {
            predicted: array![0, 0, 1],
            accuracy: 2.0 / 3.0,
        };
        reporter.record(10, &first, truth.view()).unwrap();
        assert_eq!(SweepResults::load(reporter.path()).unwrap().points, [10]);

        let second = Evaluation {
            predicted: array![0, 1, 1],
            accuracy: 1.0,
        };
        reporter.record(20, &second, truth.view()).unwrap();

        let saved = SweepResults::load(reporter.path()).unwrap();
        assert_eq!(&saved, reporter.results());
        assert_eq!(saved.points, [10, 20]);
        assert_eq!(saved.accuracy, [2.0 / 3.0, 1.0]);
        assert_eq!(saved.predicted_labels, [0, 1, 1]);
        assert_eq!(saved.true_labels, [0, 1, 1]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn single_trial_accuracies_are_a_vector() {
        let dir = scratch("single");
        let reporter = TrialsReporter::new(dir.join("acc.npy"), dir.join("points.npy"));
        let record = AccuracyRecord {
            points: vec![100, 200],
            accuracies: vec![vec![50.0], vec![75.0]],
        };

        reporter.save(&record).unwrap();

        let acc = NpyArray::open(dir.join("acc.npy")).unwrap();
        assert_eq!(acc.shape(), [2]);
        assert_eq!(acc.dtype().descr(), "<f8");
        assert_eq!(acc.to_vec::<f64>(), [50.0, 75.0]);

        let points = NpyArray::open(dir.join("points.npy")).unwrap();
        assert_eq!(points.to_vec::<i64>(), [100, 200]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn several_trials_are_a_matrix() {
        let dir = scratch("several");
        let reporter = TrialsReporter::new(dir.join("acc.npy"), dir.join("points.npy"));
        let record = AccuracyRecord {
            points: vec![5000],
            accuracies: vec![vec![0.5, 0.25, 0.75]],
        };

        reporter.save(&record).unwrap();

        let acc = NpyArray::open(dir.join("acc.npy")).unwrap();
        assert_eq!(acc.shape(), [1, 3]);
        assert_eq!(acc.to_vec::<f64>(), [0.5, 0.25, 0.75]);

        fs::remove_dir_all(dir).unwrap();
    }
}
