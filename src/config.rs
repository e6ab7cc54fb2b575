use std::{env, fs, num::NonZeroUsize, path::{Path, PathBuf}};

use anyhow::{Context, ensure};
use log::info;
use machine_learning::Hyperparams;
use serde::{Deserialize, Serialize};

use crate::tasks::{DataSource, TaskPreset};

/// Environment variable holding the path of the config file.
pub const CONFIG_ENV: &str = "READOUT_CONFIG";

/// Everything needed to run an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub data: DataSource,
    pub experiment: Experiment,
    /// Defaults to the preset of the experiment kind.
    #[serde(default)]
    pub model: Option<ModelConfig>,
    /// Seed for parameter initialization and shuffling, drawn from the OS if missing.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// The kind of experiment to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Experiment {
    /// Trains on a growing amount of samples, once per point.
    Sweep {
        #[serde(default)]
        points: PointRange,
        /// Defaults to the task's results name, or `results.json`.
        #[serde(default)]
        output: Option<PathBuf>,
    },
    /// Repeats the experiment over several trials per point.
    Trials {
        #[serde(default = "default_trials")]
        trials: usize,
        #[serde(default = "default_trial_points")]
        points: Vec<usize>,
        /// Whether to report accuracies in `[0, 100]` instead of `[0, 1]`.
        #[serde(default = "default_percent")]
        percent: bool,
        #[serde(default = "default_accuracies")]
        accuracies: PathBuf,
        #[serde(default = "default_datapoints")]
        datapoints: PathBuf,
    },
}

fn default_trials() -> usize {
    5
}

fn default_trial_points() -> Vec<usize> {
    vec![5000]
}

fn default_percent() -> bool {
    true
}

fn default_accuracies() -> PathBuf {
    "accuracies.npy".into()
}

fn default_datapoints() -> PathBuf {
    "datapoints.npy".into()
}

/// The amounts of training samples `start, start + step, ...` below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl Default for PointRange {
    fn default() -> Self {
        Self {
            start: 10,
            end: 1000,
            step: 10,
        }
    }
}

impl PointRange {
    pub fn points(&self) -> Vec<usize> {
        (self.start..self.end).step_by(self.step.max(1)).collect()
    }
}

/// Training hyperparameters as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub learning_rate: f32,
    pub weight_decay: f32,
    #[serde(default)]
    pub momentum: f32,
    pub batch_size: NonZeroUsize,
    pub epochs: NonZeroUsize,
    #[serde(default)]
    pub shuffle: bool,
}

impl From<ModelConfig> for Hyperparams {
    fn from(c: ModelConfig) -> Self {
        Hyperparams {
            learning_rate: c.learning_rate,
            weight_decay: c.weight_decay,
            momentum: c.momentum,
            batch_size: c.batch_size,
            epochs: c.epochs,
            shuffle: c.shuffle,
        }
    }
}

impl Default for ExperimentConfig {
    /// A sweep over the 10-class N-MNIST features in `./data`.
    fn default() -> Self {
        Self {
            data: DataSource::from_task("data", TaskPreset::Nmnist10),
            experiment: Experiment::Sweep {
                points: PointRange::default(),
                output: None,
            },
            model: None,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Reads and validates a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the config from the path given as first argument or in `READOUT_CONFIG`, falling
    /// back to the default one.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => {
                info!("loading config from {}", path.display());
                Self::from_file(path)
            }
            None => {
                info!("no config given, using the defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Returns the training hyperparameters, the configured ones or the experiment's preset.
    pub fn hyperparams(&self) -> Hyperparams {
        match (self.model, &self.experiment) {
            (Some(model), _) => model.into(),
            (None, Experiment::Sweep { .. }) => Hyperparams::sweep(),
            (None, Experiment::Trials { .. }) => Hyperparams::trials(),
        }
    }

    /// Returns the path of the sweep results file.
    pub fn sweep_output(&self) -> PathBuf {
        match (&self.experiment, self.data.task) {
            (Experiment::Sweep { output: Some(output), .. }, _) => output.clone(),
            (_, Some(task)) => format!("{}.json", task.results_name()).into(),
            _ => "results.json".into(),
        }
    }

    /// Checks the config describes a runnable experiment.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.data.prefix()?;
        self.hyperparams().validate()?;

        match &self.experiment {
            Experiment::Sweep { points, .. } => {
                ensure!(points.step > 0, "the sweep step must be greater than 0");
                ensure!(points.start > 0, "the sweep must start with at least 1 sample");
                ensure!(
                    points.start < points.end,
                    "the sweep range {}..{} is empty",
                    points.start,
                    points.end
                );
            }
            Experiment::Trials { trials, points, .. } => {
                ensure!(*trials > 0, "wrong number of trials: {trials}");
                ensure!(!points.is_empty(), "at least one point is required");
                ensure!(
                    points.iter().all(|&k| k > 0),
                    "every point must use at least 1 sample"
                );
            }
        }

        Ok(())
    }
}
