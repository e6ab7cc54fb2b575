use std::path::PathBuf;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// The datasets features were extracted from, each with its own file naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPreset {
    /// 3-class N-MNIST.
    Nmnist3,
    /// 10-class N-MNIST.
    Nmnist10,
    /// 4-class POKER-DVS.
    Poker,
    /// N-CARS scaled down to 28x28.
    Ncars,
    /// 10-class N-MNIST, features extracted after 2 epochs.
    #[serde(rename = "nmnist10_2e")]
    Nmnist10TwoEpochs,
}

impl TaskPreset {
    /// Returns the prefix shared by the task's array files.
    pub fn prefix(self) -> &'static str {
        match self {
            TaskPreset::Nmnist3 => "nmnist_3",
            TaskPreset::Nmnist10 => "nmnist_10",
            TaskPreset::Poker => "poker",
            TaskPreset::Ncars => "ncars_scaled",
            TaskPreset::Nmnist10TwoEpochs => "nmnist_10_2e",
        }
    }

    /// Returns the stem of the task's results file.
    pub fn results_name(self) -> &'static str {
        match self {
            TaskPreset::Nmnist3 => "3nmnist",
            TaskPreset::Nmnist10 => "10nmnist",
            TaskPreset::Poker => "poker",
            TaskPreset::Ncars => "ncar28x28",
            TaskPreset::Nmnist10TwoEpochs => "10nmnist_2e",
        }
    }
}

/// Where to find the four arrays of an experiment.
///
/// The files are `<dir>/<prefix>[<trial>]_{tr_set,tr_label,te_set,te_label}.npy`, the prefix
/// being either given explicitly or taken from a task preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSource {
    pub dir: PathBuf,
    #[serde(default)]
    pub task: Option<TaskPreset>,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// The paths of the train and test features and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub train_set: PathBuf,
    pub train_labels: PathBuf,
    pub test_set: PathBuf,
    pub test_labels: PathBuf,
}

impl DataSource {
    pub fn from_task(dir: impl Into<PathBuf>, task: TaskPreset) -> Self {
        Self {
            dir: dir.into(),
            task: Some(task),
            prefix: None,
        }
    }

    /// Returns the file prefix, an explicit one takes precedence over the task's.
    pub fn prefix(&self) -> anyhow::Result<&str> {
        match (&self.prefix, self.task) {
            (Some(prefix), _) => Ok(prefix.as_str()),
            (None, Some(task)) => Ok(task.prefix()),
            (None, None) => bail!("the data source needs either a task or a prefix"),
        }
    }

    /// Resolves the paths of the four arrays.
    ///
    /// # Arguments
    /// * `trial` - Appended to the prefix when the experiment has several trials.
    pub fn paths(&self, trial: Option<usize>) -> anyhow::Result<DataPaths> {
        let mut stem = self.prefix()?.to_string();
        if let Some(trial) = trial {
            stem.push_str(&trial.to_string());
        }

        let file = |suffix: &str| self.dir.join(format!("{stem}_{suffix}.npy"));

        Ok(DataPaths {
            train_set: file("tr_set"),
            train_labels: file("tr_label"),
            test_set: file("te_set"),
            test_labels: file("te_label"),
        })
    }
}
