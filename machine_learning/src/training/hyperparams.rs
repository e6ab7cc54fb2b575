use std::num::NonZeroUsize;

use crate::{MlErr, Result};

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    }
}

/// The knobs of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparams {
    pub learning_rate: f32,
    pub weight_decay: f32,
    pub momentum: f32,
    pub batch_size: NonZeroUsize,
    pub epochs: NonZeroUsize,
    /// Whether to permute the samples before every epoch.
    pub shuffle: bool,
}

impl Hyperparams {
    /// Plain SGD, used when sweeping over the amount of training samples.
    pub fn sweep() -> Self {
        Self {
            learning_rate: 0.1,
            weight_decay: 0.01,
            momentum: 0.0,
            batch_size: nonzero(128),
            epochs: nonzero(70),
            shuffle: false,
        }
    }

    /// SGD with momentum, used when repeating an experiment over several trials.
    pub fn trials() -> Self {
        Self {
            learning_rate: 0.01,
            weight_decay: 0.01,
            momentum: 0.9,
            batch_size: nonzero(32),
            epochs: nonzero(100),
            shuffle: false,
        }
    }

    /// Checks the values make for a sensible optimization.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(MlErr::InvalidHyperparams(
                "the learning rate must be positive",
            ));
        }

        if !self.weight_decay.is_finite() || self.weight_decay < 0.0 {
            return Err(MlErr::InvalidHyperparams(
                "the weight decay can't be negative",
            ));
        }

        if !(0.0..1.0).contains(&self.momentum) {
            return Err(MlErr::InvalidHyperparams(
                "the momentum must be in the [0, 1) range",
            ));
        }

        Ok(())
    }
}

impl Default for Hyperparams {
    fn default() -> Self {
        Self::sweep()
    }
}
