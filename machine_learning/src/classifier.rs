use ndarray::{Array1, ArrayView2};
use rand::Rng;

use crate::{
    MlErr, Result,
    arch::{LogisticRegression, Model, loss::Nll},
    dataset::Dataset,
    metrics,
    optimization::Sgd,
    training::{Hyperparams, Trainer},
};

/// The outcome of evaluating a classifier over a labelled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predicted: Array1<usize>,
    /// Fraction of correct predictions, in `[0, 1]`.
    pub accuracy: f32,
}

/// A logistic regression classifier trained with SGD on the negative log-likelihood.
pub struct LogReg<R: Rng> {
    model: LogisticRegression,
    hyper: Hyperparams,
    rng: R,
}

impl<R: Rng> LogReg<R> {
    /// Creates a new, untrained, `LogReg`.
    ///
    /// # Arguments
    /// * `n_in` - The amount of features per sample.
    /// * `n_out` - The amount of classes.
    /// * `hyper` - The training hyperparameters.
    /// * `rng` - Used for initializing the parameters and shuffling.
    pub fn new(n_in: usize, n_out: usize, hyper: Hyperparams, mut rng: R) -> Result<Self> {
        hyper.validate()?;
        let model = LogisticRegression::new(n_in, n_out, &mut rng)?;

        Ok(Self { model, hyper, rng })
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    /// Trains the classifier on `dataset`.
    ///
    /// # Returns
    /// The mean loss of every epoch.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<Vec<f32>> {
        if dataset.n_features() != self.model.n_features() {
            return Err(MlErr::SizeMismatch {
                what: "training features",
                got: dataset.n_features(),
                expected: self.model.n_features(),
            });
        }

        let Hyperparams {
            learning_rate,
            weight_decay,
            momentum,
            ..
        } = self.hyper;

        let optimizer = Sgd::new(self.model.size(), learning_rate, momentum, weight_decay);
        let mut trainer = Trainer::new(optimizer, Nll::new(), self.hyper);
        trainer.fit(&mut self.model, dataset, &mut self.rng)
    }

    /// Predicts the class of every row of `x`.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<usize>> {
        self.model.predict(x)
    }

    /// Predicts every sample of `dataset` and measures the accuracy.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Evaluation> {
        let predicted = self.predict(dataset.x())?;
        let accuracy = metrics::accuracy(predicted.view(), dataset.y())?;

        Ok(Evaluation {
            predicted,
            accuracy,
        })
    }
}
