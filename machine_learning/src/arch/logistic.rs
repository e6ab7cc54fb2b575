use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;

use super::{Model, activations::LogSoftmax, layers::Dense};
use crate::Result;

/// Multinomial logistic regression: an affine map to per-class scores followed by a
/// log-softmax.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    dense: Dense,
    act_fn: LogSoftmax,
}

impl LogisticRegression {
    /// Creates a new `LogisticRegression` with randomly initialized parameters.
    ///
    /// # Arguments
    /// * `n_in` - The amount of features per sample.
    /// * `n_out` - The amount of classes.
    /// * `rng` - A random number generator.
    pub fn new<R: Rng>(n_in: usize, n_out: usize, rng: &mut R) -> Result<Self> {
        Ok(Self::from_dense(Dense::random((n_in, n_out), rng)?))
    }

    /// Creates a new `LogisticRegression` from known parameters, the `(n_in, n_out)` weights
    /// followed by the `n_out` biases.
    pub fn from_params(n_in: usize, n_out: usize, params: Vec<f32>) -> Result<Self> {
        Ok(Self::from_dense(Dense::new((n_in, n_out), params)?))
    }

    fn from_dense(dense: Dense) -> Self {
        Self {
            dense,
            act_fn: LogSoftmax::new(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.dense.dim().0
    }

    pub fn n_classes(&self) -> usize {
        self.dense.dim().1
    }

    /// Returns the per-class scores before normalization.
    pub fn scores(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.dense.apply(x)
    }

    /// Predicts the most likely class of every row of `x`. The log-softmax is monotonic so the
    /// argmax is taken over the raw scores, the first maximum winning ties.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<usize>> {
        let scores = self.scores(x)?;
        Ok(scores.map_axis(Axis(1), |row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
                    if v > max { (i, v) } else { (best, max) }
                })
                .0
        }))
    }
}

impl Model for LogisticRegression {
    fn size(&self) -> usize {
        self.dense.size()
    }

    fn forward(&mut self, x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>> {
        let z = self.dense.forward(x)?;
        Ok(self.act_fn.forward(z))
    }

    fn backward(&mut self, d: Array2<f32>) -> Result<()> {
        let d = self.act_fn.backward(d);
        self.dense.backward(d.view())
    }

    fn zero_grad(&mut self) {
        self.dense.zero_grad();
    }

    fn params(&self) -> &[f32] {
        self.dense.params()
    }

    fn params_and_grad(&mut self) -> (&mut [f32], &[f32]) {
        self.dense.params_and_grad()
    }
}
