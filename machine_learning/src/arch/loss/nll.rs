use ndarray::{Array2, ArrayView1, ArrayView2};

use super::LossFn;
use crate::{MlErr, Result};

/// Negative log-likelihood loss, expects log-probabilities as predictions.
#[derive(Default, Clone, Copy)]
pub struct Nll;

impl Nll {
    /// Returns a new `Nll`.
    pub fn new() -> Self {
        Self
    }

    fn check(y_pred: &ArrayView2<f32>, y: &ArrayView1<usize>) -> Result<()> {
        if y_pred.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: y.len(),
                expected: y_pred.nrows(),
            });
        }

        let classes = y_pred.ncols();
        match y.iter().find(|&&label| label >= classes) {
            Some(&label) => Err(MlErr::LabelOutOfRange { label, classes }),
            None => Ok(()),
        }
    }
}

impl LossFn for Nll {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<f32> {
        Self::check(&y_pred, &y)?;

        if y.is_empty() {
            return Ok(0.0);
        }

        let total: f32 = y
            .iter()
            .enumerate()
            .map(|(i, &label)| -y_pred[[i, label]])
            .sum();

        Ok(total / y.len() as f32)
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<Array2<f32>> {
        Self::check(&y_pred, &y)?;

        let mut d = Array2::zeros(y_pred.raw_dim());
        let scale = -1.0 / y.len().max(1) as f32;

        for (i, &label) in y.iter().enumerate() {
            d[[i, label]] = scale;
        }

        Ok(d)
    }
}
