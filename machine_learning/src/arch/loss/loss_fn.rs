use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::Result;

/// A loss measured between the model's output and the expected class of every sample.
pub trait LossFn {
    /// Returns the loss averaged over the batch.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<f32>;

    /// Returns the gradient of `loss` with respect to `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<Array2<f32>>;
}
