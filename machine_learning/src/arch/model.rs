use ndarray::{Array2, ArrayView2};

use crate::Result;

/// A trainable model whose parameters and gradient are exposed as flat slices.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Makes a forward pass, keeping whatever the next `backward` call needs.
    ///
    /// # Arguments
    /// * `x` - The input batch, one sample per row.
    ///
    /// # Returns
    /// The model's output for the batch or an error if the input has the wrong width.
    fn forward(&mut self, x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>>;

    /// Accumulates the gradient of the loss with respect to the parameters.
    ///
    /// # Arguments
    /// * `d` - The gradient of the loss with respect to the last `forward` output.
    fn backward(&mut self, d: Array2<f32>) -> Result<()>;

    /// Resets the accumulated gradient to zero.
    fn zero_grad(&mut self);

    fn params(&self) -> &[f32];

    /// Returns the parameters for updating alongside the gradient accumulated so far.
    fn params_and_grad(&mut self) -> (&mut [f32], &[f32]);
}
