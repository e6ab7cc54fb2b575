/// An optimization algorithm, it dictates how to update the parameters given a gradient.
pub trait Optimizer {
    /// Makes a single optimization step.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The gradient of the loss with respect to `params`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}
