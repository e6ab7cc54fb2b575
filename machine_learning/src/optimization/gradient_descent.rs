use super::Optimizer;

/// Gradient descent optimization algorithm with L2 weight decay.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f32,
    weight_decay: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    /// * `weight_decay` - The L2 penalty added to the gradient, proportional to each parameter.
    pub fn new(learning_rate: f32, weight_decay: f32) -> Self {
        Self {
            learning_rate,
            weight_decay,
        }
    }
}

impl Optimizer for GradientDescent {
    /// Updates the parameters according to the algorithm's learning rule, that is, making a step in
    /// the opposite direction of the decayed gradient, with a length of `learning_rate`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        let lr = self.learning_rate;
        let wd = self.weight_decay;

        for (w, g) in params.iter_mut().zip(grad) {
            *w -= lr * (g + wd * *w);
        }
    }
}
