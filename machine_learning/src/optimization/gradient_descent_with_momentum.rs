use super::Optimizer;

#[derive(Debug, Clone)]
pub struct GradientDescentWithMomentum {
    learning_rate: f32,
    momentum: f32,
    weight_decay: f32,
    velocity: Box<[f32]>,
}

impl GradientDescentWithMomentum {
    /// Creates a new `GradientDescentWithMomentum` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `momentum` - The fraction of the previous velocity kept on every step.
    /// * `weight_decay` - The L2 penalty added to the gradient.
    pub fn new(len: usize, learning_rate: f32, momentum: f32, weight_decay: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            weight_decay,
            velocity: vec![0.; len].into_boxed_slice(),
        }
    }
}

impl Optimizer for GradientDescentWithMomentum {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        let lr = self.learning_rate;
        let mu = self.momentum;
        let wd = self.weight_decay;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.velocity.iter_mut())
            .for_each(|((w, g), v)| {
                *v = (mu * *v) + g + wd * *w;
                *w -= lr * *v;
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_plain_gradient_descent() {
        let mut opt = GradientDescentWithMomentum::new(2, 0.1, 0.9, 0.0);
        let mut params = [1.0, 1.0];

        opt.update_params(&mut params, &[1.0, -2.0]);
        assert!((params[0] - 0.9).abs() < 1e-6);
        assert!((params[1] - 1.2).abs() < 1e-6);
    }

    #[test]
    fn velocity_accumulates() {
        let mut opt = GradientDescentWithMomentum::new(1, 1.0, 0.5, 0.0);
        let mut params = [0.0];

        opt.update_params(&mut params, &[1.0]); // v = 1
        opt.update_params(&mut params, &[1.0]); // v = 1.5
        assert!((params[0] + 2.5).abs() < 1e-6);
    }
}
