use super::{GradientDescent, GradientDescentWithMomentum, Optimizer};

/// Stochastic gradient descent, with or without momentum.
#[derive(Debug, Clone)]
pub enum Sgd {
    Plain(GradientDescent),
    Momentum(GradientDescentWithMomentum),
}
use Sgd::*;

impl Sgd {
    /// Picks the plain variant when `momentum` is zero.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters to optimize.
    /// * `learning_rate` - The length of every step.
    /// * `momentum` - The fraction of the previous velocity kept on every step.
    /// * `weight_decay` - The L2 penalty added to the gradient.
    pub fn new(len: usize, learning_rate: f32, momentum: f32, weight_decay: f32) -> Self {
        if momentum == 0.0 {
            Plain(GradientDescent::new(learning_rate, weight_decay))
        } else {
            Momentum(GradientDescentWithMomentum::new(
                len,
                learning_rate,
                momentum,
                weight_decay,
            ))
        }
    }
}

impl Optimizer for Sgd {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        match self {
            Plain(o) => o.update_params(params, grad),
            Momentum(o) => o.update_params(params, grad),
        }
    }
}
