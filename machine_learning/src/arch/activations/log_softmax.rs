use ndarray::{Array2, ArrayView2, Axis};

/// Row-wise logarithm of the softmax, turning per-class scores into log-probabilities.
#[derive(Debug, Clone, Default)]
pub struct LogSoftmax {
    a: Array2<f32>,
}

impl LogSoftmax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes `z - ln Σ exp(z)` for every row, shifting by the row maximum for stability.
    pub fn forward(&mut self, z: ArrayView2<f32>) -> ArrayView2<'_, f32> {
        self.a = z.to_owned();

        for mut row in self.a.axis_iter_mut(Axis(0)) {
            let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            let log_sum = row.iter().map(|&v| (v - max).exp()).sum::<f32>().ln() + max;
            row.mapv_inplace(|v| v - log_sum);
        }

        self.a.view()
    }

    /// Maps the gradient with respect to the log-probabilities back onto the scores, that is
    /// `d - softmax(z) * Σ d` for every row.
    pub fn backward(&self, mut d: Array2<f32>) -> Array2<f32> {
        for (mut d_row, a_row) in d.axis_iter_mut(Axis(0)).zip(self.a.axis_iter(Axis(0))) {
            let total = d_row.sum();
            d_row.zip_mut_with(&a_row, |d, &a| *d -= a.exp() * total);
        }

        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rows_are_log_probabilities() {
        let mut act = LogSoftmax::new();
        let z = array![[1.0, 2.0, 3.0], [-4.0, 0.0, 10.0]];

        let a = act.forward(z.view());
        for row in a.axis_iter(Axis(0)) {
            let total: f32 = row.iter().map(|v| v.exp()).sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn large_scores_do_not_overflow() {
        let mut act = LogSoftmax::new();
        let z = array![[1000.0, 1000.0]];

        let a = act.forward(z.view());
        assert!((a[[0, 0]] - (0.5f32).ln()).abs() < 1e-6);
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn uniform_gradient_vanishes() {
        // Shifting every score by the same amount doesn't change the output.
        let mut act = LogSoftmax::new();
        act.forward(array![[0.3, -1.2, 2.0]].view());

        let d = act.backward(array![[1.0, 1.0, 1.0]]);
        assert!(d.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn backward_matches_finite_differences() {
        let z = array![[0.5, -0.25, 1.5]];
        let upstream = array![[0.0, -1.0, 0.0]];
        let eps = 1e-3;

        let mut act = LogSoftmax::new();
        act.forward(z.view());
        let analytic = act.backward(upstream.clone());

        for j in 0..3 {
            let mut plus = z.clone();
            plus[[0, j]] += eps;
            let mut minus = z.clone();
            minus[[0, j]] -= eps;

            let f_plus = (&act.forward(plus.view()).to_owned() * &upstream).sum();
            let f_minus = (&act.forward(minus.view()).to_owned() * &upstream).sum();
            let numeric = (f_plus - f_minus) / (2.0 * eps);

            assert!((numeric - analytic[[0, j]]).abs() < 1e-2);
        }
    }
}
