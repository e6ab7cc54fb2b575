use ndarray::{linalg, prelude::*};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use crate::{MlErr, Result};

/// A fully connected layer computing `z = x·W + b`.
///
/// The parameters live in one flat buffer, the weights `(n_in, n_out)` in row major order
/// followed by the `n_out` biases. The gradient buffer has the same layout.
#[derive(Debug, Clone)]
pub struct Dense {
    dim: (usize, usize),
    params: Box<[f32]>,
    grad: Box<[f32]>,

    // Forward metadata
    x: Array2<f32>,
    z: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer from its raw parameters.
    ///
    /// # Arguments
    /// * `dim` - The input and output sizes of the layer.
    /// * `params` - The weights followed by the biases.
    ///
    /// # Returns
    /// A new `Dense` or an error if the amount of parameters doesn't match the dimension.
    pub fn new(dim: (usize, usize), params: Vec<f32>) -> Result<Self> {
        let size = Self::size_of(dim);

        if params.len() != size {
            return Err(MlErr::SizeMismatch {
                what: "dense parameters",
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            dim,
            params: params.into_boxed_slice(),
            grad: vec![0.0; size].into_boxed_slice(),
            x: Array2::zeros((0, dim.0)),
            z: Array2::zeros((0, dim.1)),
        })
    }

    /// Creates a new `Dense` layer with every parameter sampled from
    /// `U(-1/sqrt(n_in), 1/sqrt(n_in))`.
    ///
    /// # Arguments
    /// * `dim` - The input and output sizes of the layer.
    /// * `rng` - A random number generator.
    pub fn random<R: Rng>(dim: (usize, usize), rng: &mut R) -> Result<Self> {
        let bound = 1.0 / (dim.0 as f32).sqrt();
        let uniform =
            Uniform::new(-bound, bound).map_err(|e| MlErr::InvalidInit(e.to_string()))?;
        let params = Array1::random_using(Self::size_of(dim), uniform, rng);

        Self::new(dim, params.to_vec())
    }

    fn size_of((n_in, n_out): (usize, usize)) -> usize {
        (n_in + 1) * n_out
    }

    /// Returns the input and output sizes of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn params_and_grad(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.params, &self.grad)
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Computes the output of the layer without keeping any metadata for a backward pass.
    pub fn apply(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(&x)?;
        let (w, b) = view_params(&self.params, self.dim)?;
        Ok(x.dot(&w) + &b)
    }

    /// Computes the output of the layer, remembering the input for `backward`.
    pub fn forward(&mut self, x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>> {
        self.check_input(&x)?;
        let (w, b) = view_params(&self.params, self.dim)?;
        let shape = (x.nrows(), self.dim.1);

        if self.z.dim() != shape {
            self.z = Array2::zeros(shape);
        }

        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut self.z);
        self.z += &b;
        self.x = x.to_owned();

        Ok(self.z.view())
    }

    /// Accumulates the gradient of the loss with respect to the parameters.
    ///
    /// # Arguments
    /// * `d` - The gradient of the loss with respect to this layer's output.
    pub fn backward(&mut self, d: ArrayView2<f32>) -> Result<()> {
        if d.dim() != (self.x.nrows(), self.dim.1) {
            return Err(MlErr::SizeMismatch {
                what: "dense deltas",
                got: d.len(),
                expected: self.x.nrows() * self.dim.1,
            });
        }

        let w_size = self.dim.0 * self.dim.1;
        let (dw_raw, db_raw) = self.grad.split_at_mut(w_size);
        let mut dw = ArrayViewMut2::from_shape(self.dim, dw_raw)?;
        let mut db = ArrayViewMut1::from_shape(self.dim.1, db_raw)?;

        linalg::general_mat_mul(1.0, &self.x.t(), &d, 1.0, &mut dw);
        db += &d.sum_axis(Axis(0));

        Ok(())
    }

    fn check_input(&self, x: &ArrayView2<f32>) -> Result<()> {
        if x.ncols() != self.dim.0 {
            return Err(MlErr::SizeMismatch {
                what: "input features",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        Ok(())
    }
}

/// Gives a view of the raw parameter slice as the weights and biases of a layer.
fn view_params(
    params: &[f32],
    dim: (usize, usize),
) -> Result<(ArrayView2<'_, f32>, ArrayView1<'_, f32>)> {
    let (w_raw, b_raw) = params.split_at(dim.0 * dim.1);
    let weights = ArrayView2::from_shape(dim, w_raw)?;
    let biases = ArrayView1::from_shape(dim.1, b_raw)?;
    Ok((weights, biases))
}
