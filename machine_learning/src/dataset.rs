use std::{collections::BTreeSet, num::NonZeroUsize};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// A labelled dataset: one feature row per sample and one class index per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f32>,
    y: Array1<usize>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The feature matrix, one sample per row.
    /// * `y` - The class index of each sample.
    ///
    /// # Returns
    /// A new `Dataset` or an error if the sizes don't line up or there are no samples.
    pub fn new(x: Array2<f32>, y: Array1<usize>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: y.len(),
                expected: x.nrows(),
            });
        }

        if y.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` from signed labels, as they are usually stored on disk.
    ///
    /// # Arguments
    /// * `x` - The feature matrix, one sample per row.
    /// * `labels` - The signed class index of each sample.
    ///
    /// # Returns
    /// A new `Dataset` or an error if any label is negative.
    pub fn from_raw(x: Array2<f32>, labels: ArrayView1<i64>) -> Result<Self> {
        let y = labels
            .iter()
            .enumerate()
            .map(|(index, &label)| {
                usize::try_from(label).map_err(|_| MlErr::NegativeLabel { index, label })
            })
            .collect::<Result<Array1<_>>>()?;

        Self::new(x, y)
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Returns the length of every feature row.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the amount of distinct labels present in the dataset.
    pub fn n_classes(&self) -> usize {
        self.y.iter().collect::<BTreeSet<_>>().len()
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, usize> {
        self.y.view()
    }

    /// Keeps only the last `k` samples, or all of them if there are fewer.
    ///
    /// # Arguments
    /// * `k` - The amount of samples to keep.
    ///
    /// # Returns
    /// A new dataset with the trailing samples.
    pub fn tail(&self, k: usize) -> Result<Self> {
        let start = self.len().saturating_sub(k);
        let x = self.x.slice(s![start.., ..]).to_owned();
        let y = self.y.slice(s![start..]).to_owned();
        Self::new(x, y)
    }

    /// Randomly permutes the samples, keeping every row with its label.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        self.x = self.x.select(Axis(0), &order);
        self.y = self.y.select(Axis(0), &order);
    }

    /// Splits the dataset in consecutive batches, the last one may be shorter.
    ///
    /// # Arguments
    /// * `batch_size` - The amount of samples per batch.
    ///
    /// # Returns
    /// An iterator over the `(features, labels)` batches.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView1<'_, usize>)> {
        let n = batch_size.get();
        self.x
            .axis_chunks_iter(Axis(0), n)
            .zip(self.y.axis_chunks_iter(Axis(0), n))
    }
}
