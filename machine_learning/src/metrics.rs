use ndarray::ArrayView1;

use crate::{MlErr, Result};

/// Returns the fraction of predictions that match the expected labels, in `[0, 1]`.
///
/// # Arguments
/// * `predicted` - The predicted class of every sample.
/// * `truth` - The expected class of every sample.
///
/// # Returns
/// The accuracy or an error if the lengths differ or there are no samples.
pub fn accuracy(predicted: ArrayView1<usize>, truth: ArrayView1<usize>) -> Result<f32> {
    if predicted.len() != truth.len() {
        return Err(MlErr::SizeMismatch {
            what: "predictions",
            got: predicted.len(),
            expected: truth.len(),
        });
    }

    if truth.is_empty() {
        return Err(MlErr::EmptyDataset);
    }

    let hits = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    Ok(hits as f32 / truth.len() as f32)
}

/// Returns the mean and the population standard deviation of `values`, or `None` if there are
/// no values.
pub fn mean_std(values: &[f32]) -> Option<(f32, f32)> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

    Some((mean, var.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accuracy_counts_matches() {
        let p = array![0, 1, 2, 1];
        let t = array![0, 1, 1, 1];
        assert_eq!(accuracy(p.view(), t.view()).unwrap(), 0.75);
    }

    #[test]
    fn accuracy_rejects_mismatched_lengths() {
        let p = array![0, 1];
        let t = array![0];
        assert!(accuracy(p.view(), t.view()).is_err());
    }

    #[test]
    fn accuracy_rejects_empty_inputs() {
        let p = ndarray::Array1::<usize>::zeros(0);
        assert_eq!(accuracy(p.view(), p.view()).unwrap_err(), MlErr::EmptyDataset);
    }

    #[test]
    fn std_is_the_population_one() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }

    #[test]
    fn single_value_has_no_spread() {
        assert_eq!(mean_std(&[80.0]), Some((80.0, 0.0)));
        assert_eq!(mean_std(&[]), None);
    }
}
