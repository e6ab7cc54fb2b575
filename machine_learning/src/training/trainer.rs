use std::borrow::Cow;

use log::{debug, trace};
use rand::Rng;

use super::Hyperparams;
use crate::{
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    optimization::Optimizer,
};

/// Runs minibatch training of a model with a given optimizer and loss function.
pub struct Trainer<O, L>
where
    O: Optimizer,
    L: LossFn,
{
    optimizer: O,
    loss_fn: L,
    hyper: Hyperparams,
}

impl<O, L> Trainer<O, L>
where
    O: Optimizer,
    L: LossFn,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `optimizer` - Dictates how to update the parameters on each gradient calculation.
    /// * `loss_fn` - Measures the difference between the model's output and the expected one.
    /// * `hyper` - The epochs, batch size and shuffling policy.
    pub fn new(optimizer: O, loss_fn: L, hyper: Hyperparams) -> Self {
        Self {
            optimizer,
            loss_fn,
            hyper,
        }
    }

    /// Trains `model` over `dataset` for the configured amount of epochs.
    ///
    /// Every minibatch clears the gradient, makes a forward and backward pass and takes an
    /// optimization step.
    ///
    /// # Arguments
    /// * `model` - The model to train, its parameters are updated in place.
    /// * `dataset` - The training samples.
    /// * `rng` - Used for shuffling the samples when enabled.
    ///
    /// # Returns
    /// The mean minibatch loss of every epoch.
    pub fn fit<M, R>(
        &mut self,
        model: &mut M,
        dataset: &Dataset,
        rng: &mut R,
    ) -> crate::Result<Vec<f32>>
    where
        M: Model,
        R: Rng,
    {
        let epochs = self.hyper.epochs.get();
        let mut losses = Vec::with_capacity(epochs);
        let mut data = Cow::Borrowed(dataset);

        for epoch in 0..epochs {
            if self.hyper.shuffle {
                data.to_mut().shuffle(rng);
            }

            let mut total_loss = 0.0;
            let mut num_batches = 0;

            for (x, y) in data.batches(self.hyper.batch_size) {
                model.zero_grad();

                let y_pred = model.forward(x)?;
                total_loss += self.loss_fn.loss(y_pred, y)?;
                let d = self.loss_fn.loss_prime(y_pred, y)?;
                num_batches += 1;

                model.backward(d)?;

                let (params, grad) = model.params_and_grad();
                self.optimizer.update_params(params, grad);
            }

            let loss = total_loss / num_batches.max(1) as f32;
            trace!("epoch {epoch}: loss={loss}");
            losses.push(loss);
        }

        debug!(
            "trained on {} samples for {epochs} epochs, final loss {:?}",
            dataset.len(),
            losses.last()
        );

        Ok(losses)
    }
}
