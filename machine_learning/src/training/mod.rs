mod hyperparams;
mod trainer;

pub use hyperparams::Hyperparams;
pub use trainer::Trainer;
