pub mod arch;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod optimization;
pub mod training;

pub use classifier::{Evaluation, LogReg};
pub use dataset::Dataset;
pub use error::{MlErr, Result};
pub use training::{Hyperparams, Trainer};
