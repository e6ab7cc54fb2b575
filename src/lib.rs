//! Logistic regression readout experiments.
//!
//! Feature vectors extracted by some upstream model are stored as `.npy` files, a linear
//! classifier is trained on them and its test accuracy is recorded, either while sweeping over
//! the amount of training samples or repeating the experiment over several trials.

pub mod config;
pub mod experiment;
pub mod loader;
pub mod report;
pub mod tasks;

pub use config::ExperimentConfig;
pub use experiment::{AccuracyRecord, run};
