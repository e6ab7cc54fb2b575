pub mod error;
pub mod npy;
pub mod results;

pub use error::{DataErr, Result};
pub use results::SweepResults;
