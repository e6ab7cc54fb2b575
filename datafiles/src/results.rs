use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Result;

/// The outcome of a sweep over the amount of training samples.
///
/// `accuracy[i]` was measured training on `points[i]` samples, the labels are the ones of the
/// last evaluated point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    pub predicted_labels: Vec<i64>,
    pub true_labels: Vec<i64>,
    pub accuracy: Vec<f32>,
    pub points: Vec<usize>,
}

impl SweepResults {
    /// Writes the results as pretty printed JSON, replacing the file if it exists.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.flush()?;

        debug!("wrote {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let r = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(r)?)
    }
}
