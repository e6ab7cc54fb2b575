use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    NegativeLabel {
        index: usize,
        label: i64,
    },
    LabelOutOfRange {
        label: usize,
        classes: usize,
    },
    InvalidHyperparams(&'static str),
    InvalidInit(String),
    Shape(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => format!("There's a size mismatch in {what}, got {got} and expected {expected}"),
            MlErr::EmptyDataset => "The dataset has no samples".to_string(),
            MlErr::NegativeLabel { index, label } => {
                format!("Found the negative label {label} at row {index}")
            }
            MlErr::LabelOutOfRange { label, classes } => {
                format!("The label {label} is out of range for a model of {classes} classes")
            }
            MlErr::InvalidHyperparams(reason) => format!("Invalid hyperparameters: {reason}"),
            MlErr::InvalidInit(reason) => {
                format!("Failed to initialize the model's parameters: {reason}")
            }
            MlErr::Shape(reason) => format!("Invalid array shape: {reason}"),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {}

impl From<ndarray::ShapeError> for MlErr {
    fn from(value: ndarray::ShapeError) -> Self {
        Self::Shape(value.to_string())
    }
}
