use std::{error::Error, fmt, io};

/// The data files module's result type.
pub type Result<T> = std::result::Result<T, DataErr>;

/// Failures reading or writing array and result files.
#[derive(Debug)]
pub enum DataErr {
    Io(io::Error),
    Json(serde_json::Error),
    BadMagic,
    UnsupportedVersion {
        major: u8,
        minor: u8,
    },
    BadHeader(String),
    UnsupportedDtype(String),
    BadShape {
        expected: &'static str,
        got: Vec<usize>,
    },
    TruncatedData {
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for DataErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataErr::Io(e) => write!(f, "io error: {e}"),
            DataErr::Json(e) => write!(f, "json error: {e}"),
            DataErr::BadMagic => write!(f, "not an npy file, the magic string is missing"),
            DataErr::UnsupportedVersion { major, minor } => {
                write!(f, "unsupported npy format version {major}.{minor}")
            }
            DataErr::BadHeader(reason) => write!(f, "malformed npy header: {reason}"),
            DataErr::UnsupportedDtype(descr) => write!(f, "unsupported dtype {descr:?}"),
            DataErr::BadShape { expected, got } => {
                write!(f, "expected a {expected} array, got shape {got:?}")
            }
            DataErr::TruncatedData { got, expected } => {
                write!(f, "truncated array data: got {got} bytes, expected {expected}")
            }
        }
    }
}

impl Error for DataErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataErr::Io(e) => Some(e),
            DataErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DataErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DataErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ndarray::ShapeError> for DataErr {
    fn from(value: ndarray::ShapeError) -> Self {
        Self::BadHeader(value.to_string())
    }
}
