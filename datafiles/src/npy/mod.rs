//! Reading and writing of NumPy `.npy` array files.
//!
//! Every format version is read; version 1.0 is written. Elements of any supported dtype
//! are cast on read, e.g. into `f32` features or `i64` labels.

mod dtype;
mod header;

use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use log::debug;
use ndarray::{Array1, Array2, ArrayView, Dimension, ShapeBuilder};

pub use dtype::{DType, Endian, FromNpy, Kind, ToNpy, dtype_of};
pub use header::Header;

use crate::{DataErr, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;

/// An array read from an npy file, its elements kept in their stored representation.
#[derive(Debug, Clone)]
pub struct NpyArray {
    header: Header,
    dtype: DType,
    data: Vec<u8>,
}

impl NpyArray {
    /// Reads an array from `r`.
    pub fn read<R: Read>(mut r: R) -> Result<Self> {
        let mut magic = [0u8; MAGIC.len()];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(DataErr::BadMagic);
        }

        let mut version = [0u8; 2];
        r.read_exact(&mut version)?;
        let [major, minor] = version;

        let header_len = match major {
            1 => {
                let mut len = [0u8; 2];
                r.read_exact(&mut len)?;
                u16::from_le_bytes(len) as usize
            }
            2 | 3 => {
                let mut len = [0u8; 4];
                r.read_exact(&mut len)?;
                u32::from_le_bytes(len) as usize
            }
            _ => return Err(DataErr::UnsupportedVersion { major, minor }),
        };

        let mut raw = vec![0u8; header_len];
        r.read_exact(&mut raw)?;

        // Versions 1 and 2 store the header as latin-1, version 3 as utf-8.
        let text = match major {
            3 => String::from_utf8(raw).map_err(|e| DataErr::BadHeader(e.to_string()))?,
            _ => raw.iter().map(|&b| b as char).collect(),
        };

        let header = Header::parse(&text)?;
        let dtype = DType::parse(&header.descr)?;

        let expected = header
            .num_elements()?
            .checked_mul(dtype.size)
            .ok_or_else(|| DataErr::BadHeader(format!("shape {:?} is too large", header.shape)))?;

        // Grows with the bytes actually read, not with the declared shape.
        let mut data = Vec::new();
        r.take(expected as u64).read_to_end(&mut data)?;

        if data.len() != expected {
            return Err(DataErr::TruncatedData {
                got: data.len(),
                expected,
            });
        }

        Ok(Self {
            header,
            dtype,
            data,
        })
    }

    /// Reads the array stored at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let array = Self::read(BufReader::new(File::open(path)?))?;

        debug!(
            "read {}: dtype={} shape={:?}",
            path.display(),
            array.header.descr,
            array.header.shape
        );

        Ok(array)
    }

    pub fn shape(&self) -> &[usize] {
        &self.header.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn is_fortran_order(&self) -> bool {
        self.header.fortran_order
    }

    /// Returns the elements cast into `T`, in the order they are stored.
    pub fn to_vec<T: FromNpy>(&self) -> Vec<T> {
        dtype::decode(self.dtype, &self.data)
    }

    /// Returns the array as a row major matrix, a 1-D array becomes a single column.
    pub fn to_array2<T: FromNpy>(&self) -> Result<Array2<T>> {
        let (rows, cols) = match *self.shape() {
            [n] => (n, 1),
            [rows, cols] => (rows, cols),
            _ => {
                return Err(DataErr::BadShape {
                    expected: "2-D",
                    got: self.shape().to_vec(),
                });
            }
        };

        let values = self.to_vec();
        let array = if self.is_fortran_order() {
            Array2::from_shape_vec((rows, cols).f(), values)?
                .as_standard_layout()
                .into_owned()
        } else {
            Array2::from_shape_vec((rows, cols), values)?
        };

        Ok(array)
    }

    /// Returns the array as a vector, a matrix with a single column is accepted too.
    pub fn to_array1<T: FromNpy>(&self) -> Result<Array1<T>> {
        match *self.shape() {
            [_] | [_, 1] => Ok(Array1::from(self.to_vec())),
            _ => Err(DataErr::BadShape {
                expected: "1-D",
                got: self.shape().to_vec(),
            }),
        }
    }
}

/// Reads a feature matrix as `f32`, whatever its stored dtype.
pub fn read_array2_f32<P: AsRef<Path>>(path: P) -> Result<Array2<f32>> {
    NpyArray::open(path)?.to_array2()
}

/// Reads a label vector as `i64`, whatever its stored dtype.
pub fn read_array1_i64<P: AsRef<Path>>(path: P) -> Result<Array1<i64>> {
    NpyArray::open(path)?.to_array1()
}

/// Writes `array` in npy format version 1.0.
///
/// # Arguments
/// * `w` - The destination.
/// * `array` - The array, in any memory layout, it's always stored in row major order.
pub fn write<W, T, D>(mut w: W, array: ArrayView<T, D>) -> Result<()>
where
    W: Write,
    T: ToNpy,
    D: Dimension,
{
    let header = Header {
        descr: dtype_of::<T>().descr(),
        fortran_order: false,
        shape: array.shape().to_vec(),
    };

    // magic + version + header length + dictionary + newline
    let mut dict = header.to_dict();
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    dict.extend(std::iter::repeat_n(' ', padding));
    dict.push('\n');

    let header_len = u16::try_from(dict.len())
        .map_err(|_| DataErr::BadHeader(format!("header too long: {} bytes", dict.len())))?;

    w.write_all(MAGIC)?;
    w.write_all(&[1, 0])?;
    w.write_all(&header_len.to_le_bytes())?;
    w.write_all(dict.as_bytes())?;

    let values: Cow<[T]> = match array.as_slice() {
        Some(values) => Cow::Borrowed(values),
        None => Cow::Owned(array.iter().copied().collect()),
    };
    w.write_all(bytemuck::cast_slice(&values))?;

    Ok(())
}

/// Writes `array` to the file at `path`, replacing it if it exists.
pub fn save<P, T, D>(path: P, array: ArrayView<T, D>) -> Result<()>
where
    P: AsRef<Path>,
    T: ToNpy,
    D: Dimension,
{
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    write(&mut w, array)?;
    w.flush()?;

    debug!("wrote {}", path.display());
    Ok(())
}
