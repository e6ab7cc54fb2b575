use crate::{DataErr, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endian::Little
        } else {
            Endian::Big
        }
    }

    fn symbol(self) -> char {
        match self {
            Endian::Little => '<',
            Endian::Big => '>',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    UInt,
    Float,
}

/// A NumPy scalar type, as described by the `descr` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DType {
    pub kind: Kind,
    pub size: usize,
    pub endian: Endian,
}

impl DType {
    /// Parses a type string such as `<f4`, `|u1` or `>i8`.
    pub fn parse(descr: &str) -> Result<Self> {
        let unsupported = || DataErr::UnsupportedDtype(descr.to_string());

        let mut chars = descr.chars();
        let endian = match chars.next() {
            Some('<') => Endian::Little,
            Some('>') => Endian::Big,
            Some('|' | '=') => Endian::native(),
            _ => return Err(unsupported()),
        };

        let kind = match chars.next() {
            Some('b') => Kind::Bool,
            Some('i') => Kind::Int,
            Some('u') => Kind::UInt,
            Some('f') => Kind::Float,
            _ => return Err(unsupported()),
        };

        let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;

        let valid = match kind {
            Kind::Bool => size == 1,
            Kind::Int | Kind::UInt => matches!(size, 1 | 2 | 4 | 8),
            Kind::Float => matches!(size, 4 | 8),
        };

        if !valid {
            return Err(unsupported());
        }

        Ok(Self { kind, size, endian })
    }

    /// Returns the `descr` string for this type.
    pub fn descr(&self) -> String {
        let code = match self.kind {
            Kind::Bool => 'b',
            Kind::Int => 'i',
            Kind::UInt => 'u',
            Kind::Float => 'f',
        };

        let endian = if self.size == 1 { '|' } else { self.endian.symbol() };
        format!("{endian}{code}{}", self.size)
    }
}

/// A type numpy arrays can be cast into, following `ndarray.astype` semantics.
pub trait FromNpy: Copy {
    fn from_i64(v: i64) -> Self;
    fn from_u64(v: u64) -> Self;
    fn from_f64(v: f64) -> Self;
}

impl FromNpy for f32 {
    fn from_i64(v: i64) -> Self {
        v as f32
    }

    fn from_u64(v: u64) -> Self {
        v as f32
    }

    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl FromNpy for f64 {
    fn from_i64(v: i64) -> Self {
        v as f64
    }

    fn from_u64(v: u64) -> Self {
        v as f64
    }

    fn from_f64(v: f64) -> Self {
        v
    }
}

impl FromNpy for i64 {
    fn from_i64(v: i64) -> Self {
        v
    }

    fn from_u64(v: u64) -> Self {
        v as i64
    }

    /// Truncates toward zero.
    fn from_f64(v: f64) -> Self {
        v as i64
    }
}

/// A type numpy arrays can be written from.
pub trait ToNpy: bytemuck::Pod {
    const KIND: Kind;
}

impl ToNpy for f32 {
    const KIND: Kind = Kind::Float;
}

impl ToNpy for f64 {
    const KIND: Kind = Kind::Float;
}

impl ToNpy for i64 {
    const KIND: Kind = Kind::Int;
}

impl ToNpy for u8 {
    const KIND: Kind = Kind::UInt;
}

/// Returns the native dtype of `T`.
pub fn dtype_of<T: ToNpy>() -> DType {
    DType {
        kind: T::KIND,
        size: size_of::<T>(),
        endian: Endian::native(),
    }
}

macro_rules! decode {
    ($bytes:expr, $endian:expr, $ty:ty, $conv:expr) => {{
        const N: usize = size_of::<$ty>();
        $bytes
            .chunks_exact(N)
            .map(|chunk| {
                let mut raw = [0u8; N];
                raw.copy_from_slice(chunk);
                let v = match $endian {
                    Endian::Little => <$ty>::from_le_bytes(raw),
                    Endian::Big => <$ty>::from_be_bytes(raw),
                };
                ($conv)(v)
            })
            .collect()
    }};
}

/// Decodes raw array bytes of type `dtype` casting every element into `T`.
///
/// # Arguments
/// * `dtype` - The type of the stored elements.
/// * `bytes` - Exactly the bytes of the array data.
pub fn decode<T: FromNpy>(dtype: DType, bytes: &[u8]) -> Vec<T> {
    let e = dtype.endian;

    match (dtype.kind, dtype.size) {
        (Kind::Bool, _) => bytes.iter().map(|&b| T::from_u64((b != 0) as u64)).collect(),
        (Kind::UInt, 1) => bytes.iter().map(|&b| T::from_u64(b as u64)).collect(),
        (Kind::Int, 1) => bytes.iter().map(|&b| T::from_i64(b as i8 as i64)).collect(),
        (Kind::UInt, 2) => decode!(bytes, e, u16, |v: u16| T::from_u64(v as u64)),
        (Kind::Int, 2) => decode!(bytes, e, i16, |v: i16| T::from_i64(v as i64)),
        (Kind::UInt, 4) => decode!(bytes, e, u32, |v: u32| T::from_u64(v as u64)),
        (Kind::Int, 4) => decode!(bytes, e, i32, |v: i32| T::from_i64(v as i64)),
        (Kind::UInt, _) => decode!(bytes, e, u64, T::from_u64),
        (Kind::Int, _) => decode!(bytes, e, i64, T::from_i64),
        (Kind::Float, 4) => decode!(bytes, e, f32, |v: f32| T::from_f64(v as f64)),
        (Kind::Float, _) => decode!(bytes, e, f64, T::from_f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_strings() {
        assert_eq!(
            DType::parse("<f4").unwrap(),
            DType {
                kind: Kind::Float,
                size: 4,
                endian: Endian::Little
            }
        );
        assert_eq!(DType::parse(">i8").unwrap().endian, Endian::Big);
        assert_eq!(DType::parse("|b1").unwrap().kind, Kind::Bool);
    }

    #[test]
    fn rejects_unsupported_types() {
        for descr in ["<f2", "<c8", "<U10", "O", "<i3", ""] {
            assert!(DType::parse(descr).is_err(), "{descr}");
        }
    }

    #[test]
    fn single_byte_types_have_no_byte_order() {
        assert_eq!(dtype_of::<u8>().descr(), "|u1");
    }

    #[test]
    fn decodes_big_endian_integers() {
        let dtype = DType::parse(">i2").unwrap();
        let values: Vec<i64> = decode(dtype, &[0x01, 0x00, 0xff, 0xfe]);
        assert_eq!(values, [256, -2]);
    }

    #[test]
    fn floats_cast_to_integers_truncate() {
        let dtype = DType::parse("<f8").unwrap();
        let bytes: Vec<u8> = [2.9f64, -1.5]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();

        let values: Vec<i64> = decode(dtype, &bytes);
        assert_eq!(values, [2, -1]);
    }

    #[test]
    fn booleans_cast_to_ones_and_zeros() {
        let dtype = DType::parse("|b1").unwrap();
        let values: Vec<f32> = decode(dtype, &[1, 0, 1]);
        assert_eq!(values, [1.0, 0.0, 1.0]);
    }
}
