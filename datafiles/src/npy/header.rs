use std::{iter::Peekable, str::Chars};

use crate::{DataErr, Result};

/// The metadata stored in front of every npy array.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl Header {
    /// Parses the Python dictionary literal of an npy header, e.g.
    /// `{'descr': '<f4', 'fortran_order': False, 'shape': (3, 4), }`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser {
            chars: text.chars().peekable(),
        };

        let mut descr = None;
        let mut fortran_order = None;
        let mut shape = None;

        parser.expect('{')?;
        loop {
            if parser.eat('}') {
                break;
            }

            let key = parser.string()?;
            parser.expect(':')?;

            match key.as_str() {
                "descr" => descr = Some(parser.descr()?),
                "fortran_order" => fortran_order = Some(parser.boolean()?),
                "shape" => shape = Some(parser.tuple()?),
                other => return Err(bad_header(format!("unknown key {other:?}"))),
            }

            if !parser.eat(',') {
                parser.expect('}')?;
                break;
            }
        }

        Ok(Self {
            descr: descr.ok_or_else(|| bad_header("missing 'descr'"))?,
            fortran_order: fortran_order.ok_or_else(|| bad_header("missing 'fortran_order'"))?,
            shape: shape.ok_or_else(|| bad_header("missing 'shape'"))?,
        })
    }

    /// Formats the header as a Python dictionary literal, without padding.
    pub fn to_dict(&self) -> String {
        let shape = match self.shape.as_slice() {
            [n] => format!("({n},)"),
            dims => {
                let dims: Vec<_> = dims.iter().map(|d| d.to_string()).collect();
                format!("({})", dims.join(", "))
            }
        };

        let order = if self.fortran_order { "True" } else { "False" };
        format!(
            "{{'descr': '{}', 'fortran_order': {order}, 'shape': {shape}, }}",
            self.descr
        )
    }

    /// Returns the amount of elements described by the shape, or an error if it doesn't fit in
    /// a `usize`.
    pub fn num_elements(&self) -> Result<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |n, &dim| n.checked_mul(dim))
            .ok_or_else(|| bad_header(format!("shape {:?} is too large", self.shape)))
    }
}

fn bad_header(reason: impl Into<String>) -> DataErr {
    DataErr::BadHeader(reason.into())
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        self.chars.next_if_eq(&c).is_some()
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            return Ok(());
        }

        let found = self.chars.peek().copied();
        Err(bad_header(format!("expected {c:?}, found {found:?}")))
    }

    fn string(&mut self) -> Result<String> {
        self.skip_ws();
        let quote = match self.chars.next() {
            Some(q @ ('\'' | '"')) => q,
            other => return Err(bad_header(format!("expected a string, found {other:?}"))),
        };

        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(s),
                Some(c) => s.push(c),
                None => return Err(bad_header("unterminated string")),
            }
        }
    }

    fn descr(&mut self) -> Result<String> {
        self.skip_ws();
        match self.chars.peek() {
            Some('[') => Err(DataErr::UnsupportedDtype("structured dtype".into())),
            _ => self.string(),
        }
    }

    fn boolean(&mut self) -> Result<bool> {
        self.skip_ws();
        let word: String = std::iter::from_fn(|| self.chars.next_if(|c| c.is_alphabetic())).collect();

        match word.as_str() {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(bad_header(format!("expected a boolean, found {other:?}"))),
        }
    }

    fn integer(&mut self) -> Result<usize> {
        self.skip_ws();
        let digits: String =
            std::iter::from_fn(|| self.chars.next_if(|c| c.is_ascii_digit())).collect();

        // Python 2 era headers may write dimensions as long integers, e.g. `3L`.
        self.chars.next_if_eq(&'L');

        digits
            .parse()
            .map_err(|_| bad_header(format!("expected a dimension, found {digits:?}")))
    }

    fn tuple(&mut self) -> Result<Vec<usize>> {
        self.expect('(')?;

        let mut dims = Vec::new();
        loop {
            if self.eat(')') {
                return Ok(dims);
            }

            dims.push(self.integer()?);

            if !self.eat(',') {
                self.expect(')')?;
                return Ok(dims);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_numpy_header() {
        let header =
            Header::parse("{'descr': '<f4', 'fortran_order': False, 'shape': (3, 4), }    \n")
                .unwrap();

        assert_eq!(
            header,
            Header {
                descr: "<f4".into(),
                fortran_order: false,
                shape: vec![3, 4],
            }
        );
        assert_eq!(header.num_elements().unwrap(), 12);
    }

    #[test]
    fn parses_one_and_zero_dimensional_shapes() {
        let one = Header::parse("{'descr': '<i8', 'fortran_order': True, 'shape': (5,)}").unwrap();
        let zero = Header::parse("{'shape': (), 'descr': '|u1', 'fortran_order': False}").unwrap();

        assert_eq!(one.shape, [5]);
        assert!(one.fortran_order);
        assert!(zero.shape.is_empty());
        assert_eq!(zero.num_elements().unwrap(), 1);
    }

    #[test]
    fn overflowing_shapes_are_rejected() {
        let header = Header::parse(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (4294967296, 4294967296), }",
        )
        .unwrap();
        assert!(matches!(header.num_elements(), Err(DataErr::BadHeader(_))));
    }

    #[test]
    fn accepts_python2_long_dimensions() {
        let header =
            Header::parse("{'descr': '<f8', 'fortran_order': False, 'shape': (2L, 3L), }").unwrap();
        assert_eq!(header.shape, [2, 3]);
    }

    #[test]
    fn missing_keys_fail() {
        assert!(Header::parse("{'descr': '<f4', 'shape': (3,), }").is_err());
    }

    #[test]
    fn structured_dtypes_are_unsupported() {
        let err = Header::parse("{'descr': [('a', '<f4')], 'fortran_order': False, 'shape': (1,)}")
            .unwrap_err();
        assert!(matches!(err, DataErr::UnsupportedDtype(_)));
    }

    #[test]
    fn formatted_header_parses_back() {
        let header = Header {
            descr: "<i8".into(),
            fortran_order: false,
            shape: vec![7],
        };

        assert_eq!(header.to_dict(), "{'descr': '<i8', 'fortran_order': False, 'shape': (7,), }");
        assert_eq!(Header::parse(&header.to_dict()).unwrap(), header);
    }
}
