// Copyright (C) 2013-2020 Blockstack PBC, a public benefit corporation
// Copyright (C) 2020 Stacks Open Internet Foundation
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Normalization of loosely-typed numeric input into the 128-bit integer variants.

use std::{error, fmt};

use clarity_common::util::hash::hex_bytes;
use num_bigint::BigInt;

use crate::errors::ConstructionError;
use crate::types::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerError {
    /// A float with a fractional part.
    NotAnInteger(String),
    /// Non-finite or unparsable input.
    RangeError(String),
}

impl fmt::Display for IntegerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegerError::NotAnInteger(v) => write!(f, "NotAnInteger: {v} is not an integer"),
            IntegerError::RangeError(msg) => write!(f, "RangeError: {msg}"),
        }
    }
}

impl error::Error for IntegerError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// Every shape of input accepted when building an `Int` or `UInt`.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegerInput {
    Int(i128),
    UInt(u128),
    Float(f64),
    /// Decimal, or hex when prefixed with `0x` (case-insensitive).
    Str(String),
    Big(BigInt),
    /// Big-endian bytes, two's complement when read as signed.
    Bytes(Vec<u8>),
}

macro_rules! impl_integer_input_from {
    ($variant:ident, $inner:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for IntegerInput {
                fn from(v: $ty) -> Self {
                    IntegerInput::$variant(<$inner>::from(v))
                }
            }
        )+
    };
}

impl_integer_input_from!(Int, i128, i8, i16, i32, i64, i128);
impl_integer_input_from!(UInt, u128, u8, u16, u32, u64, u128);
impl_integer_input_from!(Float, f64, f32, f64);
impl_integer_input_from!(Str, String, &str, String);
impl_integer_input_from!(Big, BigInt, BigInt);
impl_integer_input_from!(Bytes, Vec<u8>, &[u8], Vec<u8>);

fn bytes_to_big_int(bytes: &[u8], signed: bool) -> BigInt {
    if signed {
        BigInt::from_signed_bytes_be(bytes)
    } else {
        BigInt::from_bytes_be(num_bigint::Sign::Plus, bytes)
    }
}

fn parse_hex(digits: &str, signed: bool) -> Result<BigInt, IntegerError> {
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let bytes = hex_bytes(&padded)
        .map_err(|e| IntegerError::RangeError(format!("invalid hex integer 0x{digits}: {e}")))?;
    Ok(bytes_to_big_int(&bytes, signed))
}

fn parse_decimal(s: &str) -> Result<BigInt, IntegerError> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntegerError::RangeError(format!(
            "string integer {s:?} is not finite"
        )));
    }
    s.parse::<BigInt>()
        .map_err(|e| IntegerError::RangeError(format!("string integer {s:?}: {e}")))
}

/// Convert `input` to an arbitrary-precision integer. `signed` selects two's-complement
/// interpretation for byte and hex input; it has no effect on the other variants.
pub fn to_big_int(input: &IntegerInput, signed: bool) -> Result<BigInt, IntegerError> {
    match input {
        IntegerInput::Int(v) => Ok(BigInt::from(*v)),
        IntegerInput::UInt(v) => Ok(BigInt::from(*v)),
        IntegerInput::Big(v) => Ok(v.clone()),
        IntegerInput::Bytes(bytes) => Ok(bytes_to_big_int(bytes, signed)),
        IntegerInput::Float(f) => {
            if !f.is_finite() {
                return Err(IntegerError::RangeError(format!("{f} is not finite")));
            }
            if f.fract() != 0.0 {
                return Err(IntegerError::NotAnInteger(f.to_string()));
            }
            parse_decimal(&format!("{f:.0}"))
        }
        IntegerInput::Str(s) => match s.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("0x") => parse_hex(&s[2..], signed),
            _ => parse_decimal(s),
        },
    }
}

impl Value {
    pub fn int_from<T: Into<IntegerInput>>(input: T) -> Result<Value, ConstructionError> {
        let n = to_big_int(&input.into(), true)?;
        if n > BigInt::from(i128::MAX) {
            return Err(ConstructionError::IntegerOutOfRange(
                n.to_string(),
                "maximum 2^127 - 1",
            ));
        }
        if n < BigInt::from(i128::MIN) {
            return Err(ConstructionError::IntegerOutOfRange(
                n.to_string(),
                "minimum -2^127",
            ));
        }
        i128::try_from(&n)
            .map(Value::Int)
            .map_err(|_| ConstructionError::IntegerOutOfRange(n.to_string(), "minimum -2^127"))
    }

    pub fn uint_from<T: Into<IntegerInput>>(input: T) -> Result<Value, ConstructionError> {
        let n = to_big_int(&input.into(), false)?;
        if n > BigInt::from(u128::MAX) {
            return Err(ConstructionError::IntegerOutOfRange(
                n.to_string(),
                "maximum 2^128 - 1",
            ));
        }
        u128::try_from(&n)
            .map(Value::UInt)
            .map_err(|_| ConstructionError::IntegerOutOfRange(n.to_string(), "minimum 0"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0xa")]
    #[case("0x0a")]
    #[case("0x00a")]
    #[case("0XA")]
    #[case("10")]
    #[case("+10")]
    fn normalizes_to_ten(#[case] input: &str) {
        assert_eq!(to_big_int(&input.into(), true).unwrap(), BigInt::from(10));
        assert_eq!(to_big_int(&input.into(), false).unwrap(), BigInt::from(10));
    }

    #[test]
    fn signed_bytes_are_twos_complement() {
        assert_eq!(
            to_big_int(&vec![0xf6u8].into(), true).unwrap(),
            BigInt::from(-10)
        );
        assert_eq!(
            to_big_int(&vec![0xf8u8].into(), true).unwrap(),
            BigInt::from(-8)
        );
        assert_eq!(
            to_big_int(&vec![0xf6u8].into(), false).unwrap(),
            BigInt::from(246)
        );
        assert_eq!(to_big_int(&"0xff".into(), true).unwrap(), BigInt::from(-1));
        assert_eq!(to_big_int(&"0xff".into(), false).unwrap(), BigInt::from(255));
        assert_eq!(to_big_int(&"0x".into(), true).unwrap(), BigInt::from(0));
    }

    #[test]
    fn floats_must_be_integral_and_finite() {
        assert_eq!(to_big_int(&(-3.0f64).into(), true).unwrap(), BigInt::from(-3));
        assert!(matches!(
            to_big_int(&1.5f64.into(), true),
            Err(IntegerError::NotAnInteger(_))
        ));
        assert!(matches!(
            to_big_int(&f64::NAN.into(), true),
            Err(IntegerError::RangeError(_))
        ));
        assert!(matches!(
            to_big_int(&f64::INFINITY.into(), true),
            Err(IntegerError::RangeError(_))
        ));
    }

    #[rstest]
    #[case("")]
    #[case("1.5")]
    #[case("1e3")]
    #[case(" 1")]
    #[case("1_000")]
    #[case("-")]
    #[case("0xzz")]
    #[case("\u{e9}1")]
    fn rejects_unparsable_strings(#[case] input: &str) {
        assert!(matches!(
            to_big_int(&input.into(), true),
            Err(IntegerError::RangeError(_))
        ));
    }

    #[test]
    fn int_bounds() {
        let max = BigInt::from(i128::MAX);
        let min = BigInt::from(i128::MIN);
        assert_eq!(Value::int_from(max.clone()).unwrap(), Value::Int(i128::MAX));
        assert_eq!(Value::int_from(min.clone()).unwrap(), Value::Int(i128::MIN));
        assert_eq!(
            Value::int_from(&max + 1u8),
            Err(ConstructionError::IntegerOutOfRange(
                (&max + 1u8).to_string(),
                "maximum 2^127 - 1"
            ))
        );
        assert_eq!(
            Value::int_from(&min - 1u8),
            Err(ConstructionError::IntegerOutOfRange(
                (&min - 1u8).to_string(),
                "minimum -2^127"
            ))
        );
    }

    #[test]
    fn uint_bounds() {
        let max = BigInt::from(u128::MAX);
        assert_eq!(Value::uint_from(0u8).unwrap(), Value::UInt(0));
        assert_eq!(Value::uint_from(max.clone()).unwrap(), Value::UInt(u128::MAX));
        assert!(matches!(
            Value::uint_from(-1i32),
            Err(ConstructionError::IntegerOutOfRange(_, "minimum 0"))
        ));
        assert!(matches!(
            Value::uint_from(&max + 1u8),
            Err(ConstructionError::IntegerOutOfRange(_, "maximum 2^128 - 1"))
        ));
    }

    #[test]
    fn constructor_surfaces_normalizer_errors() {
        assert_eq!(
            Value::int_from(0.5f64),
            Err(ConstructionError::Integer(IntegerError::NotAnInteger(
                "0.5".into()
            )))
        );
        assert_eq!(Value::uint_from("0x0100").unwrap(), Value::UInt(256));
        assert_eq!(Value::int_from("-42").unwrap(), Value::Int(-42));
    }
}
