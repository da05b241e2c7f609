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

use std::{error, fmt};

use clarity_common::util::HexError;

use crate::types::integer::IntegerError;

/// Raised when a value constructor is handed an argument that violates a static invariant.
/// No invalid `Value` can exist, so every bound is enforced here rather than at serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// The integer lies outside the 128-bit range; the second field names the violated bound.
    IntegerOutOfRange(String, &'static str),
    Integer(IntegerError),
    ValueTooLarge,
    TypeSignatureTooDeep,
    InvalidName(&'static str, String),
    InvalidAscii,
    InvalidUtf8,
    DuplicateTupleField(String),
    /// An `expect_*` accessor was called on the wrong variant.
    TypeMismatch(&'static str, String),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConstructionError::IntegerOutOfRange(value, bound) => {
                write!(f, "RangeError: {value} is out of range, bound is {bound}")
            }
            ConstructionError::Integer(e) => write!(f, "{e}"),
            ConstructionError::ValueTooLarge => write!(f, "Value exceeds the maximum size"),
            ConstructionError::TypeSignatureTooDeep => {
                write!(f, "Value exceeds the maximum nesting depth")
            }
            ConstructionError::InvalidName(kind, name) => write!(f, "Invalid {kind}: {name:?}"),
            ConstructionError::InvalidAscii => {
                write!(f, "String contains bytes that are not 7-bit ASCII")
            }
            ConstructionError::InvalidUtf8 => write!(f, "String is not valid UTF-8"),
            ConstructionError::DuplicateTupleField(name) => {
                write!(f, "Duplicate tuple field: {name}")
            }
            ConstructionError::TypeMismatch(expected, found) => {
                write!(f, "Expected {expected}, found {found}")
            }
        }
    }
}

impl error::Error for ConstructionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ConstructionError::Integer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IntegerError> for ConstructionError {
    fn from(err: IntegerError) -> Self {
        ConstructionError::Integer(err)
    }
}

/// Failure while decoding the wire format. Every variant is fatal to the parse that raised it.
#[derive(Debug, PartialEq)]
pub enum SerializationError {
    BadTypePrefix(u8),
    UnexpectedEof { needed: usize, remaining: usize },
    LeftoverBytesInDeserialization,
    DeserializationError(String),
    TypeSignatureTooDeep,
    BadHex(HexError),
    Construction(ConstructionError),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SerializationError::BadTypePrefix(prefix) => {
                write!(f, "Bad type prefix: 0x{prefix:02x}")
            }
            SerializationError::UnexpectedEof { needed, remaining } => write!(
                f,
                "Unexpected end of input: needed {needed} bytes, {remaining} remaining"
            ),
            SerializationError::LeftoverBytesInDeserialization => {
                write!(f, "Deserialization finished but there were leftover bytes")
            }
            SerializationError::DeserializationError(e) => {
                write!(f, "Deserialization error: {e}")
            }
            SerializationError::TypeSignatureTooDeep => {
                write!(f, "Deserialization exceeded the maximum nesting depth")
            }
            SerializationError::BadHex(e) => write!(f, "Bad hex string: {e}"),
            SerializationError::Construction(e) => write!(f, "Invalid value: {e}"),
        }
    }
}

impl error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SerializationError::BadHex(e) => Some(e),
            SerializationError::Construction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HexError> for SerializationError {
    fn from(err: HexError) -> Self {
        SerializationError::BadHex(err)
    }
}

impl From<ConstructionError> for SerializationError {
    fn from(err: ConstructionError) -> Self {
        match err {
            ConstructionError::TypeSignatureTooDeep => SerializationError::TypeSignatureTooDeep,
            e => SerializationError::Construction(e),
        }
    }
}
