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

use std::fmt;

use super::{CharType, OptionalData, SequenceData, TupleData, Value};
use crate::representations::ClarityName;

use self::TypeSignature::*;

/// The structural type of a value, as far as it can be read off the value itself.
/// `NoType` stands in for a side that cannot be inferred, such as the payload of `none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    NoType,
    IntType,
    UIntType,
    BoolType,
    PrincipalType,
    BufferType(u32),
    StringASCIIType(u32),
    StringUTF8Type(u32),
    OptionalType(Box<TypeSignature>),
    ResponseType(Box<(TypeSignature, TypeSignature)>),
    ListType(u32, Box<TypeSignature>),
    TupleType(Vec<(ClarityName, TypeSignature)>),
}

fn len_u32(len: usize) -> u32 {
    // constructors cap every length at u32::MAX
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl TypeSignature {
    pub fn type_of(x: &Value) -> TypeSignature {
        match x {
            Value::Principal(_) => PrincipalType,
            Value::Int(_) => IntType,
            Value::UInt(_) => UIntType,
            Value::Bool(_) => BoolType,
            Value::Tuple(v) => TypeSignature::type_of_tuple(v),
            Value::Sequence(SequenceData::Buffer(buff)) => BufferType(len_u32(buff.len())),
            Value::Sequence(SequenceData::String(CharType::ASCII(s))) => {
                StringASCIIType(len_u32(s.as_bytes().len()))
            }
            Value::Sequence(SequenceData::String(CharType::UTF8(s))) => {
                StringUTF8Type(len_u32(s.as_bytes().len()))
            }
            Value::Sequence(SequenceData::List(list)) => {
                let entry = list
                    .items()
                    .first()
                    .map(TypeSignature::type_of)
                    .unwrap_or(NoType);
                ListType(len_u32(list.len()), Box::new(entry))
            }
            Value::Optional(OptionalData { data }) => match data {
                Some(inner) => OptionalType(Box::new(TypeSignature::type_of(inner))),
                None => OptionalType(Box::new(NoType)),
            },
            Value::Response(res) => {
                let inner = TypeSignature::type_of(res.value());
                if res.committed() {
                    ResponseType(Box::new((inner, NoType)))
                } else {
                    ResponseType(Box::new((NoType, inner)))
                }
            }
        }
    }

    fn type_of_tuple(tuple: &TupleData) -> TypeSignature {
        TupleType(
            tuple
                .iter()
                .map(|(name, value)| (name.clone(), TypeSignature::type_of(value)))
                .collect(),
        )
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoType => write!(f, "UnknownType"),
            IntType => write!(f, "int"),
            UIntType => write!(f, "uint"),
            BoolType => write!(f, "bool"),
            PrincipalType => write!(f, "principal"),
            OptionalType(t) => write!(f, "(optional {t})"),
            ResponseType(v) => write!(f, "(response {} {})", v.0, v.1),
            BufferType(len) => write!(f, "(buff {len})"),
            StringASCIIType(len) => write!(f, "(string-ascii {len})"),
            StringUTF8Type(len) => write!(f, "(string-utf8 {len})"),
            ListType(len, entry) => write!(f, "(list {len} {entry})"),
            TupleType(fields) => {
                write!(f, "(tuple")?;
                for (name, t) in fields.iter() {
                    write!(f, " ({name} {t})")?;
                }
                write!(f, ")")
            }
        }
    }
}
