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

//! Human-readable and JSON renderings of a value.

use std::fmt;

use clarity_common::util::hash::to_hex;
use serde_json::{json, Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use crate::types::signatures::TypeSignature;
use crate::types::{CharType, SequenceData, Value};

/// How buffers are written in the s-expression rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferEncoding {
    /// Always `0x<hex>`.
    #[default]
    Hex,
    /// A quoted string when every byte is printable ASCII, `0x<hex>` otherwise.
    TryAscii,
}

fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (0x20..=0x7e).contains(b))
}

pub(crate) fn write_repr<W: fmt::Write>(
    f: &mut W,
    value: &Value,
    encoding: BufferEncoding,
) -> fmt::Result {
    match value {
        Value::Int(int) => write!(f, "{int}"),
        Value::UInt(int) => write!(f, "u{int}"),
        Value::Bool(boolean) => write!(f, "{boolean}"),
        Value::Principal(principal_data) => write!(f, "{principal_data}"),
        Value::Sequence(SequenceData::Buffer(buff)) => {
            if encoding == BufferEncoding::TryAscii && is_printable_ascii(buff.as_slice()) {
                write!(f, "\"")?;
                for b in buff.as_slice() {
                    write!(f, "{}", std::ascii::escape_default(*b))?;
                }
                write!(f, "\"")
            } else {
                write!(f, "0x{buff}")
            }
        }
        Value::Sequence(SequenceData::String(string)) => write!(f, "{string}"),
        Value::Optional(opt) => match opt.value() {
            Some(inner) => {
                write!(f, "(some ")?;
                write_repr(f, inner, encoding)?;
                write!(f, ")")
            }
            None => write!(f, "none"),
        },
        Value::Response(res) => {
            write!(f, "({} ", if res.committed() { "ok" } else { "err" })?;
            write_repr(f, res.value(), encoding)?;
            write!(f, ")")
        }
        Value::Sequence(SequenceData::List(list)) => {
            write!(f, "(list")?;
            for item in list.items() {
                write!(f, " ")?;
                write_repr(f, item, encoding)?;
            }
            write!(f, ")")
        }
        Value::Tuple(tuple) => {
            write!(f, "(tuple")?;
            for (name, item) in tuple.iter() {
                write!(f, " ({name} ")?;
                write_repr(f, item, encoding)?;
                write!(f, ")")?;
            }
            write!(f, ")")
        }
    }
}

/// `Display` for a value under a chosen buffer encoding.
pub struct ValueRepr<'a> {
    value: &'a Value,
    encoding: BufferEncoding,
}

impl fmt::Display for ValueRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_repr(f, self.value, self.encoding)
    }
}

impl Value {
    pub fn repr(&self, encoding: BufferEncoding) -> ValueRepr<'_> {
        ValueRepr {
            value: self,
            encoding,
        }
    }
}

/// Render `value` as a Clarity s-expression. Tuple fields appear in the order they were supplied.
pub fn cv_to_string(value: &Value, encoding: BufferEncoding) -> String {
    value.repr(encoding).to_string()
}

/// The structural type descriptor of `value`, e.g. `(list 2 int)`.
pub fn type_string(value: &Value) -> String {
    TypeSignature::type_of(value).to_string()
}

fn integer_to_json(decimal: String, strict_json_compat: bool) -> JsonValue {
    if strict_json_compat {
        return JsonValue::String(decimal);
    }
    match serde_json::from_str::<JsonNumber>(&decimal) {
        Ok(n) => JsonValue::Number(n),
        Err(_) => JsonValue::String(decimal),
    }
}

/// The bare JSON value of `value`. With `strict_json_compat`, integers become decimal
/// strings so that no consumer can silently round values above 2^53.
pub fn cv_to_value(value: &Value, strict_json_compat: bool) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => integer_to_json(i.to_string(), strict_json_compat),
        Value::UInt(u) => integer_to_json(u.to_string(), strict_json_compat),
        Value::Sequence(SequenceData::Buffer(buff)) => {
            JsonValue::String(format!("0x{}", to_hex(buff.as_slice())))
        }
        Value::Optional(opt) => match opt.value() {
            Some(inner) => cv_to_json(inner, strict_json_compat),
            None => JsonValue::Null,
        },
        Value::Response(res) => cv_to_json(res.value(), strict_json_compat),
        Value::Principal(p) => JsonValue::String(p.to_string()),
        Value::Sequence(SequenceData::List(list)) => JsonValue::Array(
            list.items()
                .iter()
                .map(|item| cv_to_json(item, strict_json_compat))
                .collect(),
        ),
        Value::Tuple(tuple) => {
            let mut map = JsonMap::new();
            for (name, item) in tuple.iter() {
                map.insert(name.to_string(), cv_to_json(item, strict_json_compat));
            }
            JsonValue::Object(map)
        }
        Value::Sequence(SequenceData::String(CharType::ASCII(s))) => {
            JsonValue::String(s.as_str().to_string())
        }
        Value::Sequence(SequenceData::String(CharType::UTF8(s))) => {
            JsonValue::String(s.as_str().to_string())
        }
    }
}

/// The typed JSON envelope `{type, value}`; responses also carry `success`.
pub fn cv_to_json(value: &Value, strict_json_compat: bool) -> JsonValue {
    let type_str = type_string(value);
    match value {
        Value::Response(res) => json!({
            "type": type_str,
            "value": cv_to_json(res.value(), strict_json_compat),
            "success": res.committed(),
        }),
        _ => json!({
            "type": type_str,
            "value": cv_to_value(value, strict_json_compat),
        }),
    }
}
