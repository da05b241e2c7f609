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

use std::hash::{Hash, Hasher};
use std::io::Write;

use clarity_common::util::hash::{hex_bytes_prefixed, to_hex};

use super::{
    ASCIIData, BuffData, CharType, ListData, OptionalData, PrincipalData,
    QualifiedContractIdentifier, ResponseData, SequenceData, StandardPrincipalData, TupleData,
    UTF8Data, Value, BUFF_MAX_LEN,
};
use crate::codec::{BytesReader, Endianness};
use crate::config::CodecConfig;
use crate::errors::SerializationError;
use crate::representations::{ClarityName, ContractName};

define_u8_enum!(
/// The leading byte of every serialized value. Tags are never reused or reordered.
TypePrefix {
    Int = 0,
    UInt = 1,
    Buffer = 2,
    BoolTrue = 3,
    BoolFalse = 4,
    PrincipalStandard = 5,
    PrincipalContract = 6,
    ResponseOk = 7,
    ResponseErr = 8,
    OptionalNone = 9,
    OptionalSome = 10,
    List = 11,
    Tuple = 12,
    StringASCII = 13,
    StringUTF8 = 14
});

impl From<&PrincipalData> for TypePrefix {
    fn from(v: &PrincipalData) -> TypePrefix {
        match v {
            PrincipalData::Standard(_) => TypePrefix::PrincipalStandard,
            PrincipalData::Contract(_) => TypePrefix::PrincipalContract,
        }
    }
}

impl From<&Value> for TypePrefix {
    fn from(v: &Value) -> TypePrefix {
        use super::CharType::*;
        use super::SequenceData::*;

        match v {
            Value::Int(_) => TypePrefix::Int,
            Value::UInt(_) => TypePrefix::UInt,
            Value::Sequence(Buffer(_)) => TypePrefix::Buffer,
            Value::Bool(value) => {
                if *value {
                    TypePrefix::BoolTrue
                } else {
                    TypePrefix::BoolFalse
                }
            }
            Value::Principal(p) => TypePrefix::from(p),
            Value::Response(response) => {
                if response.committed {
                    TypePrefix::ResponseOk
                } else {
                    TypePrefix::ResponseErr
                }
            }
            Value::Optional(OptionalData { data: None }) => TypePrefix::OptionalNone,
            Value::Optional(OptionalData { data: Some(_) }) => TypePrefix::OptionalSome,
            Value::Sequence(List(_)) => TypePrefix::List,
            Value::Tuple(_) => TypePrefix::Tuple,
            Value::Sequence(String(UTF8(_))) => TypePrefix::StringUTF8,
            Value::Sequence(String(ASCII(_))) => TypePrefix::StringASCII,
        }
    }
}

// Counts are bounded by the constructors, which reject anything longer than u32::MAX.
fn write_len_prefix(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u32).to_be_bytes());
}

impl StandardPrincipalData {
    fn serialize_into(&self, out: &mut Vec<u8>) {
        out.push(self.0);
        out.extend_from_slice(&self.1);
    }

    fn deserialize_read(r: &mut BytesReader<'_>) -> Result<Self, SerializationError> {
        let version = r.read_u8()?;
        let data = r.read_array::<20>()?;
        Ok(StandardPrincipalData(version, data))
    }
}

fn read_contract_name(r: &mut BytesReader<'_>) -> Result<ContractName, SerializationError> {
    let len = r.read_u8()?;
    let bytes = r.read_bytes(len as usize)?;
    let name = std::str::from_utf8(bytes).map_err(|_| {
        SerializationError::DeserializationError("Failed to parse contract name as UTF-8".into())
    })?;
    Ok(ContractName::try_from(name)?)
}

fn read_clarity_name(
    r: &mut BytesReader<'_>,
    config: &CodecConfig,
) -> Result<ClarityName, SerializationError> {
    let len = r.read_u8()?;
    let bytes = r.read_bytes(len as usize)?;
    let name = std::str::from_utf8(bytes).map_err(|_| {
        SerializationError::DeserializationError("Failed to parse tuple key as UTF-8".into())
    })?;
    Ok(ClarityName::try_from_policy(
        name.to_string(),
        config.name_policy,
    )?)
}

impl Value {
    /// Append the canonical encoding of `self` to `out`.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        use super::CharType::*;
        use super::PrincipalData::*;
        use super::SequenceData::{self, *};

        out.push(TypePrefix::from(self).to_u8());
        match self {
            Value::Int(value) => out.extend_from_slice(&value.to_be_bytes()),
            Value::UInt(value) => out.extend_from_slice(&value.to_be_bytes()),
            Value::Principal(Standard(data)) => data.serialize_into(out),
            Value::Principal(Contract(contract_identifier)) => {
                contract_identifier.issuer.serialize_into(out);
                out.push(contract_identifier.name.len());
                out.extend_from_slice(contract_identifier.name.as_bytes());
            }
            Value::Response(response) => response.data.serialize_into(out),
            // Bool and none are fully described by their prefix
            Value::Bool(_) | Value::Optional(OptionalData { data: None }) => {}
            Value::Optional(OptionalData { data: Some(value) }) => value.serialize_into(out),
            Value::Sequence(List(ListData { data })) => {
                write_len_prefix(out, data.len());
                for item in data.iter() {
                    item.serialize_into(out);
                }
            }
            Value::Sequence(Buffer(BuffData { data })) => {
                write_len_prefix(out, data.len());
                out.extend_from_slice(data);
            }
            Value::Sequence(SequenceData::String(UTF8(UTF8Data { data }))) => {
                write_len_prefix(out, data.len());
                out.extend_from_slice(data.as_bytes());
            }
            Value::Sequence(SequenceData::String(ASCII(ASCIIData { data }))) => {
                write_len_prefix(out, data.len());
                out.extend_from_slice(data);
            }
            Value::Tuple(data) => {
                write_len_prefix(out, data.data_map.len());
                // BTreeMap iteration is byte-wise key order, which is the canonical order
                for (key, value) in data.data_map.iter() {
                    out.push(key.len());
                    out.extend_from_slice(key.as_bytes());
                    value.serialize_into(out);
                }
            }
        }
    }

    pub fn serialize_to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        self.serialize_into(&mut out);
        out
    }

    pub fn serialize_to_hex(&self) -> String {
        to_hex(&self.serialize_to_vec())
    }

    pub fn serialize_write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.serialize_to_vec())
    }

    /// Byte length of the canonical encoding, computed without encoding.
    pub fn serialized_size(&self) -> usize {
        use super::SequenceData::*;

        1 + match self {
            Value::Int(_) | Value::UInt(_) => 16,
            Value::Bool(_) | Value::Optional(OptionalData { data: None }) => 0,
            Value::Principal(PrincipalData::Standard(_)) => 21,
            Value::Principal(PrincipalData::Contract(QualifiedContractIdentifier {
                name, ..
            })) => 21 + 1 + name.as_bytes().len(),
            Value::Optional(OptionalData { data: Some(value) }) => value.serialized_size(),
            Value::Response(ResponseData { data, .. }) => data.serialized_size(),
            Value::Sequence(Buffer(buff)) => 4 + buff.data.len(),
            Value::Sequence(String(CharType::ASCII(s))) => 4 + s.data.len(),
            Value::Sequence(String(CharType::UTF8(s))) => 4 + s.data.len(),
            Value::Sequence(List(list)) => {
                4 + list.data.iter().map(Value::serialized_size).sum::<usize>()
            }
            Value::Tuple(tuple) => {
                4 + tuple
                    .data_map
                    .iter()
                    .map(|(k, v)| 1 + k.as_bytes().len() + v.serialized_size())
                    .sum::<usize>()
            }
        }
    }

    /// Decode one value from `r` using the default configuration. Bytes after the value are left unread.
    pub fn deserialize_read(r: &mut BytesReader<'_>) -> Result<Value, SerializationError> {
        Value::deserialize_read_with(r, &CodecConfig::default())
    }

    pub fn deserialize_read_with(
        r: &mut BytesReader<'_>,
        config: &CodecConfig,
    ) -> Result<Value, SerializationError> {
        Value::inner_deserialize_read(r, 0, config)
    }

    fn inner_deserialize_read(
        r: &mut BytesReader<'_>,
        depth: u8,
        config: &CodecConfig,
    ) -> Result<Value, SerializationError> {
        use super::PrincipalData::*;

        if depth >= config.max_depth {
            return Err(SerializationError::TypeSignatureTooDeep);
        }

        let header = r.read_u8()?;
        let prefix = TypePrefix::from_u8(header).ok_or(SerializationError::BadTypePrefix(header))?;

        match prefix {
            TypePrefix::Int => Ok(Value::Int(i128::from_be_bytes(r.read_array()?))),
            TypePrefix::UInt => {
                let value = r.read_big_uint(16, Endianness::Big)?;
                // sixteen bytes always fit
                let value = u128::try_from(&value).map_err(|_| {
                    SerializationError::DeserializationError("Bad uint payload".into())
                })?;
                Ok(Value::UInt(value))
            }
            TypePrefix::Buffer => {
                let len = r.read_u32_be()?;
                if len > BUFF_MAX_LEN {
                    return Err(SerializationError::DeserializationError(format!(
                        "Buffer length {len} exceeds maximum of {BUFF_MAX_LEN}"
                    )));
                }
                let data = r.read_bytes(len as usize)?;
                Ok(Value::buff_from(data.to_vec())?)
            }
            TypePrefix::BoolTrue => Ok(Value::Bool(true)),
            TypePrefix::BoolFalse => Ok(Value::Bool(false)),
            TypePrefix::PrincipalStandard => {
                StandardPrincipalData::deserialize_read(r).map(Value::from)
            }
            TypePrefix::PrincipalContract => {
                let issuer = StandardPrincipalData::deserialize_read(r)?;
                let name = read_contract_name(r)?;
                Ok(Value::Principal(Contract(QualifiedContractIdentifier {
                    issuer,
                    name,
                })))
            }
            TypePrefix::ResponseOk | TypePrefix::ResponseErr => {
                let data = Value::inner_deserialize_read(r, depth + 1, config)?;
                if prefix == TypePrefix::ResponseOk {
                    Ok(Value::okay(data)?)
                } else {
                    Ok(Value::error(data)?)
                }
            }
            TypePrefix::OptionalNone => Ok(Value::none()),
            TypePrefix::OptionalSome => {
                let data = Value::inner_deserialize_read(r, depth + 1, config)?;
                Ok(Value::some(data)?)
            }
            TypePrefix::List => {
                let len = r.read_u32_be()? as usize;
                // every element takes at least its prefix byte
                if len > r.remaining() {
                    return Err(SerializationError::DeserializationError(format!(
                        "List length {len} exceeds remaining input of {} bytes",
                        r.remaining()
                    )));
                }
                let mut items = Vec::with_capacity(len);
                for _i in 0..len {
                    items.push(Value::inner_deserialize_read(r, depth + 1, config)?);
                }
                Ok(Value::cons_list(items)?)
            }
            TypePrefix::Tuple => {
                let len = r.read_u32_be()? as usize;
                // every field takes at least a key length byte and a value prefix byte
                if len.saturating_mul(2) > r.remaining() {
                    return Err(SerializationError::DeserializationError(format!(
                        "Tuple field count {len} exceeds remaining input of {} bytes",
                        r.remaining()
                    )));
                }
                let mut items = Vec::with_capacity(len);
                for _i in 0..len {
                    let key = read_clarity_name(r, config)?;
                    let value = Value::inner_deserialize_read(r, depth + 1, config)?;
                    items.push((key, value));
                }
                Ok(Value::Tuple(TupleData::from_data(items)?.into_sorted()))
            }
            TypePrefix::StringASCII => {
                let len = r.read_u32_be()?;
                let data = r.read_bytes(len as usize)?;
                Ok(Value::string_ascii_from_bytes(data.to_vec())?)
            }
            TypePrefix::StringUTF8 => {
                let len = r.read_u32_be()?;
                let data = r.read_bytes(len as usize)?;
                Ok(Value::string_utf8_from_bytes(data.to_vec())?)
            }
        }
    }

    /// Decode a value from `bytes` under `config`. Trailing bytes are an error only when
    /// `config.reject_trailing_bytes` is set.
    pub fn try_deserialize_with(
        bytes: &[u8],
        config: &CodecConfig,
    ) -> Result<Value, SerializationError> {
        let mut reader = BytesReader::new(bytes);
        let result = Value::deserialize_read_with(&mut reader, config).and_then(|value| {
            if config.reject_trailing_bytes && !reader.is_empty() {
                Err(SerializationError::LeftoverBytesInDeserialization)
            } else {
                Ok(value)
            }
        });
        if let Err(e) = &result {
            debug!("Failed to deserialize Clarity value";
                   "err" => %e,
                   "offset" => reader.offset(),
                   "input_len" => bytes.len());
        }
        result
    }

    pub fn try_deserialize_bytes(bytes: &[u8]) -> Result<Value, SerializationError> {
        Value::try_deserialize_with(bytes, &CodecConfig::default())
    }

    /// Decode a value that must account for every byte of `bytes`.
    pub fn try_deserialize_bytes_exact(bytes: &[u8]) -> Result<Value, SerializationError> {
        let config = CodecConfig {
            reject_trailing_bytes: true,
            ..CodecConfig::default()
        };
        Value::try_deserialize_with(bytes, &config)
    }

    /// Decode a hex string, with or without a leading `0x`.
    pub fn try_deserialize_hex_untyped(hex: &str) -> Result<Value, SerializationError> {
        let data = hex_bytes_prefixed(hex)?;
        Value::try_deserialize_bytes(&data)
    }
}

/// Hashes the canonical encoding, so tuples that compare equal also hash equal.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialize_to_vec().hash(state);
    }
}
