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

pub mod integer;
pub mod serialization;
pub mod signatures;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use clarity_common::address::c32::c32_address;

use crate::errors::ConstructionError;
use crate::representations::{ClarityName, ContractName};

/// Largest buffer a `Value` may hold.
pub const BUFF_MAX_LEN: u32 = 1_048_576;
/// Deepest nesting a `Value` may have. A leaf has depth 1.
pub const MAX_TYPE_DEPTH: u8 = 32;

/// A Clarity value. Each payload type keeps its fields private so the constructors
/// on `Value` remain the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i128),
    UInt(u128),
    Bool(bool),
    Sequence(SequenceData),
    Principal(PrincipalData),
    Tuple(TupleData),
    Optional(OptionalData),
    Response(ResponseData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceData {
    Buffer(BuffData),
    List(ListData),
    String(CharType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharType {
    UTF8(UTF8Data),
    ASCII(ASCIIData),
}

#[derive(Clone, PartialEq, Eq)]
pub struct BuffData {
    data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListData {
    data: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASCIIData {
    data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UTF8Data {
    data: String,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardPrincipalData(pub u8, pub [u8; 20]);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedContractIdentifier {
    pub issuer: StandardPrincipalData,
    pub name: ContractName,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrincipalData {
    Standard(StandardPrincipalData),
    Contract(QualifiedContractIdentifier),
}

/// Tuple fields. Equality and the wire encoding use the key-sorted map; rendering uses
/// `field_order`, the order the fields were supplied in.
#[derive(Debug, Clone, Eq)]
pub struct TupleData {
    data_map: BTreeMap<ClarityName, Value>,
    field_order: Vec<ClarityName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalData {
    data: Option<Box<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseData {
    committed: bool,
    data: Box<Value>,
}

impl PartialEq for TupleData {
    fn eq(&self, other: &TupleData) -> bool {
        self.data_map == other.data_map
    }
}

fn check_child_depth(child_depth: u8) -> Result<(), ConstructionError> {
    if child_depth >= MAX_TYPE_DEPTH {
        Err(ConstructionError::TypeSignatureTooDeep)
    } else {
        Ok(())
    }
}

fn check_count(len: usize) -> Result<(), ConstructionError> {
    if u32::try_from(len).is_err() {
        Err(ConstructionError::ValueTooLarge)
    } else {
        Ok(())
    }
}

impl Value {
    pub fn none() -> Value {
        Value::Optional(OptionalData { data: None })
    }

    pub fn some(data: Value) -> Result<Value, ConstructionError> {
        check_child_depth(data.depth())?;
        Ok(Value::Optional(OptionalData {
            data: Some(Box::new(data)),
        }))
    }

    pub fn okay(data: Value) -> Result<Value, ConstructionError> {
        check_child_depth(data.depth())?;
        Ok(Value::Response(ResponseData {
            committed: true,
            data: Box::new(data),
        }))
    }

    pub fn error(data: Value) -> Result<Value, ConstructionError> {
        check_child_depth(data.depth())?;
        Ok(Value::Response(ResponseData {
            committed: false,
            data: Box::new(data),
        }))
    }

    pub fn buff_from(buff_data: Vec<u8>) -> Result<Value, ConstructionError> {
        if buff_data.len() > BUFF_MAX_LEN as usize {
            return Err(ConstructionError::ValueTooLarge);
        }
        Ok(Value::Sequence(SequenceData::Buffer(BuffData {
            data: buff_data,
        })))
    }

    pub fn buff_from_byte(byte: u8) -> Value {
        Value::Sequence(SequenceData::Buffer(BuffData { data: vec![byte] }))
    }

    /// Lists are not checked for element homogeneity; each element was validated when it was built.
    pub fn cons_list(list_data: Vec<Value>) -> Result<Value, ConstructionError> {
        check_count(list_data.len())?;
        let max_child = list_data.iter().map(Value::depth).max().unwrap_or(0);
        check_child_depth(max_child)?;
        Ok(Value::Sequence(SequenceData::List(ListData {
            data: list_data,
        })))
    }

    pub fn string_ascii_from_bytes(bytes: Vec<u8>) -> Result<Value, ConstructionError> {
        check_count(bytes.len())?;
        if !bytes.is_ascii() {
            return Err(ConstructionError::InvalidAscii);
        }
        Ok(Value::Sequence(SequenceData::String(CharType::ASCII(
            ASCIIData { data: bytes },
        ))))
    }

    pub fn string_ascii(s: &str) -> Result<Value, ConstructionError> {
        Value::string_ascii_from_bytes(s.as_bytes().to_vec())
    }

    pub fn string_utf8_from_bytes(bytes: Vec<u8>) -> Result<Value, ConstructionError> {
        let data = String::from_utf8(bytes).map_err(|_| ConstructionError::InvalidUtf8)?;
        Value::string_utf8_from_string(data)
    }

    pub fn string_utf8_from_string(data: String) -> Result<Value, ConstructionError> {
        check_count(data.len())?;
        Ok(Value::Sequence(SequenceData::String(CharType::UTF8(
            UTF8Data { data },
        ))))
    }

    pub fn standard_principal(version: u8, hash160: [u8; 20]) -> Value {
        Value::Principal(PrincipalData::Standard(StandardPrincipalData(
            version, hash160,
        )))
    }

    pub fn contract_principal(
        version: u8,
        hash160: [u8; 20],
        name: &str,
    ) -> Result<Value, ConstructionError> {
        let name = ContractName::try_from(name)?;
        Ok(Value::Principal(PrincipalData::Contract(
            QualifiedContractIdentifier {
                issuer: StandardPrincipalData(version, hash160),
                name,
            },
        )))
    }

    /// Build a tuple from string keys, validating each key as a `ClarityName`.
    pub fn tuple<K: Into<String>>(fields: Vec<(K, Value)>) -> Result<Value, ConstructionError> {
        let named = fields
            .into_iter()
            .map(|(k, v)| Ok((ClarityName::try_from(k.into())?, v)))
            .collect::<Result<Vec<_>, ConstructionError>>()?;
        Ok(Value::Tuple(TupleData::from_data(named)?))
    }

    /// Nesting depth; leaves are 1.
    pub fn depth(&self) -> u8 {
        let child = match self {
            Value::Optional(OptionalData { data: Some(inner) }) => inner.depth(),
            Value::Response(ResponseData { data, .. }) => data.depth(),
            Value::Sequence(SequenceData::List(ListData { data })) => {
                data.iter().map(Value::depth).max().unwrap_or(0)
            }
            Value::Tuple(TupleData { data_map, .. }) => {
                data_map.values().map(Value::depth).max().unwrap_or(0)
            }
            _ => 0,
        };
        child.saturating_add(1)
    }

    fn type_mismatch(self, expected: &'static str) -> ConstructionError {
        error!("Value '{:?}' is not {}", &self, expected);
        ConstructionError::TypeMismatch(expected, self.to_string())
    }

    pub fn expect_i128(self) -> Result<i128, ConstructionError> {
        match self {
            Value::Int(inner) => Ok(inner),
            v => Err(v.type_mismatch("an int")),
        }
    }

    pub fn expect_u128(self) -> Result<u128, ConstructionError> {
        match self {
            Value::UInt(inner) => Ok(inner),
            v => Err(v.type_mismatch("a uint")),
        }
    }

    pub fn expect_bool(self) -> Result<bool, ConstructionError> {
        match self {
            Value::Bool(b) => Ok(b),
            v => Err(v.type_mismatch("a bool")),
        }
    }

    pub fn expect_buff(self) -> Result<Vec<u8>, ConstructionError> {
        match self {
            Value::Sequence(SequenceData::Buffer(buff)) => Ok(buff.data),
            v => Err(v.type_mismatch("a buff")),
        }
    }

    pub fn expect_list(self) -> Result<Vec<Value>, ConstructionError> {
        match self {
            Value::Sequence(SequenceData::List(list)) => Ok(list.data),
            v => Err(v.type_mismatch("a list")),
        }
    }

    pub fn expect_ascii(self) -> Result<String, ConstructionError> {
        match self {
            Value::Sequence(SequenceData::String(CharType::ASCII(ASCIIData { data }))) => {
                // constructors only admit 7-bit bytes
                Ok(data.into_iter().map(char::from).collect())
            }
            v => Err(v.type_mismatch("an ascii string")),
        }
    }

    pub fn expect_utf8(self) -> Result<String, ConstructionError> {
        match self {
            Value::Sequence(SequenceData::String(CharType::UTF8(UTF8Data { data }))) => Ok(data),
            v => Err(v.type_mismatch("a utf8 string")),
        }
    }

    pub fn expect_principal(self) -> Result<PrincipalData, ConstructionError> {
        match self {
            Value::Principal(p) => Ok(p),
            v => Err(v.type_mismatch("a principal")),
        }
    }

    pub fn expect_tuple(self) -> Result<TupleData, ConstructionError> {
        match self {
            Value::Tuple(data) => Ok(data),
            v => Err(v.type_mismatch("a tuple")),
        }
    }

    pub fn expect_optional(self) -> Result<Option<Value>, ConstructionError> {
        match self {
            Value::Optional(opt) => Ok(opt.data.map(|inner| *inner)),
            v => Err(v.type_mismatch("an optional")),
        }
    }

    /// `Ok(inner)` for `(ok inner)`, `Err(inner)` for `(err inner)`.
    pub fn expect_result(self) -> Result<Result<Value, Value>, ConstructionError> {
        match self {
            Value::Response(res) => {
                if res.committed {
                    Ok(Ok(*res.data))
                } else {
                    Ok(Err(*res.data))
                }
            }
            v => Err(v.type_mismatch("a response")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<PrincipalData> for Value {
    fn from(p: PrincipalData) -> Self {
        Value::Principal(p)
    }
}

impl From<StandardPrincipalData> for Value {
    fn from(p: StandardPrincipalData) -> Self {
        Value::Principal(PrincipalData::Standard(p))
    }
}

impl From<TupleData> for Value {
    fn from(t: TupleData) -> Self {
        Value::Tuple(t)
    }
}

impl BuffData {
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ListData {
    pub fn items(&self) -> &[Value] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ASCIIData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> &str {
        // ASCII is always valid UTF-8
        std::str::from_utf8(&self.data).unwrap_or_default()
    }
}

impl UTF8Data {
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

impl OptionalData {
    pub fn value(&self) -> Option<&Value> {
        self.data.as_deref()
    }
}

impl ResponseData {
    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn value(&self) -> &Value {
        &self.data
    }
}

impl TupleData {
    /// Collect `data`, rejecting duplicate names. `field_order` keeps the order given here.
    pub fn from_data(data: Vec<(ClarityName, Value)>) -> Result<TupleData, ConstructionError> {
        check_count(data.len())?;
        let mut data_map = BTreeMap::new();
        let mut field_order = Vec::with_capacity(data.len());
        for (name, value) in data.into_iter() {
            check_child_depth(value.depth())?;
            match data_map.entry(name.clone()) {
                Entry::Vacant(e) => e.insert(value),
                Entry::Occupied(_) => {
                    return Err(ConstructionError::DuplicateTupleField(name.into()))
                }
            };
            field_order.push(name);
        }
        Ok(TupleData {
            data_map,
            field_order,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data_map.get(name)
    }

    pub fn len(&self) -> usize {
        self.data_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_map.is_empty()
    }

    /// Fields in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = (&ClarityName, &Value)> {
        self.field_order
            .iter()
            .filter_map(move |name| self.data_map.get_key_value(name))
    }

    /// Fields in canonical (byte-wise key) order.
    pub fn sorted_iter(&self) -> impl Iterator<Item = (&ClarityName, &Value)> {
        self.data_map.iter()
    }

    pub(crate) fn into_sorted(mut self) -> TupleData {
        self.field_order = self.data_map.keys().cloned().collect();
        self
    }
}

impl StandardPrincipalData {
    pub fn version(&self) -> u8 {
        self.0
    }

    pub fn hash_bytes(&self) -> &[u8; 20] {
        &self.1
    }

    pub fn to_address(&self) -> String {
        c32_address(self.0, &self.1[..]).unwrap_or_else(|_| "INVALID_C32_ADD".to_string())
    }
}

impl fmt::Display for StandardPrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl fmt::Debug for StandardPrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StandardPrincipalData({})", self.to_address())
    }
}

impl fmt::Display for QualifiedContractIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.issuer, self.name)
    }
}

impl fmt::Display for PrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrincipalData::Standard(sender) => write!(f, "{sender}"),
            PrincipalData::Contract(contract_identifier) => write!(f, "{contract_identifier}"),
        }
    }
}

impl fmt::Display for BuffData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", clarity_common::util::hash::to_hex(&self.data))
    }
}

impl fmt::Debug for BuffData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for ASCIIData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut escaped_str = String::new();
        for c in self.data.iter() {
            escaped_str.push_str(&std::ascii::escape_default(*c).to_string());
        }
        write!(f, "\"{escaped_str}\"")
    }
}

impl fmt::Display for UTF8Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for c in self.data.chars() {
            if c.is_ascii() {
                result.push_str(&std::ascii::escape_default(c as u8).to_string());
            } else {
                // code points outside ASCII are written as \u{hex}
                result.push_str(&c.escape_unicode().to_string());
            }
        }
        write!(f, "u\"{result}\"")
    }
}

impl fmt::Display for CharType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CharType::ASCII(string) => write!(f, "{string}"),
            CharType::UTF8(string) => write!(f, "{string}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        crate::projection::write_repr(f, self, crate::projection::BufferEncoding::Hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_some(levels: usize) -> Result<Value, ConstructionError> {
        let mut v = Value::Bool(true);
        for _ in 0..levels {
            v = Value::some(v)?;
        }
        Ok(v)
    }

    #[test]
    fn depth_limit_on_wrappers() {
        let deepest = nested_some(MAX_TYPE_DEPTH as usize - 1).unwrap();
        assert_eq!(deepest.depth(), MAX_TYPE_DEPTH);
        assert_eq!(
            Value::okay(deepest.clone()),
            Err(ConstructionError::TypeSignatureTooDeep)
        );
        assert_eq!(
            Value::cons_list(vec![deepest.clone()]),
            Err(ConstructionError::TypeSignatureTooDeep)
        );
        assert_eq!(
            Value::tuple(vec![("a", deepest)]),
            Err(ConstructionError::TypeSignatureTooDeep)
        );
        assert_eq!(Value::cons_list(vec![]).unwrap().depth(), 1);
    }

    #[test]
    fn buffer_ceiling() {
        assert!(Value::buff_from(vec![0u8; BUFF_MAX_LEN as usize]).is_ok());
        assert_eq!(
            Value::buff_from(vec![0u8; BUFF_MAX_LEN as usize + 1]),
            Err(ConstructionError::ValueTooLarge)
        );
    }

    #[test]
    fn strings_are_validated() {
        assert!(Value::string_ascii("hello world").is_ok());
        assert_eq!(
            Value::string_ascii_from_bytes(vec![0x68, 0x80]),
            Err(ConstructionError::InvalidAscii)
        );
        assert_eq!(
            Value::string_utf8_from_bytes(vec![0xc3, 0x28]),
            Err(ConstructionError::InvalidUtf8)
        );
        assert_eq!(
            Value::string_utf8_from_bytes("caf\u{e9}".as_bytes().to_vec())
                .unwrap()
                .expect_utf8()
                .unwrap(),
            "caf\u{e9}"
        );
    }

    #[test]
    fn contract_principal_name_limit() {
        assert!(Value::contract_principal(22, [1u8; 20], &"a".repeat(127)).is_ok());
        assert!(matches!(
            Value::contract_principal(22, [1u8; 20], &"a".repeat(128)),
            Err(ConstructionError::InvalidName("ContractName", _))
        ));
    }

    #[test]
    fn tuple_keys_and_duplicates() {
        assert!(matches!(
            Value::tuple(vec![("bad key", Value::Bool(true))]),
            Err(ConstructionError::InvalidName("ClarityName", _))
        ));
        assert_eq!(
            Value::tuple(vec![("a", Value::Bool(true)), ("a", Value::Bool(false))]),
            Err(ConstructionError::DuplicateTupleField("a".into()))
        );
    }

    #[test]
    fn tuple_equality_ignores_order() {
        let a = Value::tuple(vec![("foo", Value::Int(1)), ("bar", Value::UInt(2))]).unwrap();
        let b = Value::tuple(vec![("bar", Value::UInt(2)), ("foo", Value::Int(1))]).unwrap();
        assert_eq!(a, b);

        let t = a.expect_tuple().unwrap();
        let order: Vec<&str> = t.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["foo", "bar"]);
        let sorted: Vec<&str> = t.sorted_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(sorted, vec!["bar", "foo"]);
        assert_eq!(t.get("bar"), Some(&Value::UInt(2)));
        assert_eq!(t.get("baz"), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Int(-3).expect_i128().unwrap(), -3);
        assert_eq!(Value::UInt(3).expect_u128().unwrap(), 3);
        assert!(Value::Int(3).expect_u128().is_err());
        assert_eq!(
            Value::error(Value::UInt(7)).unwrap().expect_result().unwrap(),
            Err(Value::UInt(7))
        );
        assert_eq!(Value::none().expect_optional().unwrap(), None);
        assert_eq!(
            Value::string_ascii("hi").unwrap().expect_ascii().unwrap(),
            "hi"
        );
        assert!(matches!(
            Value::Bool(true).expect_list(),
            Err(ConstructionError::TypeMismatch("a list", _))
        ));
    }

    #[test]
    fn string_display_escapes() {
        assert_eq!(
            Value::string_ascii("a\"b\n").unwrap().to_string(),
            "\"a\\\"b\\n\""
        );
        assert_eq!(
            Value::string_utf8_from_string("h\u{e9}".into())
                .unwrap()
                .to_string(),
            "u\"h\\u{e9}\""
        );
    }
}
