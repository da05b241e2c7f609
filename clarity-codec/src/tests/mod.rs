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

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::array::uniform20;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use proptest::string::string_regex;
use rstest::rstest;

use crate::projection::{cv_to_json, cv_to_string, type_string};
use crate::types::BUFF_MAX_LEN;
use crate::{BufferEncoding, CodecConfig, ConstructionError, SerializationError, Value};

const MAX_GENERATED_LEN: usize = 8;

pub fn clarity_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => string_regex("[a-zA-Z][a-zA-Z0-9_!?<>=/*+-]{0,15}").unwrap(),
        1 => prop::sample::select(&["-", "+", "=", "/", "*", "<", ">", "<=", ">="][..])
            .prop_map(String::from),
    ]
}

pub fn contract_name_strategy() -> impl Strategy<Value = String> {
    string_regex("[a-z][a-z0-9-]{0,39}").unwrap()
}

pub fn principal_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u8..32, uniform20(any::<u8>()))
            .prop_map(|(version, hash)| Value::standard_principal(version, hash)),
        (0u8..32, uniform20(any::<u8>()), contract_name_strategy()).prop_map(
            |(version, hash, name)| Value::contract_principal(version, hash, &name)
                .expect("generated contract name should be valid")
        ),
    ]
}

pub fn leaf_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i128>().prop_map(Value::Int),
        any::<u128>().prop_map(Value::UInt),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::none()),
        vec(any::<u8>(), 0..64)
            .prop_map(|bytes| Value::buff_from(bytes).expect("buffer under the size limit")),
        string_regex("[\\x20-\\x7e]{0,32}")
            .unwrap()
            .prop_map(|s| Value::string_ascii(&s).expect("printable ascii")),
        any::<String>().prop_map(|s| Value::string_utf8_from_string(s).expect("valid utf8")),
        principal_strategy(),
    ]
}

pub fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_value_strategy().prop_recursive(4, 64, MAX_GENERATED_LEN as u32, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|v| Value::some(v).expect("shallow value")),
            inner
                .clone()
                .prop_map(|v| Value::okay(v).expect("shallow value")),
            inner
                .clone()
                .prop_map(|v| Value::error(v).expect("shallow value")),
            vec(inner.clone(), 0..MAX_GENERATED_LEN)
                .prop_map(|items| Value::cons_list(items).expect("shallow list")),
            btree_map(clarity_name_strategy(), inner, 1..MAX_GENERATED_LEN).prop_map(|fields| {
                Value::tuple(fields.into_iter().collect()).expect("distinct valid keys")
            }),
        ]
    })
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_round_trip(value in value_strategy()) {
        let bytes = value.serialize_to_vec();
        prop_assert_eq!(bytes.len(), value.serialized_size());

        let decoded = Value::try_deserialize_bytes_exact(&bytes).unwrap();
        prop_assert_eq!(&decoded, &value);
        prop_assert_eq!(decoded.serialize_to_vec(), bytes);
        prop_assert_eq!(hash_of(&decoded), hash_of(&value));
    }

    #[test]
    fn prop_hex_round_trip(value in value_strategy()) {
        let hex = value.serialize_to_hex();
        prop_assert_eq!(Value::try_deserialize_hex_untyped(&hex).unwrap(), value.clone());
        prop_assert_eq!(
            Value::try_deserialize_hex_untyped(&format!("0x{hex}")).unwrap(),
            value
        );
    }

    #[test]
    fn prop_tuple_order_does_not_change_encoding(
        fields in btree_map(clarity_name_strategy(), leaf_value_strategy(), 1..MAX_GENERATED_LEN)
    ) {
        let forward: Vec<(String, Value)> = fields.into_iter().collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = Value::tuple(forward).unwrap();
        let b = Value::tuple(reversed).unwrap();
        prop_assert_eq!(a.serialize_to_vec(), b.serialize_to_vec());
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn prop_decoding_arbitrary_bytes_never_panics(bytes in vec(any::<u8>(), 0..256)) {
        if let Ok(value) = Value::try_deserialize_bytes(&bytes) {
            let reencoded = value.serialize_to_vec();
            prop_assert!(reencoded.len() <= bytes.len());
            prop_assert_eq!(Value::try_deserialize_bytes_exact(&reencoded).unwrap(), value.clone());
            cv_to_string(&value, BufferEncoding::TryAscii);
            cv_to_json(&value, true);
        }
    }

    #[test]
    fn prop_projections_are_total(value in value_strategy()) {
        let repr = cv_to_string(&value, BufferEncoding::Hex);
        prop_assert_eq!(&repr, &value.to_string());
        prop_assert!(!type_string(&value).is_empty());
        let json = cv_to_json(&value, true);
        prop_assert!(json.get("type").is_some());
        prop_assert!(json.get("value").is_some());
    }

    #[test]
    fn prop_int_from_decimal_string(int_value in any::<i128>()) {
        prop_assert_eq!(Value::int_from(int_value.to_string()).unwrap(), Value::Int(int_value));
        prop_assert_eq!(Value::int_from(int_value).unwrap(), Value::Int(int_value));
    }

    #[test]
    fn prop_uint_from_hex_string(uint_value in any::<u128>()) {
        prop_assert_eq!(
            Value::uint_from(format!("{uint_value:#x}")).unwrap(),
            Value::UInt(uint_value)
        );
        prop_assert_eq!(Value::uint_from(uint_value.to_string()).unwrap(), Value::UInt(uint_value));
    }
}

#[rstest]
#[case(Value::Int(1), "0000000000000000000000000000000001")]
#[case(Value::Int(-1), "00ffffffffffffffffffffffffffffffff")]
#[case(Value::UInt(1), "0100000000000000000000000000000001")]
#[case(Value::Bool(true), "03")]
#[case(Value::Bool(false), "04")]
#[case(Value::buff_from(vec![0xde, 0xad, 0xbe, 0xef]).unwrap(), "0200000004deadbeef")]
#[case(
    Value::cons_list(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(-4)]).unwrap(),
    "0b00000004\
     0000000000000000000000000000000001\
     0000000000000000000000000000000002\
     0000000000000000000000000000000003\
     00fffffffffffffffffffffffffffffffc"
)]
#[case(
    Value::tuple(vec![("foobar", Value::Bool(true)), ("baz", Value::none())]).unwrap(),
    "0c000000020362617a0906666f6f62617203"
)]
fn tag_vectors(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(value.serialize_to_hex(), expected);
    assert_eq!(Value::try_deserialize_hex_untyped(expected).unwrap(), value);
}

#[rstest]
#[case("170141183460469231731687303715884105727", Ok(Value::Int(i128::MAX)))]
#[case("-170141183460469231731687303715884105728", Ok(Value::Int(i128::MIN)))]
#[case(
    "170141183460469231731687303715884105728",
    Err(ConstructionError::IntegerOutOfRange(
        "170141183460469231731687303715884105728".into(),
        "maximum 2^127 - 1"
    ))
)]
#[case(
    "-170141183460469231731687303715884105729",
    Err(ConstructionError::IntegerOutOfRange(
        "-170141183460469231731687303715884105729".into(),
        "minimum -2^127"
    ))
)]
fn int_bounds(#[case] input: &str, #[case] expected: Result<Value, ConstructionError>) {
    assert_eq!(Value::int_from(input), expected);
}

#[rstest]
#[case("0", true)]
#[case("340282366920938463463374607431768211455", true)]
#[case("-1", false)]
#[case("340282366920938463463374607431768211456", false)]
fn uint_bounds(#[case] input: &str, #[case] accepted: bool) {
    let result = Value::uint_from(input);
    assert_eq!(result.is_ok(), accepted, "{input}: {result:?}");
    if !accepted {
        assert!(matches!(
            result,
            Err(ConstructionError::IntegerOutOfRange(..))
        ));
    }
}

#[test]
fn unknown_tag_is_rejected() {
    assert_eq!(
        Value::try_deserialize_bytes(&[0xff]),
        Err(SerializationError::BadTypePrefix(0xff))
    );
}

#[test]
fn json_integers_are_strings_when_strict() {
    let value = Value::UInt(1 << 53);
    assert_eq!(
        cv_to_json(&value, true).to_string(),
        r#"{"type":"uint","value":"9007199254740992"}"#
    );
}

#[test]
fn largest_buffer_round_trips() {
    let value = Value::buff_from(vec![0xab; BUFF_MAX_LEN as usize]).unwrap();
    let bytes = value.serialize_to_vec();
    assert_eq!(bytes.len(), 5 + BUFF_MAX_LEN as usize);
    assert_eq!(Value::try_deserialize_bytes_exact(&bytes).unwrap(), value);
    assert_eq!(
        Value::buff_from(vec![0xab; BUFF_MAX_LEN as usize + 1]),
        Err(ConstructionError::ValueTooLarge)
    );
}

#[test]
fn config_file_drives_decoding() {
    let config = CodecConfig::load_from_file("./src/tests/conf/codec.toml").unwrap();
    let value = Value::buff_from(b"hi".to_vec()).unwrap();
    let mut bytes = value.serialize_to_vec();
    assert_eq!(
        cv_to_string(
            &Value::try_deserialize_with(&bytes, &config).unwrap(),
            config.buffer_encoding
        ),
        "\"hi\""
    );
    bytes.push(0x03);
    assert_eq!(
        Value::try_deserialize_with(&bytes, &config),
        Err(SerializationError::LeftoverBytesInDeserialization)
    );
}
