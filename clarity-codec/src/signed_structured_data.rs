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

//! Domain-separated hashing and signing of Clarity values.
//! Reference [SIP018](https://github.com/stacksgov/sips/blob/main/sips/sip-018/sip-018-signed-structured-data.md).

use clarity_common::util::hash::Sha256Sum;
use clarity_common::util::secp256k1::{MessageSignature, Secp256k1PrivateKey, Secp256k1PublicKey};

use crate::errors::ConstructionError;
use crate::types::{CharType, SequenceData, Value};

/// Message prefix for signed structured data. "SIP018" in ascii
pub const STRUCTURED_DATA_PREFIX: [u8; 6] = [0x53, 0x49, 0x50, 0x30, 0x31, 0x38];
/// prefix, domain hash, message hash
pub const STRUCTURED_DATA_ENCODED_LEN: usize = STRUCTURED_DATA_PREFIX.len() + 32 + 32;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StructuredDataError {
    /// The domain is not a tuple with the required fields
    #[error("Invalid structured data domain: {0}")]
    DomainValidation(String),
    #[error("Structured data envelope must be {STRUCTURED_DATA_ENCODED_LEN} bytes, got {0}")]
    BadEnvelopeLength(usize),
    #[error("Structured data envelope does not start with the SIP018 prefix")]
    BadPrefix,
    #[error("Failed to sign structured data: {0}")]
    Signing(String),
    #[error("Failed to recover signer: {0}")]
    Recovery(String),
}

/// The two hashes carried by an encoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDataHashes {
    pub domain_hash: Sha256Sum,
    pub message_hash: Sha256Sum,
}

pub fn structured_data_hash(value: &Value) -> Sha256Sum {
    Sha256Sum::from_data(&value.serialize_to_vec())
}

/// Check that `domain` is a tuple with at least `name` and `version` as ASCII strings
/// and `chain-id` as a uint. Extra fields are allowed.
pub fn validate_domain(domain: &Value) -> Result<(), StructuredDataError> {
    let tuple = match domain {
        Value::Tuple(tuple) => tuple,
        other => {
            return Err(StructuredDataError::DomainValidation(format!(
                "expected a tuple, got {other}"
            )))
        }
    };
    for field in ["name", "version"] {
        match tuple.get(field) {
            Some(Value::Sequence(SequenceData::String(CharType::ASCII(_)))) => {}
            Some(other) => {
                return Err(StructuredDataError::DomainValidation(format!(
                    "field '{field}' must be a string-ascii, got {other}"
                )))
            }
            None => {
                return Err(StructuredDataError::DomainValidation(format!(
                    "missing field '{field}'"
                )))
            }
        }
    }
    match tuple.get("chain-id") {
        Some(Value::UInt(_)) => Ok(()),
        Some(other) => Err(StructuredDataError::DomainValidation(format!(
            "field 'chain-id' must be a uint, got {other}"
        ))),
        None => Err(StructuredDataError::DomainValidation(
            "missing field 'chain-id'".into(),
        )),
    }
}

/// `prefix || hash(domain) || hash(message)`, always `STRUCTURED_DATA_ENCODED_LEN` bytes.
pub fn encode_structured_data(
    structured_data: &Value,
    domain: &Value,
) -> Result<Vec<u8>, StructuredDataError> {
    validate_domain(domain)?;
    let domain_hash = structured_data_hash(domain);
    let message_hash = structured_data_hash(structured_data);
    let mut encoded = Vec::with_capacity(STRUCTURED_DATA_ENCODED_LEN);
    encoded.extend_from_slice(&STRUCTURED_DATA_PREFIX);
    encoded.extend_from_slice(domain_hash.as_bytes());
    encoded.extend_from_slice(message_hash.as_bytes());
    Ok(encoded)
}

/// Split an encoded envelope back into its domain and message hashes.
pub fn decode_structured_data(bytes: &[u8]) -> Result<StructuredDataHashes, StructuredDataError> {
    if bytes.len() != STRUCTURED_DATA_ENCODED_LEN {
        return Err(StructuredDataError::BadEnvelopeLength(bytes.len()));
    }
    let (prefix, hashes) = bytes.split_at(STRUCTURED_DATA_PREFIX.len());
    if prefix != STRUCTURED_DATA_PREFIX {
        return Err(StructuredDataError::BadPrefix);
    }
    let (domain_hash, message_hash) = hashes.split_at(32);
    Ok(StructuredDataHashes {
        domain_hash: Sha256Sum::from_bytes(domain_hash)
            .ok_or(StructuredDataError::BadEnvelopeLength(bytes.len()))?,
        message_hash: Sha256Sum::from_bytes(message_hash)
            .ok_or(StructuredDataError::BadEnvelopeLength(bytes.len()))?,
    })
}

/// Generate a message hash for signing structured Clarity data.
pub fn structured_data_message_hash(
    structured_data: &Value,
    domain: &Value,
) -> Result<Sha256Sum, StructuredDataError> {
    let message = encode_structured_data(structured_data, domain)?;
    Ok(Sha256Sum::from_data(&message))
}

/// Sign structured Clarity data with a given private key.
pub fn sign_structured_data(
    structured_data: &Value,
    domain: &Value,
    private_key: &Secp256k1PrivateKey,
) -> Result<MessageSignature, StructuredDataError> {
    let msg_hash = structured_data_message_hash(structured_data, domain)?;
    private_key
        .sign(msg_hash.as_bytes())
        .map_err(|e| StructuredDataError::Signing(e.to_string()))
}

/// Recover the public key that produced `signature` over `structured_data` in `domain`.
pub fn recover_structured_data_signer(
    structured_data: &Value,
    domain: &Value,
    signature: &MessageSignature,
) -> Result<Secp256k1PublicKey, StructuredDataError> {
    let msg_hash = structured_data_message_hash(structured_data, domain)?;
    Secp256k1PublicKey::recover_to_pubkey(msg_hash.as_bytes(), signature)
        .map_err(|e| StructuredDataError::Recovery(e.to_string()))
}

// Helper function to generate domain for structured data hash
pub fn make_structured_data_domain(
    name: &str,
    version: &str,
    chain_id: u32,
) -> Result<Value, ConstructionError> {
    Value::tuple(vec![
        ("name", Value::string_ascii(name)?),
        ("version", Value::string_ascii(version)?),
        ("chain-id", Value::UInt(chain_id.into())),
    ])
}
