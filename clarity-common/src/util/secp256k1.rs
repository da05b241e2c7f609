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

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{
    Message as LibSecp256k1Message, PublicKey as LibSecp256k1PublicKey, Secp256k1,
    SecretKey as LibSecp256k1PrivateKey,
};

use crate::util::hash::{hex_bytes, to_hex};

// per-thread Secp256k1 context
thread_local!(static _secp256k1: Secp256k1<secp256k1::All> = Secp256k1::new());

/// A recoverable signature laid out as `recovery id || r || s`.
pub struct MessageSignature(pub [u8; 65]);
impl_array_newtype!(MessageSignature, u8, 65);
impl_array_hexstring_fmt!(MessageSignature);
impl_byte_array_newtype!(MessageSignature, u8, 65);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Secp256k1PublicKey {
    key: LibSecp256k1PublicKey,
    compressed: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Secp256k1PrivateKey {
    key: LibSecp256k1PrivateKey,
    compress_public: bool,
}

impl MessageSignature {
    /// Creates an "empty" signature (all zeros). Note this is not a valid signature.
    pub fn empty() -> MessageSignature {
        MessageSignature([0u8; 65])
    }

    pub fn from_secp256k1_recoverable(sig: &RecoverableSignature) -> MessageSignature {
        let (recid, bytes) = sig.serialize_compact();
        let mut ret_bytes = [0u8; 65];
        ret_bytes[0] = recid.to_i32() as u8;
        ret_bytes[1..=64].copy_from_slice(&bytes[..64]);
        MessageSignature(ret_bytes)
    }

    pub fn to_secp256k1_recoverable(&self) -> Option<RecoverableSignature> {
        let recid = RecoveryId::from_i32(self.0[0] as i32).ok()?;
        RecoverableSignature::from_compact(&self.0[1..], recid).ok()
    }

    /// Converts from VRS to RSV.
    pub fn to_rsv(&self) -> Vec<u8> {
        [&self.0[1..], &self.0[0..1]].concat()
    }
}

impl Secp256k1PublicKey {
    pub fn from_private(privk: &Secp256k1PrivateKey) -> Secp256k1PublicKey {
        _secp256k1.with(|ctx| Secp256k1PublicKey {
            key: LibSecp256k1PublicKey::from_secret_key(ctx, &privk.key),
            compressed: privk.compress_public,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.key.serialize().to_vec()
        } else {
            self.key.serialize_uncompressed().to_vec()
        }
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.to_bytes())
    }

    /// Recover the signer's public key from a 32-byte message hash and its signature.
    /// The recovered key is always compressed.
    pub fn recover_to_pubkey(
        msg: &[u8],
        sig: &MessageSignature,
    ) -> Result<Secp256k1PublicKey, &'static str> {
        let secp256k1_msg = LibSecp256k1Message::from_slice(msg)
            .map_err(|_e| "Invalid message: failed to decode data hash: must be a 32-byte hash")?;
        let secp256k1_sig = sig
            .to_secp256k1_recoverable()
            .ok_or("Invalid signature: failed to decode recoverable signature")?;
        _secp256k1.with(|ctx| {
            let key = ctx
                .recover_ecdsa(&secp256k1_msg, &secp256k1_sig)
                .map_err(|_e| "Invalid signature: failed to recover public key")?;
            Ok(Secp256k1PublicKey {
                key,
                compressed: true,
            })
        })
    }
}

impl Secp256k1PrivateKey {
    pub fn from_hex(hex_string: &str) -> Result<Secp256k1PrivateKey, &'static str> {
        let data = hex_bytes(hex_string).map_err(|_e| "Failed to decode hex private key")?;
        Secp256k1PrivateKey::from_slice(&data[..]).map_err(|_e| "Invalid private key hex string")
    }

    /// Accepts a 32-byte secret, or 33 bytes where the trailing `0x01` marks a compressed public key.
    pub fn from_slice(data: &[u8]) -> Result<Secp256k1PrivateKey, &'static str> {
        if data.len() < 32 {
            return Err("Invalid private key: shorter than 32 bytes");
        }
        if data.len() > 33 {
            return Err("Invalid private key: greater than 33 bytes");
        }
        let compress_public = if data.len() == 33 {
            if data[32] != 0x01 {
                return Err("Invalid private key: invalid compressed byte marker");
            }
            true
        } else {
            false
        };
        let key = LibSecp256k1PrivateKey::from_slice(&data[0..32])
            .map_err(|_e| "Invalid private key: failed to load")?;
        Ok(Secp256k1PrivateKey {
            key,
            compress_public,
        })
    }

    pub fn compress_public(&self) -> bool {
        self.compress_public
    }

    pub fn to_hex(&self) -> String {
        let mut bytes = self.key.secret_bytes().to_vec();
        if self.compress_public {
            bytes.push(1);
        }
        to_hex(&bytes)
    }

    /// Produce a recoverable signature over a 32-byte hash.
    pub fn sign(&self, data_hash: &[u8]) -> Result<MessageSignature, &'static str> {
        let message = LibSecp256k1Message::from_slice(data_hash)
            .map_err(|_e| "Invalid message: failed to decode data hash: must be a 32-byte hash")?;
        _secp256k1.with(|ctx| {
            let sig = ctx.sign_ecdsa_recoverable(&message, &self.key);
            Ok(MessageSignature::from_secp256k1_recoverable(&sig))
        })
    }
}
