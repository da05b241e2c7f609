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

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::util::HexError;

/// A SHA-256 digest.
pub struct Sha256Sum(pub [u8; 32]);
impl_array_newtype!(Sha256Sum, u8, 32);
impl_array_hexstring_fmt!(Sha256Sum);
impl_byte_array_newtype!(Sha256Sum, u8, 32);

impl Sha256Sum {
    pub fn from_data(data: &[u8]) -> Sha256Sum {
        Sha256Sum(Sha256::digest(data).into())
    }
}

/// SHA-256 of SHA-256, used for c32check checksums.
pub fn double_sha256(data: &[u8]) -> Sha256Sum {
    Sha256Sum(Sha256::digest(Sha256::digest(data)).into())
}

/// Convert a hexadecimal-encoded string to its corresponding bytes
pub fn hex_bytes(s: &str) -> Result<Vec<u8>, HexError> {
    if s.len() % 2 != 0 {
        return Err(HexError::BadLength(s.len()));
    }
    let mut v = Vec::with_capacity(s.len() / 2);
    let mut chars = s.chars();
    while let (Some(hi), Some(lo)) = (chars.next(), chars.next()) {
        match (hi.to_digit(16), lo.to_digit(16)) {
            (None, _) => return Err(HexError::BadCharacter(hi)),
            (_, None) => return Err(HexError::BadCharacter(lo)),
            (Some(hi), Some(lo)) => v.push((hi * 0x10 + lo) as u8),
        }
    }
    Ok(v)
}

/// Like `hex_bytes`, but tolerates a leading `0x` or `0X`.
pub fn hex_bytes_prefixed(s: &str) -> Result<Vec<u8>, HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex_bytes(digits)
}

/// Convert a slice of u8 to a hex string
pub fn to_hex(s: &[u8]) -> String {
    let mut r = String::with_capacity(s.len() * 2);
    for b in s.iter() {
        // writing to a String cannot fail
        let _ = write!(r, "{:02x}", b);
    }
    r
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let bytes = hex_bytes("00deadBEEF").unwrap();
        assert_eq!(bytes, vec![0x00, 0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(to_hex(&bytes), "00deadbeef");
        assert_eq!(hex_bytes("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hex_rejects_malformed_input() {
        assert_eq!(hex_bytes("abc"), Err(HexError::BadLength(3)));
        assert_eq!(hex_bytes("zz"), Err(HexError::BadCharacter('z')));
        assert_eq!(hex_bytes("0g"), Err(HexError::BadCharacter('g')));
        assert_eq!(hex_bytes_prefixed("0x0a").unwrap(), vec![0x0a]);
        assert_eq!(hex_bytes_prefixed("0X0A").unwrap(), vec![0x0a]);
    }

    #[test]
    fn sha256_known_digest() {
        assert_eq!(
            Sha256Sum::from_data(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            Sha256Sum::from_hex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap(),
            Sha256Sum::from_data(b"")
        );
        assert!(Sha256Sum::from_hex("00").is_err());
    }
}
