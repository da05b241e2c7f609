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

//! A bounds-checked cursor over a borrowed byte buffer.

use num_bigint::BigUint;

use crate::errors::SerializationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// Reads from `data` starting at `offset`. Slices returned by `read_bytes` borrow from the
/// underlying buffer, so nothing is copied until a caller decides to own the bytes.
#[derive(Debug, Clone)]
pub struct BytesReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BytesReader<'a> {
    pub fn new(data: &'a [u8]) -> BytesReader<'a> {
        BytesReader { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Return `[offset, offset + n)` and advance. A short buffer is an error, never a truncated slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], SerializationError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(SerializationError::UnexpectedEof {
                needed: n,
                remaining,
            });
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerializationError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, SerializationError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, SerializationError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, SerializationError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_big_uint(
        &mut self,
        length: usize,
        endianness: Endianness,
    ) -> Result<BigUint, SerializationError> {
        let bytes = self.read_bytes(length)?;
        Ok(match endianness {
            Endianness::Big => BigUint::from_bytes_be(bytes),
            Endianness::Little => BigUint::from_bytes_le(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_the_cursor() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0xaa, 0xbb];
        let mut r = BytesReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16_be().unwrap(), 2);
        assert_eq!(r.read_u32_be().unwrap(), 3);
        assert_eq!(r.offset(), 7);
        assert_eq!(r.remaining(), 2);
        let tail = r.read_bytes(2).unwrap();
        assert_eq!(tail, &[0xaa, 0xbb]);
        assert!(r.is_empty());
    }

    #[test]
    fn read_bytes_borrows_input() {
        let data = vec![1u8, 2, 3, 4];
        let mut r = BytesReader::new(&data);
        let slice = r.read_bytes(3).unwrap();
        assert_eq!(slice.as_ptr(), data.as_ptr());
    }

    #[test]
    fn short_reads_are_errors() {
        let data = [0x00, 0x01];
        let mut r = BytesReader::new(&data);
        assert_eq!(
            r.read_u32_be(),
            Err(SerializationError::UnexpectedEof {
                needed: 4,
                remaining: 2
            })
        );
        // a failed read leaves the cursor in place
        assert_eq!(r.offset(), 0);
        assert_eq!(r.read_u16_be().unwrap(), 1);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn big_uint_endianness() {
        let data = [0x01, 0x02, 0x01, 0x02];
        let mut r = BytesReader::new(&data);
        assert_eq!(
            r.read_big_uint(2, Endianness::Big).unwrap(),
            BigUint::from(0x0102u32)
        );
        assert_eq!(
            r.read_big_uint(2, Endianness::Little).unwrap(),
            BigUint::from(0x0201u32)
        );
        assert!(r.read_big_uint(1, Endianness::Big).is_err());
    }
}
