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

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clarity_common::util::hash::hex_bytes_prefixed;
use clarity_common::util::secp256k1::Secp256k1PrivateKey;

extern crate alloc;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a codec config file
    #[arg(long, short, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Subcommand action to take
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Decode a hex-encoded Clarity value and print it
    Decode(DecodeArgs),
    /// Print the SIP018 hash of a hex-encoded Clarity value
    Hash(HashArgs),
    /// Print the SIP018 envelope for a domain and message, and the hash to be signed
    EncodeMessage(StructuredDataArgs),
    /// Sign a domain and message, printing the RSV signature
    Sign(SignArgs),
}

/// How `decode` prints its value
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Clarity s-expression, e.g. `(some u1)`
    #[default]
    Repr,
    /// Type descriptor, e.g. `(optional uint)`
    Type,
    /// Typed JSON projection
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// The serialized value in hex, or "-" to read it from stdin
    #[arg(value_parser = parse_data)]
    // Note this weirdness is due to https://github.com/clap-rs/clap/discussions/4695
    pub data: alloc::vec::Vec<u8>,
    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Repr)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct HashArgs {
    /// The serialized value in hex, or "-" to read it from stdin
    #[arg(value_parser = parse_data)]
    // Note this weirdness is due to https://github.com/clap-rs/clap/discussions/4695
    pub data: alloc::vec::Vec<u8>,
}

#[derive(Parser, Debug, Clone)]
pub struct StructuredDataArgs {
    /// The serialized domain tuple in hex
    #[arg(long, value_parser = parse_hex)]
    // Note this weirdness is due to https://github.com/clap-rs/clap/discussions/4695
    pub domain: alloc::vec::Vec<u8>,
    /// The serialized message in hex
    #[arg(long, value_parser = parse_hex)]
    // See the note on `domain`
    pub message: alloc::vec::Vec<u8>,
}

#[derive(Parser, Debug, Clone)]
pub struct SignArgs {
    /// The domain and message to sign
    #[clap(flatten)]
    pub data: StructuredDataArgs,
    /// The Stacks private key to use in hexademical format
    #[arg(short, long, value_parser = parse_private_key)]
    pub private_key: Secp256k1PrivateKey,
}

/// Parse a hex argument, with or without a leading 0x
fn parse_hex(data: &str) -> Result<Vec<u8>, String> {
    hex_bytes_prefixed(data.trim()).map_err(|e| format!("Failed to decode provided data: {e}"))
}

/// Parse the hexadecimal Stacks private key
fn parse_private_key(private_key: &str) -> Result<Secp256k1PrivateKey, String> {
    Secp256k1PrivateKey::from_hex(private_key).map_err(|e| format!("Invalid private key: {e}"))
}

/// Parse the input data
fn parse_data(data: &str) -> Result<Vec<u8>, String> {
    read_data(data, io::stdin())
}

/// Parse `data` as hex, or read the hex from `input` when `data` is "-"
fn read_data<R: Read>(data: &str, mut input: R) -> Result<Vec<u8>, String> {
    if data == "-" {
        let mut data = String::new();
        input
            .read_to_string(&mut data)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        parse_hex(&data)
    } else {
        parse_hex(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x0703").unwrap(), vec![0x07, 0x03]);
        assert_eq!(parse_hex("0703\n").unwrap(), vec![0x07, 0x03]);
        assert!(parse_hex("070").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_read_data_from_input() {
        let stdin = io::Cursor::new("0x0d0000000b48656c6c6f20576f726c64\n");
        assert_eq!(
            read_data("-", stdin).unwrap(),
            b"\x0d\x00\x00\x00\x0bHello World".to_vec()
        );
        assert!(read_data("-", io::Cursor::new("0d0")).is_err());
        // a literal argument never touches the input
        assert_eq!(read_data("03", io::Cursor::new("zz")).unwrap(), vec![0x03]);
    }

    #[test]
    fn test_parse_cli() {
        let cli = Cli::try_parse_from(["clarity-codec", "decode", "0x03", "--format", "json"])
            .unwrap();
        assert!(cli.config.is_none());
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.data, vec![0x03]);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("Unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "clarity-codec",
            "sign",
            "--domain",
            "03",
            "--message",
            "04",
            "--private-key",
            "753b7cc01a1a2e86221266a154af739463fce51219d97e4f856cd7200c3bd2a601",
            "--config",
            "codec.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("codec.toml")));
        match cli.command {
            Command::Sign(args) => {
                assert_eq!(args.data.domain, vec![0x03]);
                assert_eq!(args.data.message, vec![0x04]);
            }
            other => panic!("Unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["clarity-codec", "hash", "0x0"]).is_err());
        assert!(Cli::try_parse_from([
            "clarity-codec",
            "sign",
            "--domain",
            "03",
            "--message",
            "04",
            "--private-key",
            "00",
        ])
        .is_err());
    }
}
