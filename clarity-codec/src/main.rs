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

#[allow(unused_imports)]
#[macro_use(o, slog_log, slog_debug, slog_info, slog_error)]
extern crate slog;

#[macro_use]
extern crate clarity_common;

use clap::Parser;
use clarity_codec::cli::{
    Cli, Command, DecodeArgs, HashArgs, OutputFormat, SignArgs, StructuredDataArgs,
};
use clarity_codec::config::{CodecConfig, ConfigError};
use clarity_codec::projection::{cv_to_json, cv_to_string, type_string};
use clarity_codec::signed_structured_data::{
    encode_structured_data, recover_structured_data_signer, sign_structured_data,
    structured_data_hash, StructuredDataError,
};
use clarity_codec::{SerializationError, Value};
use clarity_common::util::hash::{to_hex, Sha256Sum};

#[derive(thiserror::Error, Debug)]
enum CommandError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to decode value: {0}")]
    Decode(#[from] SerializationError),
    #[error(transparent)]
    StructuredData(#[from] StructuredDataError),
}

fn load_config(cli: &Cli) -> Result<CodecConfig, CommandError> {
    let config = match &cli.config {
        Some(path) => CodecConfig::try_from(path)?,
        None => CodecConfig::default(),
    };
    debug!("Loaded codec config"; "config" => %config);
    Ok(config)
}

fn handle_decode(args: &DecodeArgs, config: &CodecConfig) -> Result<String, CommandError> {
    let value = Value::try_deserialize_with(&args.data, config)?;
    Ok(match args.format {
        OutputFormat::Repr => cv_to_string(&value, config.buffer_encoding),
        OutputFormat::Type => type_string(&value),
        OutputFormat::Json => cv_to_json(&value, config.strict_json_compat).to_string(),
    })
}

fn handle_hash(args: &HashArgs, config: &CodecConfig) -> Result<String, CommandError> {
    let value = Value::try_deserialize_with(&args.data, config)?;
    Ok(structured_data_hash(&value).to_hex())
}

fn decode_structured_data_args(
    args: &StructuredDataArgs,
    config: &CodecConfig,
) -> Result<(Value, Value), CommandError> {
    let domain = Value::try_deserialize_with(&args.domain, config)?;
    let message = Value::try_deserialize_with(&args.message, config)?;
    Ok((domain, message))
}

fn handle_encode_message(
    args: &StructuredDataArgs,
    config: &CodecConfig,
) -> Result<String, CommandError> {
    let (domain, message) = decode_structured_data_args(args, config)?;
    let encoded = encode_structured_data(&message, &domain)?;
    Ok(format!(
        "Envelope: {}\nMessage hash: {}",
        to_hex(&encoded),
        Sha256Sum::from_data(&encoded)
    ))
}

fn handle_sign(args: &SignArgs, config: &CodecConfig) -> Result<String, CommandError> {
    let (domain, message) = decode_structured_data_args(&args.data, config)?;
    let signature = sign_structured_data(&message, &domain, &args.private_key)?;
    let signer = recover_structured_data_signer(&message, &domain, &signature)?;
    Ok(format!(
        "Signature: {}\nSigner: {}",
        to_hex(&signature.to_rsv()),
        signer.to_hex()
    ))
}

fn run(cli: &Cli) -> Result<String, CommandError> {
    let config = load_config(cli)?;
    match &cli.command {
        Command::Decode(args) => handle_decode(args, &config),
        Command::Hash(args) => handle_hash(args, &config),
        Command::EncodeMessage(args) => handle_encode_message(args, &config),
        Command::Sign(args) => handle_sign(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("Command failed"; "err" => %e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
