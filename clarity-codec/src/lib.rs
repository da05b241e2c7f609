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

#![allow(non_camel_case_types)]
#![allow(clippy::result_large_err)]

#[allow(unused_imports)]
#[macro_use(o, slog_log, slog_trace, slog_debug, slog_info, slog_warn, slog_error)]
extern crate slog;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate clarity_common;

#[cfg(test)]
extern crate rstest_reuse;

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod projection;
pub mod representations;
pub mod signed_structured_data;
pub mod types;

#[cfg(test)]
mod tests;

pub use crate::codec::{BytesReader, Endianness};
pub use crate::config::CodecConfig;
pub use crate::errors::{ConstructionError, SerializationError};
pub use crate::projection::BufferEncoding;
pub use crate::representations::{ClarityName, ContractName, NamePolicy};
pub use crate::types::integer::{IntegerError, IntegerInput};
pub use crate::types::signatures::TypeSignature;
pub use crate::types::Value;
