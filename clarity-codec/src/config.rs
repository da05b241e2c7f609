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

use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::projection::BufferEncoding;
use crate::representations::NamePolicy;
use crate::types::MAX_TYPE_DEPTH;

const DEFAULT_REJECT_TRAILING_BYTES: bool = false;
const DEFAULT_STRICT_JSON_COMPAT: bool = true;

#[derive(thiserror::Error, Debug)]
/// An error occurred parsing the provided configuration
pub enum ConfigError {
    /// Error occurred reading config file
    #[error("{0}")]
    InvalidConfig(String),
    /// An error occurred parsing the TOML data
    #[error("{0}")]
    ParseError(String),
    /// A field was malformed
    #[error("identifier={0}, value={1}")]
    BadField(String, String),
}

/// How values are decoded and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Deepest nesting the decoder will follow before failing. At most `MAX_TYPE_DEPTH`.
    pub max_depth: u8,
    /// Grammar applied to tuple keys while decoding
    pub name_policy: NamePolicy,
    /// Whether bytes after a decoded value are an error
    pub reject_trailing_bytes: bool,
    /// How buffers are shown in the s-expression rendering
    pub buffer_encoding: BufferEncoding,
    /// Render integers in JSON as decimal strings
    pub strict_json_compat: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_depth: MAX_TYPE_DEPTH,
            name_policy: NamePolicy::default(),
            reject_trailing_bytes: DEFAULT_REJECT_TRAILING_BYTES,
            buffer_encoding: BufferEncoding::default(),
            strict_json_compat: DEFAULT_STRICT_JSON_COMPAT,
        }
    }
}

/// The parsed, but unvalidated, codec config file
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub max_depth: Option<u8>,
    pub name_policy: Option<NamePolicy>,
    pub reject_trailing_bytes: Option<bool>,
    pub buffer_encoding: Option<BufferEncoding>,
    pub strict_json_compat: Option<bool>,
}

impl RawConfigFile {
    /// load the config from a string
    pub fn load_from_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(data).map_err(|e| ConfigError::ParseError(format!("{e:?}")))?;
        Ok(config)
    }
    /// load the config from a file and parse it
    #[allow(dead_code)]
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        Self::try_from(&PathBuf::from(path))
    }
}

impl TryFrom<&PathBuf> for RawConfigFile {
    type Error = ConfigError;

    fn try_from(path: &PathBuf) -> Result<Self, Self::Error> {
        Self::load_from_str(&fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfig(format!("failed to read config file: {e:?}"))
        })?)
    }
}

impl TryFrom<RawConfigFile> for CodecConfig {
    type Error = ConfigError;

    fn try_from(raw_data: RawConfigFile) -> Result<Self, Self::Error> {
        let defaults = CodecConfig::default();
        let max_depth = raw_data.max_depth.unwrap_or(defaults.max_depth);
        if max_depth == 0 || max_depth > MAX_TYPE_DEPTH {
            return Err(ConfigError::BadField(
                "max_depth".to_string(),
                max_depth.to_string(),
            ));
        }
        Ok(CodecConfig {
            max_depth,
            name_policy: raw_data.name_policy.unwrap_or(defaults.name_policy),
            reject_trailing_bytes: raw_data
                .reject_trailing_bytes
                .unwrap_or(defaults.reject_trailing_bytes),
            buffer_encoding: raw_data.buffer_encoding.unwrap_or(defaults.buffer_encoding),
            strict_json_compat: raw_data
                .strict_json_compat
                .unwrap_or(defaults.strict_json_compat),
        })
    }
}

impl TryFrom<&PathBuf> for CodecConfig {
    type Error = ConfigError;
    fn try_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let config_file = RawConfigFile::try_from(path)?;
        Self::try_from(config_file)
    }
}

impl CodecConfig {
    /// load the config from a string and parse it
    pub fn load_from_str(data: &str) -> Result<Self, ConfigError> {
        RawConfigFile::load_from_str(data)?.try_into()
    }

    /// load the config from a file and parse it
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        Self::try_from(&PathBuf::from(path))
    }
}

impl Display for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "max_depth={} name_policy={:?} reject_trailing_bytes={} buffer_encoding={:?} strict_json_compat={}",
            self.max_depth,
            self.name_policy,
            self.reject_trailing_bytes,
            self.buffer_encoding,
            self.strict_json_compat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(CodecConfig::load_from_str("").unwrap(), CodecConfig::default());
        assert_eq!(CodecConfig::default().max_depth, MAX_TYPE_DEPTH);
    }

    #[test]
    fn parses_every_field() {
        let config = CodecConfig::load_from_str(
            r#"
max_depth = 8
name_policy = "permissive"
reject_trailing_bytes = true
buffer_encoding = "try_ascii"
strict_json_compat = false
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            CodecConfig {
                max_depth: 8,
                name_policy: NamePolicy::Permissive,
                reject_trailing_bytes: true,
                buffer_encoding: BufferEncoding::TryAscii,
                strict_json_compat: false,
            }
        );
    }

    #[test]
    fn rejects_bad_depth() {
        assert!(matches!(
            CodecConfig::load_from_str("max_depth = 0"),
            Err(ConfigError::BadField(field, _)) if field == "max_depth"
        ));
        assert!(matches!(
            CodecConfig::load_from_str("max_depth = 33"),
            Err(ConfigError::BadField(..))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            CodecConfig::load_from_str("name_policy = \"lax\""),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            CodecConfig::load_from_str("unknown_field = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let config = CodecConfig::load_from_file("./src/tests/conf/codec.toml").unwrap();
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.buffer_encoding, BufferEncoding::TryAscii);
        assert!(matches!(
            CodecConfig::load_from_file("./src/tests/conf/missing.toml"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
