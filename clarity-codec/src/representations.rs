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

use regex::Regex;

use crate::errors::ConstructionError;

pub const MAX_STRING_LEN: u8 = 128;

lazy_static! {
    pub static ref CLARITY_NAME_REGEX_STRING: String =
        "^[a-zA-Z]([a-zA-Z0-9]|[-_!?+<>=/*])*$|^[-+=/*]$|^[<>]=?$".into();
    pub static ref CLARITY_NAME_REGEX: Regex =
        Regex::new(CLARITY_NAME_REGEX_STRING.as_str()).unwrap();
}

/// Which identifiers are admitted as tuple keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Clarity's identifier grammar.
    #[default]
    Strict,
    /// Any non-empty run of printable, non-whitespace ASCII.
    Permissive,
}

impl NamePolicy {
    pub fn admits(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > MAX_STRING_LEN as usize {
            return false;
        }
        match self {
            NamePolicy::Strict => CLARITY_NAME_REGEX.is_match(name),
            NamePolicy::Permissive => name.bytes().all(|b| b.is_ascii_graphic()),
        }
    }
}

fn is_clarity_name(name: &str) -> bool {
    NamePolicy::Strict.admits(name)
}

// contract names are length-checked only; the length prefix on the wire is one byte
fn is_contract_name(name: &str) -> bool {
    name.len() < MAX_STRING_LEN as usize
}

guarded_string!(
    ClarityName,
    "ClarityName",
    MAX_STRING_LEN,
    is_clarity_name,
    ConstructionError,
    ConstructionError::InvalidName
);

guarded_string!(
    ContractName,
    "ContractName",
    MAX_STRING_LEN,
    is_contract_name,
    ConstructionError,
    ConstructionError::InvalidName
);

impl ClarityName {
    /// Validate `value` under `policy` instead of the default grammar.
    pub fn try_from_policy(value: String, policy: NamePolicy) -> Result<Self, ConstructionError> {
        if policy.admits(&value) {
            Ok(Self(value))
        } else {
            Err(ConstructionError::InvalidName("ClarityName", value))
        }
    }
}
