//! Cuid identifier token
//!
//! A Cuid is the opaque id the platform assigns to ontology entries and
//! remote entities: 25 lowercase alphanumeric characters beginning with `c`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{ValidationError, ValidationResult};

/// Length of every Cuid
pub const CUID_LENGTH: usize = 25;

const CUID_PATTERN: &str = "^c[a-z0-9]{24}$";

fn cuid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CUID_PATTERN).expect("static cuid pattern is valid"))
}

/// Validated Cuid token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cuid(String);

impl Cuid {
    /// Parses a Cuid, reporting failures against the `cuid` field.
    pub fn parse(value: impl Into<String>) -> ValidationResult<Self> {
        Self::parse_field("cuid", value)
    }

    /// Parses a Cuid, reporting failures against the given field name.
    pub fn parse_field(field: &str, value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if cuid_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::invalid_format(
                field,
                format!("a {}-character lowercase cuid starting with 'c'", CUID_LENGTH),
                &value,
            ))
        }
    }

    /// Generates a fresh Cuid-shaped token.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("c{}", &hex[..CUID_LENGTH - 1]))
    }

    /// Returns the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cuid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cuid {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Cuid> for String {
    fn from(cuid: Cuid) -> Self {
        cuid.0
    }
}

impl AsRef<str> for Cuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
