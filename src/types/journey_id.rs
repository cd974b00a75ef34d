// ABOUTME: Journey identifier validation.
// ABOUTME: Journey ids name state directories and lock files, so the character set is restricted.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JourneyIdError {
    #[error("journey id cannot be empty")]
    Empty,

    #[error("journey id exceeds maximum length of 64 characters")]
    TooLong,

    #[error("journey id cannot start or end with a separator")]
    EdgeSeparator,

    #[error("invalid character in journey id: '{0}'")]
    InvalidChar(char),
}

/// Identifier of a journey (an ordered sequence of touchpoints).
///
/// Restricted to lowercase alphanumerics, hyphens, and underscores so the id
/// can be used verbatim as a directory and lock-file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JourneyId(String);

impl JourneyId {
    pub fn new(value: &str) -> Result<Self, JourneyIdError> {
        if value.is_empty() {
            return Err(JourneyIdError::Empty);
        }

        if value.len() > 64 {
            return Err(JourneyIdError::TooLong);
        }

        if value.starts_with(['-', '_']) || value.ends_with(['-', '_']) {
            return Err(JourneyIdError::EdgeSeparator);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '_' {
                return Err(JourneyIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for JourneyId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for JourneyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        JourneyId::new(&value).map_err(serde::de::Error::custom)
    }
}
