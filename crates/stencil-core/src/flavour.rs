//! Container flavour identification.
//!
//! The pipeline processes two container kinds through identical machinery:
//! the map flavour (entries carry a value field) and the set flavour
//! (entries do not). The flavour parameterizes field-index tables and
//! branch selection; nothing else differs between the two runs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The two container kinds the engine specializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavour {
    /// Map-like container whose entries carry a value field.
    #[default]
    Map,
    /// Set-like container whose entries carry no value field.
    Set,
}

impl Flavour {
    /// Returns the lower-case identifier for this flavour.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Set => "set",
        }
    }

    /// Returns both flavours.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Map, Self::Set]
    }
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a flavour identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported container flavour: '{0}'")]
pub struct FlavourParseError(String);

impl FlavourParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for Flavour {
    type Err = FlavourParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "map" => Ok(Self::Map),
            "set" => Ok(Self::Set),
            other => Err(FlavourParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("map", Flavour::Map)]
    #[case("set", Flavour::Set)]
    #[case("Map", Flavour::Map)]
    #[case("  SET ", Flavour::Set)]
    fn from_str_parses_flavour_names(#[case] input: &str, #[case] expected: Flavour) {
        assert_eq!(Flavour::from_str(input), Ok(expected));
    }

    #[test]
    fn from_str_returns_error_for_unknown() {
        let result: Result<Flavour, _> = "deque".parse();
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for flavour in Flavour::all() {
            assert_eq!(flavour.to_string(), flavour.as_str());
        }
    }
}
