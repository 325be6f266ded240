//! Location and company types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid location name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location name: {reason}")]
pub struct InvalidLocationName {
    reason: &'static str,
}

/// Maximum accepted length of a location name, in bytes.
const MAX_NAME_LEN: usize = 64;

/// The name of a location in the route graph (e.g. "Earth").
///
/// Names are non-empty, carry no surrounding whitespace and contain no
/// control characters or path separators, so they can be used verbatim
/// as URL path segments and cache keys.
///
/// # Examples
///
/// ```
/// use travel_server::domain::LocationName;
///
/// let earth = LocationName::parse("Earth").unwrap();
/// assert_eq!(earth.as_str(), "Earth");
///
/// assert!(LocationName::parse("").is_err());
/// assert!(LocationName::parse(" Earth").is_err());
/// assert!(LocationName::parse("Earth/Moon").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationName(String);

impl LocationName {
    /// Parse a location name.
    pub fn parse(s: &str) -> Result<Self, InvalidLocationName> {
        if s.is_empty() {
            return Err(InvalidLocationName {
                reason: "must not be empty",
            });
        }
        if s.len() > MAX_NAME_LEN {
            return Err(InvalidLocationName {
                reason: "must be at most 64 bytes",
            });
        }
        if s.trim() != s {
            return Err(InvalidLocationName {
                reason: "must not have surrounding whitespace",
            });
        }
        if s.chars().any(|c| c.is_control() || c == '/') {
            return Err(InvalidLocationName {
                reason: "must not contain control characters or '/'",
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationName {
    type Error = InvalidLocationName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocationName> for String {
    fn from(name: LocationName) -> Self {
        name.0
    }
}

impl fmt::Debug for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationName({})", self.0)
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A location as it appears in a price-list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

/// A transport company offering flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_names() {
        assert!(LocationName::parse("Earth").is_ok());
        assert!(LocationName::parse("Alpha Centauri").is_ok());
        assert!(LocationName::parse("P3X-888").is_ok());
    }

    #[test]
    fn reject_empty_and_padded() {
        assert!(LocationName::parse("").is_err());
        assert!(LocationName::parse(" Mars").is_err());
        assert!(LocationName::parse("Mars\n").is_err());
    }

    #[test]
    fn reject_separators_and_control() {
        assert!(LocationName::parse("Mars/Phobos").is_err());
        assert!(LocationName::parse("Ma\u{7}rs").is_err());
    }

    #[test]
    fn reject_overlong() {
        let long = "x".repeat(65);
        assert!(LocationName::parse(&long).is_err());
        assert!(LocationName::parse(&long[..64]).is_ok());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let name: LocationName = serde_json::from_str("\"Venus\"").unwrap();
        assert_eq!(name.as_str(), "Venus");
        assert!(serde_json::from_str::<LocationName>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Venus\"");
    }

    #[test]
    fn display_and_debug() {
        let name = LocationName::parse("Neptune").unwrap();
        assert_eq!(name.to_string(), "Neptune");
        assert_eq!(format!("{:?}", name), "LocationName(Neptune)");
    }
}
