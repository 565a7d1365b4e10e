//! City code types.

use std::fmt;

/// Error returned when parsing an invalid city code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid city code {input:?}: {reason}")]
pub struct InvalidCityCode {
    input: String,
    reason: &'static str,
}

/// A valid 3-letter metropolitan city code (e.g. `NYC`, `TYO`).
///
/// City codes are always 3 uppercase ASCII letters. Any `CityCode` value is
/// valid by construction, so fare keys built from it are already
/// case-normalised.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::CityCode;
///
/// let tyo = CityCode::parse("TYO").unwrap();
/// assert_eq!(tyo.as_str(), "TYO");
///
/// // Strict parsing rejects lowercase
/// assert!(CityCode::parse("tyo").is_err());
///
/// // Normalised parsing accepts it
/// assert_eq!(CityCode::parse_normalized(" tyo ").unwrap(), tyo);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityCode([u8; 3]);

impl CityCode {
    /// Parse a city code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCityCode> {
        let bytes = s.as_bytes();
        let invalid = |reason| InvalidCityCode {
            input: s.to_string(),
            reason,
        };

        if bytes.len() != 3 {
            return Err(invalid("must be exactly 3 characters"));
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(invalid("must be uppercase ASCII letters A-Z"));
        }

        Ok(CityCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Build a code from a literal known at compile time.
    ///
    /// Panics (a compile error in const context) if the bytes are not
    /// uppercase ASCII letters.
    pub const fn known(code: &[u8; 3]) -> Self {
        let mut i = 0;
        while i < code.len() {
            assert!(code[i].is_ascii_uppercase(), "city code must be A-Z");
            i += 1;
        }
        CityCode(*code)
    }

    /// Parse a city code after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCityCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the city code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for CityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CityCode({})", self.as_str())
    }
}

impl fmt::Display for CityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CityCode {
    type Err = InvalidCityCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_normalized(s)
    }
}

impl serde::Serialize for CityCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for CityCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CityCode::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}
