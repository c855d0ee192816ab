//! # Value Objects
//!
//! Immutable domain primitives for the storage marketplace.
//! These types are defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Block height supplied by the hosting runtime.
pub type BlockHeight = u64;

// =============================================================================
// PRINCIPAL (20 bytes)
// =============================================================================

/// An opaque caller identity supplied by the hosting runtime.
///
/// The domain only ever compares principals for equality. The hex form exists
/// for the JSON call surface and is never inspected for meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(pub [u8; 20]);

impl Principal {
    /// Creates a principal from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}...{}", hex::encode(&self.0[..4]), hex::encode(&self.0[18..]))
    }
}

/// Error returned when a principal string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid principal: {0}")]
pub struct ParsePrincipalError(pub String);

impl FromStr for Principal {
    type Err = ParsePrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParsePrincipalError(e.to_string()))?;
        let bytes: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| {
            ParsePrincipalError(format!("expected 20 bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Principal {
    type Error = ParsePrincipalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        format!("0x{}", hex::encode(principal.0))
    }
}

impl From<[u8; 20]> for Principal {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// REQUEST ID
// =============================================================================

/// Sequential storage request identifier, starting at 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl RequestId {
    /// Returns the identifier that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_hex_roundtrip() {
        let principal = Principal::new([0xAB; 20]);
        let rendered: String = principal.into();
        assert_eq!(rendered.len(), 42);
        assert_eq!(rendered.parse::<Principal>().unwrap(), principal);
    }

    #[test]
    fn test_principal_parse_without_prefix() {
        let digits = "01".repeat(20);
        assert_eq!(digits.parse::<Principal>().unwrap(), Principal::new([1; 20]));
    }

    #[test]
    fn test_principal_rejects_wrong_length() {
        let err = "0xabcd".parse::<Principal>().unwrap_err();
        assert!(err.to_string().contains("expected 20 bytes"));
        assert!("0xzz".parse::<Principal>().is_err());
    }

    #[test]
    fn test_principal_display_is_truncated() {
        let principal = Principal::new([0x11; 20]);
        assert_eq!(principal.to_string(), "0x11111111...1111");
    }

    #[test]
    fn test_principal_serde_as_string() {
        let principal = Principal::new([0x02; 20]);
        let json = serde_json::to_string(&principal).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "02".repeat(20)));
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, principal);
    }

    #[test]
    fn test_request_id_next() {
        assert_eq!(RequestId(0).next(), RequestId(1));
        assert_eq!(serde_json::to_string(&RequestId(7)).unwrap(), "7");
    }
}
