//! # Account Addresses
//!
//! An [`Address`] is an opaque 20-byte account identity. The ledger only
//! ever compares and hashes addresses; it attaches no meaning to the bytes.
//!
//! Two textual forms are accepted:
//!
//! - `0x`-prefixed hex (`0x5b38da6a701c568545dcfcb03fcb875f56beddc4`), the
//!   canonical rendering.
//! - A development label (`"admin"`, `"student1"`), mapped to the first 20
//!   bytes of `BLAKE3(label)`. Labels make scripts and tests readable while
//!   still producing stable, collision-resistant identities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Errors that can occur while parsing an address.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AddressError {
    /// The input was empty.
    #[error("empty address")]
    Empty,

    /// Hex form without the `0x` prefix.
    #[error("address {0:?} is missing the 0x prefix")]
    MissingPrefix(String),

    /// The hex payload is not exactly 40 characters.
    #[error("address must be {expected} hex characters, got {got}")]
    InvalidLength {
        /// Expected number of hex characters.
        expected: usize,
        /// Number of hex characters supplied.
        got: usize,
    },

    /// The hex payload contains a non-hex character.
    #[error("invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 20-byte account identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw address bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Derives a deterministic address from a human-readable label.
    pub fn from_label(label: &str) -> Self {
        let digest = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest.as_bytes()[..ADDRESS_LENGTH]);
        Self::from_bytes(bytes)
    }

    /// Parses the canonical `0x`-prefixed hex form.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the prefix, length, or hex digits are wrong.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        let payload = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;
        if payload.len() != ADDRESS_LENGTH * 2 {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH * 2,
                got: payload.len(),
            });
        }
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(payload, &mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Accepts either form: `0x`-hex is parsed, anything else is treated as
    /// a label.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Empty`] for an empty string, or the hex
    /// parsing error for malformed `0x` input.
    pub fn resolve(s: &str) -> Result<Self, AddressError> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Ok(Self::from_label(s))
        }
    }

    /// Returns the canonical lowercase hex rendering with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    /// Deserializes through [`Address::resolve`], so JSON documents may use
    /// labels in place of hex.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::resolve(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let addr = Address::from_label("student1");
        let parsed: Address = addr.to_hex().parse().unwrap();
        assert_eq!(parsed, addr);
        assert_eq!(addr.to_string().len(), 2 + ADDRESS_LENGTH * 2);
    }

    #[test]
    fn labels_are_deterministic_and_distinct() {
        assert_eq!(Address::from_label("admin"), Address::from_label("admin"));
        assert_ne!(Address::from_label("admin"), Address::from_label("university"));
    }

    #[test]
    fn resolve_accepts_both_forms() {
        let hex = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
        assert_eq!(Address::resolve(hex).unwrap().to_hex(), hex);
        assert_eq!(
            Address::resolve("provider").unwrap(),
            Address::from_label("provider")
        );
        assert_eq!(Address::resolve(""), Err(AddressError::Empty));
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert!(matches!(
            Address::from_hex("5b38da6a701c568545dcfcb03fcb875f56beddc4"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert_eq!(
            Address::from_hex("0x1234"),
            Err(AddressError::InvalidLength { expected: 40, got: 4 })
        );
        let bad_hex = Address::from_hex("0xzz38da6a701c568545dcfcb03fcb875f56beddc4").unwrap_err();
        assert!(matches!(bad_hex, AddressError::InvalidHex(_)));
        assert_eq!(bad_hex.clone(), bad_hex);
        assert_ne!(bad_hex, AddressError::Empty);
    }

    #[test]
    fn raw_bytes_round_trip() {
        let mut raw = [0u8; ADDRESS_LENGTH];
        raw[0] = 0xab;
        raw[ADDRESS_LENGTH - 1] = 0x01;
        let addr = Address::from_bytes(raw);
        assert_eq!(addr.as_bytes(), &raw);
        assert_eq!(addr.to_hex(), "0xab00000000000000000000000000000000000001");
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
    }

    #[test]
    fn serde_accepts_labels() {
        let addr: Address = serde_json::from_str("\"student2\"").unwrap();
        assert_eq!(addr, Address::from_label("student2"));
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
    }
}
