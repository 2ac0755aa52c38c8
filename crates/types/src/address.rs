use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::keccak256;

/// Errors that can occur when parsing an account address string.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AddressError {
    #[error("address must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Number of raw bytes contained in an address.
pub const ADDRESS_BYTES: usize = 20;
/// Number of hex characters in an address without the `0x` prefix.
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_BYTES * 2;

/// A 20-byte account address.
///
/// Equality is byte-wise; the textual form produced by [`fmt::Display`] is
/// the EIP-55 checksummed encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    pub fn new(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Render the address with the EIP-55 mixed-case checksum.
    ///
    /// Each hex letter is upper-cased when the matching nibble of
    /// `keccak256(lowercase_hex)` is 8 or higher.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());

        let mut encoded = String::with_capacity(2 + ADDRESS_HEX_LENGTH);
        encoded.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                encoded.push(ch.to_ascii_uppercase());
            } else {
                encoded.push(ch);
            }
        }
        encoded
    }
}

/// Strip an optional `0x`/`0X` prefix.
fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Attempt to decode a hex address string (any letter case, optional `0x`).
pub fn decode_address(address: &str) -> Result<Address, AddressError> {
    let payload = strip_hex_prefix(address.trim());
    if payload.len() != ADDRESS_HEX_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ADDRESS_HEX_LENGTH,
            actual: payload.len(),
        });
    }

    let mut bytes = [0u8; ADDRESS_BYTES];
    hex::decode_to_slice(payload, &mut bytes)?;
    Ok(Address(bytes))
}

/// Check whether the provided string decodes as an address.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Check whether `address` is written exactly in its EIP-55 checksummed form.
pub fn is_checksum_address(address: &str) -> bool {
    match decode_address(address) {
        Ok(decoded) => address.trim() == decoded.to_checksum(),
        Err(_) => false,
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_address(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(value: [u8; ADDRESS_BYTES]) -> Self {
        Address(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_checksum()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode_address(&value)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        decode_address(value)
    }
}
