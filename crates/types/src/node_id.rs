use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a namehash node id.
pub const NODE_ID_BYTES: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NodeIdError {
    #[error("node id must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("node id is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// 32-byte EIP-137 namehash digest identifying a name in the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(pub [u8; NODE_ID_BYTES]);

impl NodeId {
    /// Node id of the empty (root) name.
    pub const ROOT: NodeId = NodeId([0u8; NODE_ID_BYTES]);

    pub fn new(bytes: [u8; NODE_ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NODE_ID_BYTES] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.to_hex())
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = s.strip_prefix("0x").unwrap_or(s);
        if payload.len() != NODE_ID_BYTES * 2 {
            return Err(NodeIdError::InvalidLength {
                expected: NODE_ID_BYTES * 2,
                actual: payload.len(),
            });
        }
        let mut bytes = [0u8; NODE_ID_BYTES];
        hex::decode_to_slice(payload, &mut bytes)?;
        Ok(NodeId(bytes))
    }
}

impl From<[u8; NODE_ID_BYTES]> for NodeId {
    fn from(value: [u8; NODE_ID_BYTES]) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_zero_hex() {
        assert_eq!(
            NodeId::ROOT.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert!(NodeId::default().is_root());
    }

    #[test]
    fn parse_requires_32_bytes() {
        let err = "0xabcd".parse::<NodeId>().unwrap_err();
        assert!(matches!(err, NodeIdError::InvalidLength { actual: 4, .. }));

        let parsed: NodeId = "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
            .parse()
            .unwrap();
        assert_eq!(parsed.as_bytes()[0], 0x93);
    }
}
