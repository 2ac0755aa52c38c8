//! EIP-137 namehash.
//!
//! ```text
//! namehash("")        = 0x00..00
//! namehash(label.rest) = keccak256(namehash(rest) ++ keccak256(label))
//! ```

use crate::errors::*;
use crate::normalize::{normalize_label, normalize_name};
use ensgate_types::{keccak256, NodeId};

/// Keccak-256 of the label's bytes. No normalization is applied.
pub fn label_hash(label: impl AsRef<[u8]>) -> [u8; 32] {
    keccak256(label.as_ref())
}

fn fold_labels<'a>(labels: impl DoubleEndedIterator<Item = &'a [u8]>) -> NodeId {
    let mut node = [0u8; 32];
    let mut buf = [0u8; 64];
    for label in labels.rev() {
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&label_hash(label));
        node = keccak256(&buf);
    }
    NodeId(node)
}

/// Namehash of `name` exactly as written.
///
/// Labels are hashed from the root-most (last) label to the first. The
/// empty name is the root and hashes to [`NodeId::ROOT`].
pub fn namehash(name: &str) -> NodeId {
    if name.is_empty() {
        return NodeId::ROOT;
    }
    fold_labels(name.split('.').map(str::as_bytes))
}

/// Namehash over a raw byte-valued name.
///
/// The bytes must be UTF-8; anything else is reported as
/// [`InvalidName::Encoding`] rather than hashed.
pub fn namehash_bytes(name: &[u8]) -> Result<NodeId> {
    std::str::from_utf8(name)?;
    if name.is_empty() {
        return Ok(NodeId::ROOT);
    }
    Ok(fold_labels(name.split(|b| *b == b'.')))
}

/// Normalize `name` (UTS-46) and then hash it.
pub fn normal_namehash(name: &str) -> Result<NodeId> {
    let normalized = normalize_name(name)?;
    if normalized.is_empty() {
        return Ok(NodeId::ROOT);
    }

    let labels = normalized
        .split('.')
        .map(normalize_label)
        .collect::<Result<Vec<_>>>()?;
    Ok(fold_labels(labels.iter().map(String::as_bytes)))
}
