//! Core value types shared across the ensgate crates.
//!
//! Addresses are 20-byte account identifiers rendered with the EIP-55
//! mixed-case checksum, node ids are 32-byte namehash digests, and network
//! contexts name an `ecosystem:network` pair such as `ethereum:mainnet`.

pub mod address;
pub mod network;
pub mod node_id;

pub use address::*;
pub use network::*;
pub use node_id::*;

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};

    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
