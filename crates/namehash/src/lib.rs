//! Name hashing and validation for ENS-style hierarchical names.
//!
//! Everything in this crate is pure computation: no I/O, no state. The
//! namehash digest is the key used by registry lookups, so it has to match
//! EIP-137 bit for bit.

pub mod errors;
pub mod namehash;
pub mod normalize;
pub mod validation;

pub use errors::*;
pub use namehash::{label_hash, namehash, namehash_bytes, normal_namehash};
pub use normalize::{normalize_label, normalize_name};
pub use validation::is_valid_name;
