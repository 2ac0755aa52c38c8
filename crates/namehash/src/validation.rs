//! Syntactic name validation.

use crate::normalize::normalize_name;

/// Whether `value` is plausibly a resolvable name.
///
/// A bare label is valid input to [`crate::namehash`] but is not accepted
/// here: a resolvable name needs at least one `.` so that plain identifiers
/// are never mistaken for names. Empty labels and names that fail
/// normalization are rejected as well. This never touches the network.
pub fn is_valid_name(value: &str) -> bool {
    if !value.contains('.') {
        return false;
    }

    match normalize_name(value) {
        Ok(normalized) => normalized.split('.').all(|label| !label.is_empty()),
        Err(_) => false,
    }
}
