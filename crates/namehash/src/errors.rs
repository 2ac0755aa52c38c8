//! Error types for name hashing and normalization

use thiserror::Error;

/// A name that cannot be normalized or hashed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidName {
    #[error("{name} is an invalid name, because {reason}")]
    Normalization { name: String, reason: String },

    #[error("cannot generate hash for label '{label}' with a '.'")]
    DotInLabel { label: String },

    #[error("name is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, InvalidName>;
