//! Address conversion: accept a name wherever an address is expected.

use crate::errors::ConversionError;
use crate::resolver::{ResolveOptions, Resolver};
use ensgate_namehash::is_valid_name;
use ensgate_types::{decode_address, Address};

/// Converts names like `my-name.eth` into addresses.
#[derive(Debug)]
pub struct AddressConverter {
    resolver: Resolver,
}

impl AddressConverter {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    /// Whether `value` is a name that currently resolves. Never fails:
    /// anything that goes wrong along the way means "not convertible".
    pub fn is_convertible(&mut self, value: &str) -> bool {
        if !value.contains('.') || !is_valid_name(value) {
            return false;
        }
        self.resolver.can_resolve(value)
    }

    /// Resolve `value` as a name.
    pub fn convert(&mut self, value: &str) -> Result<Address, ConversionError> {
        if !is_valid_name(value) {
            return Err(ConversionError::NotConvertible(value.to_string()));
        }
        self.resolver
            .resolve(value, ResolveOptions::default())?
            .ok_or_else(|| ConversionError::Unresolved(value.to_string()))
    }

    /// Parse `value` as a hex address, falling back to name resolution.
    pub fn parse_address_or_name(&mut self, value: &str) -> Result<Address, ConversionError> {
        if let Ok(address) = decode_address(value) {
            return Ok(address);
        }
        self.convert(value)
    }
}
