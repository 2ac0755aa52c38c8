//! UTS-46 name normalization.
//!
//! Normalization is an optional pre-step to hashing: it case-folds and maps
//! compatibility characters so that visually equivalent names share a node
//! id. STD3 rules are enforced, so characters outside the hostname grammar
//! are rejected.

use crate::errors::*;

fn uts46_remap(value: &str) -> Result<String> {
    let (mapped, outcome) = idna::Config::default()
        .use_std3_ascii_rules(true)
        .transitional_processing(false)
        .to_unicode(value);

    outcome.map_err(|errors| InvalidName::Normalization {
        name: value.to_string(),
        reason: format!("{errors:?}"),
    })?;
    Ok(mapped)
}

/// Normalize a full name. The empty name stays empty.
pub fn normalize_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Ok(String::new());
    }
    uts46_remap(name)
}

/// Normalize a single label.
///
/// Some code points (full-width and ideographic full stops) map to `.`; a
/// label that turns into more than one label after mapping is rejected.
pub fn normalize_label(label: &str) -> Result<String> {
    let mapped = normalize_name(label)?;
    if mapped.contains('.') {
        return Err(InvalidName::DotInLabel {
            label: label.to_string(),
        });
    }
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_ascii() {
        assert_eq!(normalize_name("Vitalik.ETH").unwrap(), "vitalik.eth");
    }

    #[test]
    fn empty_name_is_root() {
        assert_eq!(normalize_name("").unwrap(), "");
    }

    #[test]
    fn full_width_stop_inside_label_is_rejected() {
        let err = normalize_label("foo\u{FF0E}bar").unwrap_err();
        assert_eq!(
            err,
            InvalidName::DotInLabel {
                label: "foo\u{FF0E}bar".to_string()
            }
        );
    }

    #[test]
    fn std3_disallowed_characters_fail() {
        assert!(matches!(
            normalize_name("spa ce.eth"),
            Err(InvalidName::Normalization { .. })
        ));
        assert!(normalize_name("a/b.eth").is_err());
    }
}
