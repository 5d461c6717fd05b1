//! Phone number canonicalization.
//!
//! Turns whatever the debtor table holds (`(11) 98765-4321`, `+55 11 ...`,
//! `11.98765.4321`) into the digit-only, country-code-prefixed form the
//! messaging client dials.

use std::fmt;

/// Fewest digits a local number may have before the country code is added
pub const MIN_LOCAL_DIGITS: usize = 10;

/// Digit-only, country-code-prefixed dialable address
///
/// Only [`normalize`] constructs this type, so holding one means the number
/// passed the digit-count check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a raw phone string
///
/// Strips every non-digit; fewer than [`MIN_LOCAL_DIGITS`] digits is not
/// dialable. The country code is prepended unless the digits already start
/// with it. A local number that happens to begin with the country code digits
/// is therefore left unprefixed.
pub fn normalize(raw: &str, country_code: &str) -> Option<NormalizedAddress> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() < MIN_LOCAL_DIGITS {
        return None;
    }

    if digits.starts_with(country_code) {
        Some(NormalizedAddress(digits))
    } else {
        Some(NormalizedAddress(format!("{country_code}{digits}")))
    }
}

/// [`normalize`] for an optional source value; missing means not dialable
pub fn normalize_opt(raw: Option<&str>, country_code: &str) -> Option<NormalizedAddress> {
    raw.and_then(|r| normalize(r, country_code))
}
