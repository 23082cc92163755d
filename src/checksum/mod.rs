//! Check-digit algorithms for Brazilian fiscal identifiers.
//!
//! All functions are pure: they take a string with formatting characters
//! already removed (see [`strip_formatting`](crate::core::codes::strip_formatting))
//! and return whether the check digits match.
//!
//! # Example
//!
//! ```
//! use nota::checksum::*;
//!
//! assert!(is_valid_cnpj("11222333000181"));
//! assert!(is_valid_cpf("52998224725"));
//! assert!(is_valid_access_key("35240511222333000181550010000001231123456785"));
//! assert!(is_valid_registration("SP", "110042490114"));
//! ```

mod access_key;
mod national;
mod registration;

pub use access_key::{AccessKey, check_digit as access_key_check_digit, is_valid_access_key};
pub use national::{check_digits, is_valid_cnpj, is_valid_cpf, is_valid_national_id};
pub use registration::{
    Band, CheckDigit, EXEMPT, Layout, Mapping, Modulus, RegistrationScheme, Segment, is_valid_registration,
    scheme_for, schemes,
};

/// Sum of `digit * weight` over zipped slices.
pub(crate) fn weighted_sum(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum()
}

/// Parse an all-digit string, `None` on any other character.
pub(crate) fn to_digits(value: &str) -> Option<Vec<u32>> {
    value.chars().map(|c| c.to_digit(10)).collect()
}

/// Mod-11 check digit: `0` when the remainder is 0 or 1, else `11 - remainder`.
pub(crate) fn mod11_digit(sum: u32) -> u32 {
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}
