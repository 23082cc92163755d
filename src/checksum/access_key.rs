//! 44-digit access key (chave de acesso).

use serde::{Deserialize, Serialize};

use super::{mod11_digit, to_digits};

/// Number of digits in an access key.
pub const ACCESS_KEY_LEN: usize = 44;

/// Check digit for the first 43 digits of an access key.
///
/// Weights 2 through 9 repeat from the rightmost digit leftwards;
/// remainders 0 and 1 both map to digit 0.
pub fn check_digit(prefix: &str) -> Option<u32> {
    if prefix.len() != ACCESS_KEY_LEN - 1 {
        return None;
    }
    let digits = to_digits(prefix)?;
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2u32..=9).cycle())
        .map(|(d, w)| d * w)
        .sum();
    Some(mod11_digit(sum))
}

/// Validate length, digits, and the trailing check digit.
pub fn is_valid_access_key(key: &str) -> bool {
    if key.len() != ACCESS_KEY_LEN || !key.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let expected = check_digit(&key[..ACCESS_KEY_LEN - 1]);
    let actual = key[ACCESS_KEY_LEN - 1..].parse::<u32>().ok();
    expected.is_some() && expected == actual
}

/// Segments of an access key.
///
/// ```
/// use nota::checksum::AccessKey;
///
/// let key = AccessKey::parse("35240511222333000181550010000001231123456785").unwrap();
/// assert_eq!(key.jurisdiction_code, "35");
/// assert_eq!(key.model, "55");
/// assert_eq!(key.number, "000000123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    /// IBGE code of the issuing UF.
    pub jurisdiction_code: String,
    /// `YYMM` of emission.
    pub year_month: String,
    /// CNPJ (or zero-padded CPF) of the issuer.
    pub issuer_id: String,
    pub model: String,
    pub series: String,
    pub number: String,
    pub emission_type: String,
    pub numeric_code: String,
    pub check_digit: String,
}

impl AccessKey {
    /// Split a 44-digit key. Does not verify the check digit.
    pub fn parse(key: &str) -> Option<Self> {
        if key.len() != ACCESS_KEY_LEN || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            jurisdiction_code: key[0..2].to_string(),
            year_month: key[2..6].to_string(),
            issuer_id: key[6..20].to_string(),
            model: key[20..22].to_string(),
            series: key[22..25].to_string(),
            number: key[25..34].to_string(),
            emission_type: key[34..35].to_string(),
            numeric_code: key[35..43].to_string(),
            check_digit: key[43..44].to_string(),
        })
    }
}
