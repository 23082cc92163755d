//! CPF (individuals, 11 digits) and CNPJ (companies, 14 digits).

use super::{mod11_digit, to_digits, weighted_sum};

const CPF_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Validate a CPF or a CNPJ, chosen by length.
pub fn is_valid_national_id(id: &str) -> bool {
    match id.len() {
        11 => is_valid_cpf(id),
        14 => is_valid_cnpj(id),
        _ => false,
    }
}

/// Validate an 11-digit CPF.
pub fn is_valid_cpf(cpf: &str) -> bool {
    verify(cpf, 11)
}

/// Validate a 14-digit CNPJ.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    verify(cnpj, 14)
}

/// Compute the two check digits for a CPF body (9 digits) or CNPJ body
/// (12 digits).
///
/// ```
/// assert_eq!(nota::checksum::check_digits("529982247"), Some([2, 5]));
/// assert_eq!(nota::checksum::check_digits("112223330001"), Some([8, 1]));
/// ```
pub fn check_digits(body: &str) -> Option<[u32; 2]> {
    let weights: &[u32] = match body.len() {
        9 => &CPF_WEIGHTS,
        12 => &CNPJ_WEIGHTS,
        _ => return None,
    };
    let mut digits = to_digits(body)?;
    // The first digit uses the weight vector without its leading element.
    let first = mod11_digit(weighted_sum(&digits, &weights[1..]));
    digits.push(first);
    let second = mod11_digit(weighted_sum(&digits, weights));
    Some([first, second])
}

fn verify(id: &str, len: usize) -> bool {
    if id.len() != len {
        return false;
    }
    let Some(digits) = to_digits(id) else {
        return false;
    };
    // Repeated digits pass the arithmetic but are never issued.
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    match check_digits(&id[..len - 2]) {
        Some([a, b]) => digits[len - 2] == a && digits[len - 1] == b,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_cpfs() {
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("12345678909"));
    }

    #[test]
    fn valid_cnpjs() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("12345678000195"));
        assert!(is_valid_cnpj("98765432000198"));
    }

    #[test]
    fn wrong_check_digit() {
        assert!(!is_valid_cpf("52998224726"));
        assert!(!is_valid_cnpj("11222333000182"));
    }

    #[test]
    fn repeated_digits_rejected() {
        assert!(!is_valid_cpf("00000000000"));
        assert!(!is_valid_cpf("11111111111"));
        assert!(!is_valid_cnpj("00000000000000"));
        assert!(!is_valid_cnpj("99999999999999"));
    }

    #[test]
    fn wrong_length_or_characters() {
        assert!(!is_valid_cpf("5299822472"));
        assert!(!is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_national_id(""));
        assert!(!is_valid_national_id("1122233300018A"));
    }

    #[test]
    fn dispatch_by_length() {
        assert!(is_valid_national_id("52998224725"));
        assert!(is_valid_national_id("11222333000181"));
    }
}
