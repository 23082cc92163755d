//! Code tables used by the validation rules: CFOP, CST/CSOSN, modal codes,
//! and transport identifier formats.

/// Territorial scope of a CFOP, taken from its first digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationScope {
    /// 1xxx / 5xxx: issuer and counterparty in the same UF.
    SameJurisdiction,
    /// 2xxx / 6xxx: different UFs.
    CrossJurisdiction,
    /// 3xxx / 7xxx: counterparty abroad.
    Foreign,
}

/// Direction of a CFOP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationDirection {
    Inbound,
    Outbound,
}

/// Scope and direction of a 4-digit CFOP, or `None` if it is malformed.
pub fn operation_scope(cfop: &str) -> Option<(OperationScope, OperationDirection)> {
    if cfop.len() != 4 || !cfop.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    use OperationDirection::*;
    use OperationScope::*;
    match cfop.as_bytes()[0] {
        b'1' => Some((SameJurisdiction, Inbound)),
        b'2' => Some((CrossJurisdiction, Inbound)),
        b'3' => Some((Foreign, Inbound)),
        b'5' => Some((SameJurisdiction, Outbound)),
        b'6' => Some((CrossJurisdiction, Outbound)),
        b'7' => Some((Foreign, Outbound)),
        _ => None,
    }
}

/// CST codes of the ICMS group for regular-regime issuers.
static CST_CODES: &[&str] = &[
    "00", "02", "10", "15", "20", "30", "40", "41", "50", "51", "53", "60", "61", "70", "90",
];

/// CSOSN codes for Simples Nacional issuers.
static CSOSN_CODES: &[&str] = &[
    "101", "102", "103", "201", "202", "203", "300", "400", "500", "900",
];

pub fn is_cst(code: &str) -> bool {
    CST_CODES.binary_search(&code).is_ok()
}

pub fn is_csosn(code: &str) -> bool {
    CSOSN_CODES.binary_search(&code).is_ok()
}

/// Transport modal codes, normalized to two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Road,
    Air,
    Waterway,
    Rail,
    Pipeline,
    Multimodal,
}

impl Modal {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Road),
            "02" => Some(Self::Air),
            "03" => Some(Self::Waterway),
            "04" => Some(Self::Rail),
            "05" => Some(Self::Pipeline),
            "06" => Some(Self::Multimodal),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Road => "01",
            Self::Air => "02",
            Self::Waterway => "03",
            Self::Rail => "04",
            Self::Pipeline => "05",
            Self::Multimodal => "06",
        }
    }
}

/// Left-pad single-digit modal codes (MDF-e writes "1" for road).
pub fn normalize_modal(code: &str) -> String {
    let code = code.trim();
    if code.len() == 1 && code.as_bytes()[0].is_ascii_digit() {
        format!("0{code}")
    } else {
        code.to_string()
    }
}

/// Vehicle plate in either accepted shape.
///
/// - legacy: `AAA9999`
/// - Mercosul: `AAA9A99`
pub fn is_valid_plate(plate: &str) -> bool {
    let b = plate.as_bytes();
    if b.len() != 7 || !b[..3].iter().all(u8::is_ascii_uppercase) {
        return false;
    }
    let legacy = b[3..].iter().all(u8::is_ascii_digit);
    let mercosul = b[3].is_ascii_digit()
        && b[4].is_ascii_uppercase()
        && b[5].is_ascii_digit()
        && b[6].is_ascii_digit();
    legacy || mercosul
}

/// RNTRC: exactly 8 digits.
pub fn is_valid_carrier_registration(rntrc: &str) -> bool {
    rntrc.len() == 8 && rntrc.bytes().all(|b| b.is_ascii_digit())
}

/// NCM: exactly 8 digits.
pub fn is_valid_classification(ncm: &str) -> bool {
    ncm.len() == 8 && ncm.bytes().all(|b| b.is_ascii_digit())
}

/// Remove formatting characters (periods, slashes, hyphens, spaces).
pub fn strip_formatting(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfop_scopes() {
        assert_eq!(
            operation_scope("5102"),
            Some((OperationScope::SameJurisdiction, OperationDirection::Outbound))
        );
        assert_eq!(
            operation_scope("6102"),
            Some((OperationScope::CrossJurisdiction, OperationDirection::Outbound))
        );
        assert_eq!(
            operation_scope("3101"),
            Some((OperationScope::Foreign, OperationDirection::Inbound))
        );
        assert_eq!(operation_scope("4102"), None);
        assert_eq!(operation_scope("510"), None);
        assert_eq!(operation_scope("51A2"), None);
    }

    #[test]
    fn cst_and_csosn_are_disjoint() {
        assert!(is_cst("00"));
        assert!(!is_csosn("00"));
        assert!(is_csosn("102"));
        assert!(!is_cst("102"));
        assert!(!is_cst("99"));
    }

    #[test]
    fn tables_sorted() {
        for t in [CST_CODES, CSOSN_CODES] {
            for w in t.windows(2) {
                assert!(w[0] < w[1], "{} >= {}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn modal_codes() {
        assert_eq!(Modal::from_code("01"), Some(Modal::Road));
        assert_eq!(Modal::from_code("07"), None);
        assert_eq!(normalize_modal("1"), "01");
        assert_eq!(normalize_modal("04"), "04");
        assert_eq!(Modal::Multimodal.code(), "06");
    }

    #[test]
    fn plates() {
        assert!(is_valid_plate("ABC1234"));
        assert!(is_valid_plate("ABC1D23"));
        assert!(!is_valid_plate("1234ABC"));
        assert!(!is_valid_plate("abc1234"));
        assert!(!is_valid_plate("ABC12345"));
        assert!(!is_valid_plate("ABCD123"));
    }

    #[test]
    fn carrier_registration() {
        assert!(is_valid_carrier_registration("12345678"));
        assert!(!is_valid_carrier_registration("1234567"));
        assert!(!is_valid_carrier_registration("1234567A"));
    }

    #[test]
    fn strip() {
        assert_eq!(strip_formatting("11.222.333/0001-81"), "11222333000181");
        assert_eq!(strip_formatting("110 042 490 114"), "110042490114");
    }
}
