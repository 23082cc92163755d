//! The 27 Brazilian federative units (UF) and their IBGE codes.
//!
//! The two-digit IBGE code is the first segment of every access key.

/// Pseudo-jurisdiction used for recipients abroad.
pub const ABROAD: &str = "EX";

/// Check whether `uf` is one of the 27 UF abbreviations.
pub fn is_known_jurisdiction(uf: &str) -> bool {
    JURISDICTIONS.binary_search_by(|(u, _)| u.cmp(&uf)).is_ok()
}

/// IBGE numeric code for a UF abbreviation.
pub fn ibge_code(uf: &str) -> Option<&'static str> {
    JURISDICTIONS
        .binary_search_by(|(u, _)| u.cmp(&uf))
        .ok()
        .map(|i| JURISDICTIONS[i].1)
}

/// UF abbreviation for an IBGE numeric code.
pub fn from_ibge_code(code: &str) -> Option<&'static str> {
    JURISDICTIONS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(uf, _)| *uf)
}

/// All UF abbreviations, sorted.
pub fn all() -> impl Iterator<Item = &'static str> {
    JURISDICTIONS.iter().map(|(uf, _)| *uf)
}

/// (UF, IBGE code), sorted by UF for binary search.
static JURISDICTIONS: &[(&str, &str)] = &[
    ("AC", "12"),
    ("AL", "27"),
    ("AM", "13"),
    ("AP", "16"),
    ("BA", "29"),
    ("CE", "23"),
    ("DF", "53"),
    ("ES", "32"),
    ("GO", "52"),
    ("MA", "21"),
    ("MG", "31"),
    ("MS", "50"),
    ("MT", "51"),
    ("PA", "15"),
    ("PB", "25"),
    ("PE", "26"),
    ("PI", "22"),
    ("PR", "41"),
    ("RJ", "33"),
    ("RN", "24"),
    ("RO", "11"),
    ("RR", "14"),
    ("RS", "43"),
    ("SC", "42"),
    ("SE", "28"),
    ("SP", "35"),
    ("TO", "17"),
];
