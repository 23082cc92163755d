//! Declared-name vs registry-name comparison.

/// Corporate-form suffixes that registries and issuers add or omit freely.
const SUFFIXES: &[&str] = &["LTDA", "SA", "S/A", "ME", "EPP", "EIRELI", "MEI"];

/// Upper-case, strip accents and punctuation, drop corporate suffixes, and
/// collapse whitespace.
///
/// ```
/// use nota::capability::normalize_name;
///
/// assert_eq!(normalize_name("Padaria São João Ltda."), "PADARIA SAO JOAO");
/// assert_eq!(normalize_name("ACME Comércio S/A"), "ACME COMERCIO");
/// ```
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(fold_accent)
        .flat_map(char::to_uppercase)
        .collect();

    // "S/A" must be recognized before the slash is treated as punctuation.
    let tokens: Vec<String> = folded
        .split_whitespace()
        .filter(|t| !SUFFIXES.contains(&t.trim_end_matches('.')))
        .map(|t| t.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|t| !t.is_empty() && !SUFFIXES.contains(&t.as_str()))
        .collect();
    tokens.join(" ")
}

/// Similarity ratio in `0.0..=1.0` between two names after normalization.
///
/// `1 - levenshtein / max_len` over characters. Two empty names score 0.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize_name(a).chars().collect();
    let b: Vec<char> = normalize_name(b).chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let distance = levenshtein(&a, &b);
    let longest = a.len().max(b.len());
    1.0 - distance as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}
