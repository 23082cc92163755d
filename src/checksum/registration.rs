//! State tax-registration numbers (Inscrição Estadual) for all 27 UFs.
//!
//! Every UF is described by a [`RegistrationScheme`]: one or more accepted
//! [`Layout`]s (length, fixed segments, check digits). A single evaluator
//! interprets the table, so adding or correcting a state means editing data,
//! not code.

/// Literal accepted in place of a registration number by every UF.
pub const EXEMPT: &str = "ISENTO";

/// Registration rules of one UF.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationScheme {
    pub jurisdiction: &'static str,
    /// Alternative formats; the number is valid if any layout accepts it.
    pub layouts: &'static [Layout],
}

/// One accepted format.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub length: usize,
    /// Fixed values required at given offsets (prefixes and type digits).
    pub segments: &'static [Segment],
    pub checks: &'static [CheckDigit],
}

/// At offset `at` the number must start with one of `any_of`.
///
/// A segment at offset 0 may contain letters (São Paulo rural producers
/// start with `P`); those positions never feed a check digit.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub at: usize,
    pub any_of: &'static [&'static str],
}

/// How the check digit at `position` is derived.
///
/// Inputs are the digits of the number in order, excluding `position` and
/// every index in `skip`, optionally with a zero inserted at
/// `insert_zero_at`, truncated to `weights.len()`.
#[derive(Debug, Clone, Copy)]
pub struct CheckDigit {
    pub position: usize,
    pub weights: &'static [u32],
    pub skip: &'static [usize],
    pub insert_zero_at: Option<usize>,
    /// Add the decimal digits of each product instead of the product itself.
    pub fold_products: bool,
    pub modulus: Modulus,
    pub mapping: Mapping,
}

#[derive(Debug, Clone, Copy)]
pub enum Modulus {
    Fixed(u32),
    /// Modulus 10 when the digit at `digit` is one of `values`, else 11.
    TenWhen {
        digit: usize,
        values: &'static [u32],
    },
}

/// Remainder-to-digit mapping.
#[derive(Debug, Clone, Copy)]
pub enum Mapping {
    /// `modulus - remainder`; results 10 and 11 become `ten` and `eleven`.
    Complement { ten: u32, eleven: u32 },
    /// Like `Complement`, with an offset added to the sum and the 10/11
    /// replacements chosen by the numeric value of the inputs.
    Banded(&'static [Band]),
    /// The remainder itself, last decimal digit only.
    Remainder,
    /// `(sum * 10) mod modulus`, 10 becoming 0.
    TimesTen,
}

/// Range of input values sharing one set of [`Mapping::Banded`] constants.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub from: u64,
    pub to: u64,
    pub offset: u32,
    pub ten: u32,
    pub eleven: u32,
}

const COMPLEMENT: Mapping = Mapping::Complement { ten: 0, eleven: 0 };
/// 11 becomes 1: `11 - r`, minus 10 when two digits long.
const COMPLEMENT_WRAP: Mapping = Mapping::Complement { ten: 0, eleven: 1 };

impl CheckDigit {
    const fn new(position: usize, weights: &'static [u32]) -> Self {
        Self {
            position,
            weights,
            skip: &[],
            insert_zero_at: None,
            fold_products: false,
            modulus: Modulus::Fixed(11),
            mapping: COMPLEMENT,
        }
    }

    const fn mapping(self, mapping: Mapping) -> Self {
        Self { mapping, ..self }
    }

    const fn modulus(self, modulus: Modulus) -> Self {
        Self { modulus, ..self }
    }

    const fn skip(self, skip: &'static [usize]) -> Self {
        Self { skip, ..self }
    }

    const fn luhn_with_zero_at(self, at: usize) -> Self {
        Self {
            insert_zero_at: Some(at),
            fold_products: true,
            ..self
        }
    }

    /// Expected digit at `self.position`, or `None` if there are too few
    /// input digits.
    fn expected(&self, digits: &[Option<u32>]) -> Option<u32> {
        let mut inputs: Vec<u32> = digits
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.position && !self.skip.contains(i))
            .filter_map(|(_, d)| *d)
            .collect();
        if let Some(at) = self.insert_zero_at {
            if at > inputs.len() {
                return None;
            }
            inputs.insert(at, 0);
        }
        if inputs.len() < self.weights.len() {
            return None;
        }
        inputs.truncate(self.weights.len());

        let modulus = match self.modulus {
            Modulus::Fixed(m) => m,
            Modulus::TenWhen { digit, values } => {
                match digits.get(digit).copied().flatten() {
                    Some(d) if values.contains(&d) => 10,
                    _ => 11,
                }
            }
        };

        let sum: u32 = inputs
            .iter()
            .zip(self.weights)
            .map(|(d, w)| {
                let p = d * w;
                if self.fold_products { p / 10 + p % 10 } else { p }
            })
            .sum();

        let digit = match self.mapping {
            Mapping::Complement { ten, eleven } => complement(sum, modulus, ten, eleven),
            Mapping::Banded(bands) => {
                let value = inputs.iter().fold(0u64, |acc, d| acc * 10 + u64::from(*d));
                match bands.iter().find(|b| (b.from..=b.to).contains(&value)) {
                    Some(b) => complement(sum + b.offset, modulus, b.ten, b.eleven),
                    None => complement(sum, modulus, 0, 0),
                }
            }
            Mapping::Remainder => (sum % modulus) % 10,
            Mapping::TimesTen => match (sum * 10) % modulus {
                d if d >= 10 => 0,
                d => d,
            },
        };
        Some(digit)
    }
}

fn complement(sum: u32, modulus: u32, ten: u32, eleven: u32) -> u32 {
    match modulus - sum % modulus {
        10 => ten,
        11 => eleven,
        d => d,
    }
}

impl Layout {
    fn accepts(&self, id: &str) -> bool {
        if id.len() != self.length || !id.is_ascii() {
            return false;
        }

        let mut literal_len = 0;
        for segment in self.segments {
            let Some(rest) = id.get(segment.at..) else {
                return false;
            };
            match segment.any_of.iter().find(|v| rest.starts_with(**v)) {
                Some(v) if segment.at == 0 => literal_len = v.len(),
                Some(_) => {}
                None => return false,
            }
        }

        let mut digits = Vec::with_capacity(id.len());
        for (i, c) in id.chars().enumerate() {
            match c.to_digit(10) {
                Some(d) => digits.push(Some(d)),
                None if i < literal_len => digits.push(None),
                None => return false,
            }
        }

        self.checks.iter().all(|check| {
            check
                .expected(&digits)
                .is_some_and(|d| digits.get(check.position) == Some(&Some(d)))
        })
    }
}

impl RegistrationScheme {
    /// Whether any layout of this UF accepts `id`.
    pub fn validate(&self, id: &str) -> bool {
        self.layouts.iter().any(|layout| layout.accepts(id))
    }
}

/// Validate a state registration for the given UF.
///
/// Always true for [`EXEMPT`], for an empty number, and for a UF without a
/// scheme: unknown registrations fail open.
///
/// ```
/// use nota::checksum::is_valid_registration;
///
/// assert!(is_valid_registration("SP", "110042490114"));
/// assert!(!is_valid_registration("SP", "110042490115"));
/// assert!(is_valid_registration("SP", "ISENTO"));
/// assert!(is_valid_registration("XX", "123"));
/// ```
pub fn is_valid_registration(jurisdiction: &str, id: &str) -> bool {
    let id = id.trim();
    if id.is_empty() || id.eq_ignore_ascii_case(EXEMPT) {
        return true;
    }
    match scheme_for(jurisdiction) {
        Some(scheme) => scheme.validate(id),
        None => true,
    }
}

/// Scheme of one UF.
pub fn scheme_for(jurisdiction: &str) -> Option<&'static RegistrationScheme> {
    SCHEMES
        .binary_search_by(|s| s.jurisdiction.cmp(jurisdiction))
        .ok()
        .map(|i| &SCHEMES[i])
}

/// All 27 schemes, sorted by UF.
pub fn schemes() -> &'static [RegistrationScheme] {
    SCHEMES
}

const W2_9: &[u32] = &[9, 8, 7, 6, 5, 4, 3, 2];
const W2_10: &[u32] = &[10, 9, 8, 7, 6, 5, 4, 3, 2];
const W13_FIRST: &[u32] = &[4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const W13_SECOND: &[u32] = &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SP_FIRST: &[u32] = &[1, 3, 4, 5, 6, 7, 8, 10];

const BAHIA_MOD10: &[u32] = &[0, 1, 2, 3, 4, 5, 8];

const AMAPA_BANDS: &[Band] = &[
    Band { from: 3_000_001, to: 3_017_000, offset: 5, ten: 0, eleven: 0 },
    Band { from: 3_017_001, to: 3_019_022, offset: 9, ten: 0, eleven: 1 },
    Band { from: 3_019_023, to: 99_999_999, offset: 0, ten: 0, eleven: 0 },
];

const GOIAS_BANDS: &[Band] = &[Band {
    from: 10_103_105,
    to: 10_119_997,
    offset: 0,
    ten: 1,
    eleven: 0,
}];

const LAST_OF_NINE: &[CheckDigit] = &[CheckDigit::new(8, W2_9)];

/// Plain mod-11, weights 9..2, check digit last: the most common layout.
const NINE_DIGITS: &[Layout] = &[prefixed_nine(&[])];

const fn prefixed_nine(prefixes: &'static [Segment]) -> Layout {
    Layout {
        length: 9,
        segments: prefixes,
        checks: LAST_OF_NINE,
    }
}

static SCHEMES: &[RegistrationScheme] = &[
    RegistrationScheme {
        jurisdiction: "AC",
        layouts: &[Layout {
            length: 13,
            segments: &[Segment { at: 0, any_of: &["01"] }],
            checks: &[CheckDigit::new(11, W13_FIRST), CheckDigit::new(12, W13_SECOND)],
        }],
    },
    RegistrationScheme {
        jurisdiction: "AL",
        layouts: &[Layout {
            length: 9,
            segments: &[
                Segment { at: 0, any_of: &["24"] },
                Segment { at: 2, any_of: &["0", "3", "5", "7", "8"] },
            ],
            checks: &[CheckDigit::new(8, W2_9).mapping(Mapping::TimesTen)],
        }],
    },
    RegistrationScheme {
        jurisdiction: "AM",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "AP",
        layouts: &[Layout {
            length: 9,
            segments: &[Segment { at: 0, any_of: &["03"] }],
            checks: &[CheckDigit::new(8, W2_9).mapping(Mapping::Banded(AMAPA_BANDS))],
        }],
    },
    RegistrationScheme {
        jurisdiction: "BA",
        layouts: &[
            Layout {
                length: 8,
                segments: &[],
                checks: &[
                    CheckDigit::new(6, &[8, 7, 6, 5, 4, 3, 2])
                        .modulus(Modulus::TenWhen { digit: 0, values: BAHIA_MOD10 }),
                    CheckDigit::new(7, &[7, 6, 5, 4, 3, 2])
                        .modulus(Modulus::TenWhen { digit: 0, values: BAHIA_MOD10 }),
                ],
            },
            Layout {
                length: 9,
                segments: &[],
                checks: &[
                    CheckDigit::new(7, W2_9)
                        .modulus(Modulus::TenWhen { digit: 1, values: BAHIA_MOD10 }),
                    CheckDigit::new(8, &[8, 7, 6, 5, 4, 3, 2])
                        .modulus(Modulus::TenWhen { digit: 1, values: BAHIA_MOD10 }),
                ],
            },
        ],
    },
    RegistrationScheme {
        jurisdiction: "CE",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "DF",
        layouts: &[Layout {
            length: 13,
            segments: &[Segment { at: 0, any_of: &["07", "08"] }],
            checks: &[CheckDigit::new(11, W13_FIRST), CheckDigit::new(12, W13_SECOND)],
        }],
    },
    RegistrationScheme {
        jurisdiction: "ES",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "GO",
        layouts: &[Layout {
            length: 9,
            segments: &[Segment {
                at: 0,
                any_of: &[
                    "10", "11", "15", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29",
                ],
            }],
            checks: &[CheckDigit::new(8, W2_9).mapping(Mapping::Banded(GOIAS_BANDS))],
        }],
    },
    RegistrationScheme {
        jurisdiction: "MA",
        layouts: &[prefixed_nine(&[Segment { at: 0, any_of: &["12"] }])],
    },
    RegistrationScheme {
        jurisdiction: "MG",
        layouts: &[Layout {
            length: 13,
            segments: &[],
            checks: &[
                CheckDigit::new(11, &[1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2])
                    .modulus(Modulus::Fixed(10))
                    .luhn_with_zero_at(3),
                CheckDigit::new(12, &[3, 2, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2]),
            ],
        }],
    },
    RegistrationScheme {
        jurisdiction: "MS",
        layouts: &[prefixed_nine(&[Segment { at: 0, any_of: &["28", "50"] }])],
    },
    RegistrationScheme {
        jurisdiction: "MT",
        layouts: &[Layout {
            length: 11,
            segments: &[],
            checks: &[CheckDigit::new(10, &[3, 2, 9, 8, 7, 6, 5, 4, 3, 2])],
        }],
    },
    RegistrationScheme {
        jurisdiction: "PA",
        layouts: &[prefixed_nine(&[Segment { at: 0, any_of: &["15"] }])],
    },
    RegistrationScheme {
        jurisdiction: "PB",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "PE",
        layouts: &[
            // e-Fisco
            Layout {
                length: 9,
                segments: &[],
                checks: &[
                    CheckDigit::new(7, &[8, 7, 6, 5, 4, 3, 2]),
                    CheckDigit::new(8, W2_9),
                ],
            },
            // CACEPE
            Layout {
                length: 14,
                segments: &[],
                checks: &[CheckDigit::new(13, &[5, 4, 3, 2, 1, 9, 8, 7, 6, 5, 4, 3, 2])
                    .mapping(COMPLEMENT_WRAP)],
            },
        ],
    },
    RegistrationScheme {
        jurisdiction: "PI",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "PR",
        layouts: &[Layout {
            length: 10,
            segments: &[],
            checks: &[
                CheckDigit::new(8, &[3, 2, 7, 6, 5, 4, 3, 2]),
                CheckDigit::new(9, &[4, 3, 2, 7, 6, 5, 4, 3, 2]),
            ],
        }],
    },
    RegistrationScheme {
        jurisdiction: "RJ",
        layouts: &[Layout {
            length: 8,
            segments: &[],
            checks: &[CheckDigit::new(7, &[2, 7, 6, 5, 4, 3, 2])],
        }],
    },
    RegistrationScheme {
        jurisdiction: "RN",
        layouts: &[
            Layout {
                length: 9,
                segments: &[Segment { at: 0, any_of: &["20"] }],
                checks: &[CheckDigit::new(8, W2_9).mapping(Mapping::TimesTen)],
            },
            Layout {
                length: 10,
                segments: &[Segment { at: 0, any_of: &["20"] }],
                checks: &[CheckDigit::new(9, W2_10).mapping(Mapping::TimesTen)],
            },
        ],
    },
    RegistrationScheme {
        jurisdiction: "RO",
        layouts: &[
            // Pre-2000 numbers: municipality code is not weighted.
            Layout {
                length: 9,
                segments: &[],
                checks: &[CheckDigit::new(8, &[6, 5, 4, 3, 2])
                    .skip(&[0, 1, 2])
                    .mapping(COMPLEMENT_WRAP)],
            },
            Layout {
                length: 14,
                segments: &[],
                checks: &[CheckDigit::new(13, &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2])
                    .mapping(COMPLEMENT_WRAP)],
            },
        ],
    },
    RegistrationScheme {
        jurisdiction: "RR",
        layouts: &[Layout {
            length: 9,
            segments: &[Segment { at: 0, any_of: &["24"] }],
            checks: &[CheckDigit::new(8, &[1, 2, 3, 4, 5, 6, 7, 8])
                .modulus(Modulus::Fixed(9))
                .mapping(Mapping::Remainder)],
        }],
    },
    RegistrationScheme {
        jurisdiction: "RS",
        layouts: &[Layout {
            length: 10,
            segments: &[],
            checks: &[CheckDigit::new(9, &[2, 9, 8, 7, 6, 5, 4, 3, 2])],
        }],
    },
    RegistrationScheme {
        jurisdiction: "SC",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "SE",
        layouts: NINE_DIGITS,
    },
    RegistrationScheme {
        jurisdiction: "SP",
        layouts: &[
            Layout {
                length: 12,
                segments: &[],
                checks: &[
                    CheckDigit::new(8, SP_FIRST).mapping(Mapping::Remainder),
                    CheckDigit::new(11, &[3, 2, 10, 9, 8, 7, 6, 5, 4, 3, 2])
                        .mapping(Mapping::Remainder),
                ],
            },
            // Rural producer: P + 12 digits, one check digit at offset 9.
            Layout {
                length: 13,
                segments: &[Segment { at: 0, any_of: &["P"] }],
                checks: &[CheckDigit::new(9, SP_FIRST).mapping(Mapping::Remainder)],
            },
        ],
    },
    RegistrationScheme {
        jurisdiction: "TO",
        layouts: &[
            Layout {
                length: 9,
                segments: &[],
                checks: &[CheckDigit::new(8, W2_9)],
            },
            // Digits 3-4 are the activity type and are not weighted.
            Layout {
                length: 11,
                segments: &[Segment { at: 2, any_of: &["01", "02", "03", "99"] }],
                checks: &[CheckDigit::new(10, W2_9).skip(&[2, 3])],
            },
        ],
    },
];
