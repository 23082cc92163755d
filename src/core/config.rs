use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default monetary tolerance for all tax-arithmetic comparisons.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Default minimum similarity between a declared and a registered name.
pub const DEFAULT_NAME_MATCH_THRESHOLD: f64 = 0.80;

/// Settings for one [`Validator`](crate::rules::Validator).
///
/// Built by the caller and handed to the validator; nothing is read from
/// process-wide state.
///
/// ```
/// use nota::ValidationConfig;
/// use rust_decimal_macros::dec;
///
/// let config = ValidationConfig::default()
///     .tolerance(dec!(0.05))
///     .external_lookups(false);
/// assert_eq!(config.tolerance, dec!(0.05));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted `|expected - actual|` in tax arithmetic.
    ///
    /// One value for every tax category and jurisdiction.
    pub tolerance: Decimal,
    /// When false, every rule backed by a capability adapter passes
    /// without calling it.
    pub external_lookups: bool,
    /// Similarity ratio in `0.0..=1.0` below which a declared issuer name
    /// is reported as not matching the registry.
    pub name_match_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            external_lookups: true,
            name_match_threshold: DEFAULT_NAME_MATCH_THRESHOLD,
        }
    }
}

impl ValidationConfig {
    pub fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn external_lookups(mut self, enabled: bool) -> Self {
        self.external_lookups = enabled;
        self
    }

    pub fn name_match_threshold(mut self, threshold: f64) -> Self {
        self.name_match_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Apply the setter invariants to values assigned directly or
    /// deserialized.
    pub fn normalized(self) -> Self {
        let threshold = if self.name_match_threshold.is_nan() {
            DEFAULT_NAME_MATCH_THRESHOLD
        } else {
            self.name_match_threshold
        };
        let tolerance = self.tolerance;
        self.tolerance(tolerance).name_match_threshold(threshold)
    }

    /// `|expected - actual| <= tolerance`. A difference too large to
    /// represent is never within tolerance.
    pub fn within_tolerance(&self, expected: Decimal, actual: Decimal) -> bool {
        expected
            .checked_sub(actual)
            .is_some_and(|diff| diff.abs() <= self.tolerance)
    }
}
