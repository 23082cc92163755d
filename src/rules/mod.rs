//! Validation rule engine.
//!
//! Rules are plain data: a code, a severity, a message, and a pure predicate
//! over a [`Context`]. The registry is fixed at construction and evaluated in
//! order; every rule runs against every document and each failing rule
//! contributes one [`Issue`]. A rule whose subject is absent from the
//! document (items on a manifest, a plate on an air waybill) passes.
//!
//! | Prefix | Category | Severity |
//! |---|---|---|
//! | `STR` | access key and structure | error, warning for key consistency |
//! | `ID` | CPF/CNPJ, access key, and IE check digits | error |
//! | `ARI` | tax arithmetic | warning |
//! | `JUR` | CFOP scope and route jurisdictions | warning |
//! | `REG` | tax regime vs CST/CSOSN | warning |
//! | `TRN` | transport data | warning |
//! | `CAT` | product classification | warning |
//! | `INF` | recommended fields | info |
//! | `EXT` | capability-backed lookups | warning, info for name match |

mod arithmetic;
mod external;
mod identity;
mod jurisdiction;
mod recommended;
mod regime;
mod structural;
mod transport;

#[cfg(test)]
mod fixtures;

use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::capability::Capabilities;
use crate::core::{Document, Issue, Severity, ValidationConfig, count_severity};

/// Everything a rule predicate may read.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub document: &'a Document,
    pub config: &'a ValidationConfig,
    pub capabilities: &'a Capabilities,
}

/// One validation rule. `check` returns `true` when the document passes.
#[derive(Clone, Copy)]
pub struct Rule {
    pub code: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub field: Option<&'static str>,
    pub suggestion: Option<&'static str>,
    pub check: fn(&Context<'_>) -> bool,
}

impl Rule {
    pub const fn new(
        code: &'static str,
        severity: Severity,
        message: &'static str,
        check: fn(&Context<'_>) -> bool,
    ) -> Self {
        Self {
            code,
            severity,
            message,
            field: None,
            suggestion: None,
            check,
        }
    }

    pub const fn field(self, field: &'static str) -> Self {
        Self {
            field: Some(field),
            ..self
        }
    }

    pub const fn suggestion(self, suggestion: &'static str) -> Self {
        Self {
            suggestion: Some(suggestion),
            ..self
        }
    }

    pub fn passes(&self, ctx: &Context<'_>) -> bool {
        (self.check)(ctx)
    }

    /// The issue this rule reports when it fails.
    pub fn issue(&self) -> Issue {
        Issue {
            code: self.code.to_string(),
            severity: self.severity,
            message: self.message.to_string(),
            field: self.field.map(str::to_string),
            suggestion: self.suggestion.map(str::to_string),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code)
            .field("severity", &self.severity)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// The built-in registry, in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    [
        structural::RULES,
        identity::RULES,
        arithmetic::RULES,
        jurisdiction::RULES,
        regime::RULES,
        transport::RULES,
        recommended::RULES,
        external::RULES,
    ]
    .concat()
}

/// Runs the rule registry over documents.
///
/// Holds no per-document state; one validator can serve many threads.
///
/// ```
/// use nota::rules::Validator;
/// use nota::ValidationConfig;
///
/// let validator = Validator::new(ValidationConfig::default());
/// assert!(validator.rules().len() >= 40);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
    capabilities: Capabilities,
    rules: Vec<Rule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config: config.normalized(),
            capabilities: Capabilities::default(),
            rules: default_rules(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every rule; issues come back in registry order.
    pub fn validate(&self, document: &Document) -> Vec<Issue> {
        let ctx = Context {
            document,
            config: &self.config,
            capabilities: &self.capabilities,
        };
        if !self.config.external_lookups {
            debug!("external lookups disabled, capability rules pass");
        }

        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter(|rule| !rule.passes(&ctx))
            .map(Rule::issue)
            .collect();

        debug!(
            access_key = document.access_key(),
            variant = %document.document_type(),
            errors = count_severity(&issues, Severity::Error),
            warnings = count_severity(&issues, Severity::Warning),
            infos = count_severity(&issues, Severity::Info),
            "validated document"
        );
        issues
    }

    /// Parse and validate in one call.
    #[cfg(feature = "xml")]
    pub fn check_xml(&self, xml: &str) -> Result<(Document, Vec<Issue>), crate::core::ParseError> {
        let document = crate::xml::parse_document(xml)?;
        let issues = self.validate(&document);
        Ok((document, issues))
    }
}

/// Absolute-value tolerance check through the context's config.
fn close(ctx: &Context<'_>, expected: Decimal, actual: Decimal) -> bool {
    ctx.config.within_tolerance(expected, actual)
}
