//! # nota
//!
//! Parsing and validation of Brazilian electronic fiscal documents:
//! NF-e (goods invoice), NFC-e (consumer invoice), CT-e (transport waybill)
//! and MDF-e (transport manifest).
//!
//! Every document variant is normalized into one [`Document`] model and run
//! through a fixed, ordered registry of validation rules: identifier check
//! digits (CPF, CNPJ, access key, the 27 state registrations), tax
//! arithmetic, jurisdiction and regime consistency, and transport constraints.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nota::rules::Validator;
//! use nota::ValidationConfig;
//!
//! let xml = std::fs::read_to_string("nfe.xml")?;
//! let validator = Validator::new(ValidationConfig::default());
//! let (document, issues) = validator.check_xml(&xml)?;
//!
//! println!("{} {}", document.document_type(), document.access_key());
//! for issue in &issues {
//!     println!("{issue}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, checksums, rule engine, capability contracts |
//! | `xml` (default) | NF-e / NFC-e / CT-e / MDF-e XML parsers |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod checksum;

#[cfg(feature = "core")]
pub mod capability;

#[cfg(feature = "core")]
pub mod rules;

#[cfg(feature = "xml")]
pub mod xml;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
