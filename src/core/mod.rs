//! Core document model, errors, configuration, and code tables.
//!
//! This module provides the normalized representation shared by all four
//! fiscal document variants, plus the reference tables (jurisdictions,
//! operation codes, tax-situation codes) the validation rules consult.

mod builder;
pub mod codes;
mod config;
mod error;
pub mod jurisdictions;
mod types;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use jurisdictions::is_known_jurisdiction;
pub use types::*;
