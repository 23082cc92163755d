//! Lookup contracts for data the core cannot verify on its own.
//!
//! Registries (CNPJ status, CEP addresses, the NCM catalog, previously seen
//! access keys) live outside this crate. Callers plug implementations into
//! [`Capabilities`]; the rules that consume them treat every answer other
//! than a definite [`Outcome::Found`] as a pass.
//!
//! Implementations own timeouts, retries, and caching. A lookup that times
//! out or fails must answer [`Outcome::Unavailable`] rather than block or
//! panic.
//!
//! ```
//! use std::sync::Arc;
//! use nota::capability::{Capabilities, Outcome};
//!
//! let catalog = |code: &str| {
//!     if code.starts_with("8471") { Outcome::Found(true) } else { Outcome::NotFound }
//! };
//! let capabilities = Capabilities::default().with_product_catalog(Arc::new(catalog));
//! assert!(capabilities.product_catalog.is_some());
//! ```

mod similarity;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use similarity::{name_similarity, normalize_name};

/// Answer of a capability lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    /// The registry knows the key.
    Found(T),
    /// The registry answered and does not know the key.
    NotFound,
    /// Timeout, transport error, or a disabled adapter.
    Unavailable,
}

impl<T> Outcome<T> {
    /// The value, if found.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(v) => Outcome::Found(f(v)),
            Self::NotFound => Outcome::NotFound,
            Self::Unavailable => Outcome::Unavailable,
        }
    }
}

/// Adapters that talk to a fallible backend can return `Result<Option<T>, E>`
/// and convert: `Ok(None)` is `NotFound`, any error is `Unavailable`.
impl<T, E> From<Result<Option<T>, E>> for Outcome<T> {
    fn from(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(v)) => Self::Found(v),
            Ok(None) => Self::NotFound,
            Err(_) => Self::Unavailable,
        }
    }
}

/// Registration status reported by the federal taxpayer registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryStatus {
    Active,
    Suspended,
    Unfit,
    Cancelled,
}

impl RegistryStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for RegistryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Unfit => "unfit",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Registry record of a CPF or CNPJ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierStatus {
    pub status: RegistryStatus,
    /// Legal name on file.
    pub registered_name: Option<String>,
    /// UF of the registered address.
    pub jurisdiction: Option<String>,
}

/// Postal-code registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub city: Option<String>,
    pub jurisdiction: String,
}

/// CPF/CNPJ status lookup.
pub trait IdentifierRegistry {
    fn lookup_identifier_status(&self, identifier: &str) -> Outcome<IdentifierStatus>;
}

/// CEP lookup.
pub trait AddressRegistry {
    fn lookup_address(&self, postal_code: &str) -> Outcome<AddressInfo>;
}

/// NCM catalog membership.
pub trait ProductCatalog {
    fn product_code_exists(&self, code: &str) -> Outcome<bool>;
}

/// Access keys already processed by the caller.
pub trait DuplicateIndex {
    fn contains(&self, access_key: &str) -> Outcome<bool>;
}

impl<F> IdentifierRegistry for F
where
    F: Fn(&str) -> Outcome<IdentifierStatus>,
{
    fn lookup_identifier_status(&self, identifier: &str) -> Outcome<IdentifierStatus> {
        self(identifier)
    }
}

impl<F> AddressRegistry for F
where
    F: Fn(&str) -> Outcome<AddressInfo>,
{
    fn lookup_address(&self, postal_code: &str) -> Outcome<AddressInfo> {
        self(postal_code)
    }
}

impl<F> ProductCatalog for F
where
    F: Fn(&str) -> Outcome<bool>,
{
    fn product_code_exists(&self, code: &str) -> Outcome<bool> {
        self(code)
    }
}

impl<F> DuplicateIndex for F
where
    F: Fn(&str) -> Outcome<bool>,
{
    fn contains(&self, access_key: &str) -> Outcome<bool> {
        self(access_key)
    }
}

/// The adapters available to one [`Validator`](crate::rules::Validator).
///
/// Every slot is optional; an empty slot behaves like an adapter that
/// always answers [`Outcome::Unavailable`].
#[derive(Clone, Default)]
pub struct Capabilities {
    pub identifier_registry: Option<Arc<dyn IdentifierRegistry + Send + Sync>>,
    pub address_registry: Option<Arc<dyn AddressRegistry + Send + Sync>>,
    pub product_catalog: Option<Arc<dyn ProductCatalog + Send + Sync>>,
    pub duplicate_index: Option<Arc<dyn DuplicateIndex + Send + Sync>>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("identifier_registry", &self.identifier_registry.is_some())
            .field("address_registry", &self.address_registry.is_some())
            .field("product_catalog", &self.product_catalog.is_some())
            .field("duplicate_index", &self.duplicate_index.is_some())
            .finish()
    }
}

impl Capabilities {
    pub fn with_identifier_registry(
        mut self,
        registry: Arc<dyn IdentifierRegistry + Send + Sync>,
    ) -> Self {
        self.identifier_registry = Some(registry);
        self
    }

    pub fn with_address_registry(mut self, registry: Arc<dyn AddressRegistry + Send + Sync>) -> Self {
        self.address_registry = Some(registry);
        self
    }

    pub fn with_product_catalog(mut self, catalog: Arc<dyn ProductCatalog + Send + Sync>) -> Self {
        self.product_catalog = Some(catalog);
        self
    }

    pub fn with_duplicate_index(mut self, index: Arc<dyn DuplicateIndex + Send + Sync>) -> Self {
        self.duplicate_index = Some(index);
        self
    }

    pub(crate) fn identifier_status(&self, identifier: &str) -> Outcome<IdentifierStatus> {
        match &self.identifier_registry {
            Some(r) => logged("identifier_registry", r.lookup_identifier_status(identifier)),
            None => Outcome::Unavailable,
        }
    }

    pub(crate) fn address(&self, postal_code: &str) -> Outcome<AddressInfo> {
        match &self.address_registry {
            Some(r) => logged("address_registry", r.lookup_address(postal_code)),
            None => Outcome::Unavailable,
        }
    }

    pub(crate) fn product_exists(&self, code: &str) -> Outcome<bool> {
        match &self.product_catalog {
            Some(c) => logged("product_catalog", c.product_code_exists(code)),
            None => Outcome::Unavailable,
        }
    }

    pub(crate) fn seen(&self, access_key: &str) -> Outcome<bool> {
        match &self.duplicate_index {
            Some(i) => logged("duplicate_index", i.contains(access_key)),
            None => Outcome::Unavailable,
        }
    }
}

fn logged<T>(adapter: &'static str, outcome: Outcome<T>) -> Outcome<T> {
    if outcome.is_unavailable() {
        tracing::debug!(adapter, "capability unavailable, rule passes");
    }
    outcome
}
