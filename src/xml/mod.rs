//! XML parsers for the four fiscal document variants.
//!
//! | Root element | Info element | Variant |
//! |---|---|---|
//! | `nfeProc` / `NFe` | `infNFe` (`ide/mod` 55) | [`DocumentType::GoodsInvoice`] |
//! | `nfeProc` / `NFe` | `infNFe` (`ide/mod` 65) | [`DocumentType::ConsumerInvoice`] |
//! | `cteProc` / `CTe` | `infCte` | [`DocumentType::TransportWaybill`] |
//! | `mdfeProc` / `MDFe` | `infMDFe` | [`DocumentType::TransportManifest`] |
//!
//! Every field is looked up in the variant's namespace first and unqualified
//! second, so documents stripped of their `xmlns` declaration still parse.
//!
//! ```
//! use nota::xml::detect_variant;
//! use nota::DocumentType;
//!
//! let xml = r#"<MDFe xmlns="http://www.portalfiscal.inf.br/mdfe"><infMDFe/></MDFe>"#;
//! assert_eq!(detect_variant(xml).unwrap(), DocumentType::TransportManifest);
//! ```

mod cte;
mod mdfe;
mod nfe;
mod number;
mod reader;

use tracing::debug;

use crate::core::{Document, DocumentType, Issuer, ParseError, Recipient, TaxRegime};
use reader::{Element, Node};

pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";
pub const CTE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/cte";
pub const MDFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/mdfe";

/// Parse one fiscal document from XML text.
///
/// # Errors
///
/// - [`ParseError::Malformed`] if the markup is not well-formed.
/// - [`ParseError::UnsupportedVariant`] for any other root element or model.
/// - [`ParseError::MissingField`] / [`ParseError::InvalidValue`] when a
///   mandatory field is absent or unreadable.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    let tree = reader::read_tree(strip_bom(xml))?;
    let located = locate(&tree)?;
    debug!(variant = %located.variant, root = located.root.name(), "detected document variant");
    match located.variant {
        DocumentType::GoodsInvoice | DocumentType::ConsumerInvoice => nfe::parse(&located),
        DocumentType::TransportWaybill => cte::parse(&located),
        DocumentType::TransportManifest => mdfe::parse(&located),
    }
}

/// Parse from raw bytes. The input must be UTF-8; a leading byte-order mark
/// is skipped.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::Malformed(format!("input is not UTF-8: {e}")))?;
    parse_document(xml)
}

/// Identify the variant without extracting any fields.
pub fn detect_variant(xml: &str) -> Result<DocumentType, ParseError> {
    let tree = reader::read_tree(strip_bom(xml))?;
    Ok(locate(&tree)?.variant)
}

fn strip_bom(xml: &str) -> &str {
    xml.strip_prefix('\u{feff}').unwrap_or(xml)
}

/// Root and info element of a detected document.
pub(crate) struct Located<'a> {
    pub variant: DocumentType,
    pub root: Node<'a>,
    pub info: Node<'a>,
}

struct Family {
    namespace: &'static str,
    signed: &'static str,
    info: &'static str,
}

const NFE: Family = Family {
    namespace: NFE_NAMESPACE,
    signed: "NFe",
    info: "infNFe",
};
const CTE: Family = Family {
    namespace: CTE_NAMESPACE,
    signed: "CTe",
    info: "infCte",
};
const MDFE: Family = Family {
    namespace: MDFE_NAMESPACE,
    signed: "MDFe",
    info: "infMDFe",
};

fn locate(tree: &Element) -> Result<Located<'_>, ParseError> {
    let (family, wrapped) = match tree.name.as_str() {
        "nfeProc" => (NFE, true),
        "NFe" => (NFE, false),
        "cteProc" => (CTE, true),
        "CTe" => (CTE, false),
        "mdfeProc" => (MDFE, true),
        "MDFe" => (MDFE, false),
        other => return Err(ParseError::UnsupportedVariant(other.to_string())),
    };

    let root = Node::new(tree, family.namespace);
    let info_path = if wrapped {
        format!("{}/{}", family.signed, family.info)
    } else {
        family.info.to_string()
    };
    let info = root.require_node(&info_path)?;

    let variant = match family.signed {
        "NFe" => match info.require("ide/mod")? {
            "55" => DocumentType::GoodsInvoice,
            "65" => DocumentType::ConsumerInvoice,
            other => {
                return Err(ParseError::UnsupportedVariant(format!("NF-e model {other}")));
            }
        },
        "CTe" => expect_model(info, DocumentType::TransportWaybill)?,
        _ => expect_model(info, DocumentType::TransportManifest)?,
    };

    Ok(Located {
        variant,
        root,
        info,
    })
}

/// Transport layouts share their root with sibling models (CT-e OS, ...);
/// an explicit model must match, an absent one is accepted.
fn expect_model(info: Node<'_>, variant: DocumentType) -> Result<DocumentType, ParseError> {
    match info.text("ide/mod") {
        Some(m) if m != variant.model_code() => Err(ParseError::UnsupportedVariant(format!(
            "{variant} model {m}"
        ))),
        _ => Ok(variant),
    }
}

impl Located<'_> {
    /// Access key from the `Id` attribute (minus its letter prefix), or from
    /// the authorization protocol when the attribute is absent.
    pub fn access_key(&self, id_prefix: &str, protocol_path: &str) -> Result<String, ParseError> {
        if let Some(id) = self.info.attr("Id") {
            let key = id.trim().strip_prefix(id_prefix).unwrap_or(id.trim());
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
        self.root
            .text(protocol_path)
            .map(str::to_string)
            .ok_or_else(|| ParseError::MissingField(format!("{}@Id", self.info.name())))
    }
}

/// `emit` block, common to all variants.
pub(crate) fn parse_issuer(info: Node<'_>) -> Result<Issuer, ParseError> {
    let emit = info.require_node("emit")?;
    let identifier = emit
        .text("CNPJ")
        .or_else(|| emit.text("CPF"))
        .ok_or_else(|| ParseError::MissingField("emit/CNPJ".into()))?;
    let address = emit.require_node("enderEmit")?;
    Ok(Issuer {
        identifier: identifier.to_string(),
        name: emit.require("xNome")?.to_string(),
        trade_name: emit.owned("xFant"),
        jurisdiction: address.require("UF")?.to_string(),
        postal_code: address.owned("CEP"),
        city: address.owned("xMun"),
        registration_id: emit.owned("IE"),
    })
}

/// Optional `dest` block.
pub(crate) fn parse_recipient(info: Node<'_>, address: &str) -> Option<Recipient> {
    let dest = info.child("dest")?;
    Some(Recipient {
        identifier: dest
            .owned("CNPJ")
            .or_else(|| dest.owned("CPF"))
            .or_else(|| dest.owned("idEstrangeiro")),
        name: dest.owned("xNome"),
        jurisdiction: dest.owned(&format!("{address}/UF")),
        registration_id: dest.owned("IE"),
    })
}

/// CRT, if declared.
pub(crate) fn parse_regime(info: Node<'_>) -> Result<Option<TaxRegime>, ParseError> {
    info.text("emit/CRT")
        .map(|crt| {
            crt.parse::<u8>()
                .map(TaxRegime::from_code)
                .map_err(|_| ParseError::InvalidValue {
                    field: "emit/CRT".into(),
                    value: crt.to_string(),
                })
        })
        .transpose()
}
