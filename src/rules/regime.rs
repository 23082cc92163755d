//! Tax regime consistency and product classification.

use super::{Context, Rule};
use crate::core::Severity::Warning;
use crate::core::TaxRegime;
use crate::core::codes::{is_csosn, is_cst, is_valid_classification};

pub(super) const RULES: &[Rule] = &[
    Rule::new("REG-01", Warning, "tax regime (CRT) code is not recognized", known_regime)
        .field("header.tax_regime"),
    Rule::new(
        "REG-02",
        Warning,
        "ICMS situation code does not fit the tax regime",
        situation_fits_regime,
    )
    .field("items[].tax_situation")
    .suggestion("Simples Nacional issuers use 3-digit CSOSN, others use 2-digit CST"),
    Rule::new("REG-03", Warning, "item has no ICMS situation code", has_situation)
        .field("items[].tax_situation"),
    Rule::new("CAT-01", Warning, "NCM classification must have 8 digits", classification)
        .field("items[].classification"),
];

fn known_regime(ctx: &Context<'_>) -> bool {
    !matches!(ctx.document.header().tax_regime, Some(TaxRegime::Other(_)))
}

fn situation_fits_regime(ctx: &Context<'_>) -> bool {
    let accepts: fn(&str) -> bool = match ctx.document.header().tax_regime {
        Some(TaxRegime::Other(_)) | None => return true,
        Some(regime) if regime.uses_csosn() => is_csosn,
        Some(_) => is_cst,
    };
    ctx.document
        .items()
        .iter()
        .filter_map(|i| i.tax_situation.as_deref())
        .all(accepts)
}

fn has_situation(ctx: &Context<'_>) -> bool {
    ctx.document.items().iter().all(|i| i.tax_situation.is_some())
}

fn classification(ctx: &Context<'_>) -> bool {
    ctx.document
        .items()
        .iter()
        .filter_map(|i| i.classification.as_deref())
        .all(is_valid_classification)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::core::TaxRegime;

    #[test]
    fn fixtures_pass() {
        for doc in [goods_invoice(), consumer_invoice(), waybill(), manifest()] {
            let codes = failing(&doc);
            assert!(
                !codes.iter().any(|c| c.starts_with("REG") || c.starts_with("CAT")),
                "{codes:?}"
            );
        }
    }

    #[test]
    fn unknown_regime() {
        let mut doc = goods_invoice();
        header_mut(&mut doc).tax_regime = Some(TaxRegime::Other(7));
        let codes = failing(&doc);
        assert!(codes.contains(&"REG-01".to_string()));
        assert!(!codes.contains(&"REG-02".to_string()));
    }

    #[test]
    fn simples_issuer_with_cst() {
        let mut doc = consumer_invoice();
        items_mut(&mut doc)[0].tax_situation = Some("00".into());
        assert!(fails(&doc, "REG-02"));
    }

    #[test]
    fn sublimit_issuer_uses_cst() {
        let mut doc = goods_invoice();
        header_mut(&mut doc).tax_regime = Some(TaxRegime::SimplesExcessoSublimite);
        assert!(!fails(&doc, "REG-02"));
        items_mut(&mut doc)[0].tax_situation = Some("102".into());
        assert!(fails(&doc, "REG-02"));
    }

    #[test]
    fn missing_situation() {
        let mut doc = goods_invoice();
        items_mut(&mut doc)[0].tax_situation = None;
        let codes = failing(&doc);
        assert!(codes.contains(&"REG-03".to_string()));
        assert!(!codes.contains(&"REG-02".to_string()));
    }

    #[test]
    fn short_ncm() {
        let mut doc = goods_invoice();
        items_mut(&mut doc)[0].classification = Some("8471".into());
        assert!(fails(&doc, "CAT-01"));
    }
}
