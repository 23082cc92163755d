//! Fields that are optional in the layouts but expected in practice.

use super::{Context, Rule};
use crate::core::Severity::Info;
use crate::core::codes::{Modal, strip_formatting};
use crate::core::DocumentType;

pub(super) const RULES: &[Rule] = &[
    Rule::new("INF-01", Info, "issuer CEP is missing or not 8 digits", issuer_postal_code)
        .field("header.issuer.postal_code"),
    Rule::new("INF-02", Info, "goods invoice has no recipient", has_recipient)
        .field("header.recipient"),
    Rule::new("INF-03", Info, "item has no NCM classification", has_classification)
        .field("items[].classification"),
    Rule::new("INF-04", Info, "nature of operation (natOp) is missing", has_nature)
        .field("header.operation_nature"),
    Rule::new("INF-05", Info, "road transport without a vehicle plate", road_has_plate)
        .field("transport.vehicle_plate"),
];

fn issuer_postal_code(ctx: &Context<'_>) -> bool {
    ctx.document.issuer().postal_code.as_deref().is_some_and(|cep| {
        let cep = strip_formatting(cep);
        cep.len() == 8 && cep.bytes().all(|b| b.is_ascii_digit())
    })
}

fn has_recipient(ctx: &Context<'_>) -> bool {
    ctx.document.document_type() != DocumentType::GoodsInvoice || ctx.document.recipient().is_some()
}

fn has_classification(ctx: &Context<'_>) -> bool {
    ctx.document.items().iter().all(|i| i.classification.is_some())
}

/// MDF-e has no natOp.
fn has_nature(ctx: &Context<'_>) -> bool {
    let header = ctx.document.header();
    header.document_type == DocumentType::TransportManifest
        || header
            .operation_nature
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
}

fn road_has_plate(ctx: &Context<'_>) -> bool {
    ctx.document.transport().is_none_or(|t| {
        Modal::from_code(&t.modal) != Some(Modal::Road) || t.vehicle_plate.is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::core::Severity;

    #[test]
    fn fixtures_pass() {
        for doc in [goods_invoice(), consumer_invoice(), waybill(), manifest()] {
            let codes = failing(&doc);
            assert!(!codes.iter().any(|c| c.starts_with("INF")), "{codes:?}");
        }
    }

    #[test]
    fn missing_fields_are_info_only() {
        let mut doc = goods_invoice();
        let header = header_mut(&mut doc);
        header.issuer.postal_code = None;
        header.recipient = None;
        header.operation_nature = None;
        items_mut(&mut doc)[0].classification = None;

        let issues = super::super::Validator::default().validate(&doc);
        let codes: Vec<_> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["INF-01", "INF-02", "INF-03", "INF-04"]);
        assert!(issues.iter().all(|i| i.severity == Severity::Info));
    }

    #[test]
    fn formatted_cep_accepted() {
        let mut doc = waybill();
        header_mut(&mut doc).issuer.postal_code = Some("04538-132".into());
        assert!(!fails(&doc, "INF-01"));
    }

    #[test]
    fn consumer_invoice_without_recipient() {
        assert!(!fails(&consumer_invoice(), "INF-02"));
    }

    #[test]
    fn road_without_plate() {
        let mut doc = manifest();
        transport_mut(&mut doc).vehicle_plate = None;
        assert!(fails(&doc, "INF-05"));
        transport_mut(&mut doc).modal = "02".into();
        assert!(!fails(&doc, "INF-05"));
    }
}
