//! CT-e (model 57).

use rust_decimal::Decimal;

use super::reader::Node;
use super::{Located, parse_issuer, parse_recipient, parse_regime};
use crate::core::codes::normalize_modal;
use crate::core::*;

pub(super) fn parse(doc: &Located<'_>) -> Result<Document, ParseError> {
    let info = doc.info;
    let ide = info.require_node("ide")?;
    let access_key = doc.access_key("CTe", "protCTe/infProt/chCTe")?;

    let transport = Transport {
        modal: normalize_modal(ide.require("modal")?),
        carrier_registration: info.owned("infCTeNorm/infModal/rodo/RNTRC"),
        vehicle_plate: info.owned("infCTeNorm/infModal/rodo/veic/placa"),
        cargo_weight: cargo_weight(info)?,
        origin: ide.owned("UFIni"),
        destination: ide.owned("UFFim"),
        route: Vec::new(),
    };

    let mut builder = DocumentBuilder::new(doc.variant, access_key, ide.require_timestamp("dhEmi")?)
        .issuer(parse_issuer(info)?)
        .operation_code(ide.require("CFOP")?)
        .transport(transport)
        .totals(parse_totals(info)?);
    if let Some(regime) = parse_regime(info)? {
        builder = builder.tax_regime(regime);
    }
    if let Some(recipient) = parse_recipient(info, "enderDest") {
        builder = builder.recipient(recipient);
    }
    if let Some(series) = ide.text("serie") {
        builder = builder.series(series);
    }
    if let Some(number) = ide.text("nCT") {
        builder = builder.number(number);
    }
    if let Some(nature) = ide.text("natOp") {
        builder = builder.operation_nature(nature);
    }

    builder.build()
}

fn parse_totals(info: Node<'_>) -> Result<Totals, ParseError> {
    let tax_breakdown = TaxBreakdown {
        icms: match info.at("imp/ICMS").and_then(|g| g.first_child()) {
            Some(group) => group.amount("vICMS")?,
            None => Decimal::ZERO,
        },
        ..Default::default()
    };
    Ok(Totals {
        invoice_total: info.require_decimal("vPrest/vTPrest")?,
        taxes: tax_breakdown
            .total()
            .ok_or_else(|| ParseError::overflow("imp/ICMS"))?,
        tax_breakdown,
        ..Default::default()
    })
}

/// Gross weight in kilograms from the `infQ` entries measured by weight
/// (unit `01` kilograms, `02` tonnes). `None` when no weight is declared.
fn cargo_weight(info: Node<'_>) -> Result<Option<Decimal>, ParseError> {
    let Some(cargo) = info.at("infCTeNorm/infCarga") else {
        return Ok(None);
    };
    for quantity in cargo.children("infQ") {
        let factor = match quantity.text("cUnid") {
            Some("01") => Decimal::ONE,
            Some("02") => Decimal::ONE_THOUSAND,
            _ => continue,
        };
        if let Some(q) = quantity.decimal("qCarga")? {
            let kilograms = q
                .checked_mul(factor)
                .ok_or_else(|| ParseError::overflow("infQ/qCarga"))?;
            return Ok(Some(kilograms));
        }
    }
    Ok(None)
}
