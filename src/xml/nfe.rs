//! NF-e (model 55) and NFC-e (model 65).

use rust_decimal::Decimal;

use super::reader::Node;
use super::{Located, parse_issuer, parse_recipient, parse_regime};
use crate::core::*;

pub(super) fn parse(doc: &Located<'_>) -> Result<Document, ParseError> {
    let info = doc.info;
    let ide = info.require_node("ide")?;
    let access_key = doc.access_key("NFe", "protNFe/infProt/chNFe")?;

    let regime = parse_regime(info)?.ok_or_else(|| ParseError::MissingField("emit/CRT".into()))?;

    let mut builder = DocumentBuilder::new(doc.variant, access_key, ide.require_timestamp("dhEmi")?)
        .issuer(parse_issuer(info)?)
        .tax_regime(regime)
        .totals(parse_totals(info)?);
    if let Some(recipient) = parse_recipient(info, "enderDest") {
        builder = builder.recipient(recipient);
    }
    if let Some(series) = ide.text("serie") {
        builder = builder.series(series);
    }
    if let Some(number) = ide.text("nNF") {
        builder = builder.number(number);
    }
    if let Some(nature) = ide.text("natOp") {
        builder = builder.operation_nature(nature);
    }

    for (index, det) in info.children("det").into_iter().enumerate() {
        builder = builder.add_item(parse_item(det, index)?);
    }

    builder.build()
}

fn parse_item(det: Node<'_>, index: usize) -> Result<LineItem, ParseError> {
    let number = match det.attr("nItem") {
        Some(n) => n.trim().parse::<u32>().map_err(|_| ParseError::InvalidValue {
            field: "det@nItem".into(),
            value: n.to_string(),
        })?,
        None => index as u32 + 1,
    };

    let prod = det.require_node("prod")?;
    let quantity = prod.require_decimal("qCom")?;
    let unit_price = prod.require_decimal("vUnCom")?;

    let mut item = LineItemBuilder::new(
        number,
        prod.require("cProd")?,
        prod.require("xProd")?,
        quantity,
        prod.text("uCom").unwrap_or_default(),
        unit_price,
    )
    .line_total(prod.require_decimal("vProd")?);
    if let Some(ncm) = prod.text("NCM") {
        item = item.classification(ncm);
    }
    if let Some(cfop) = prod.text("CFOP") {
        item = item.operation_code(cfop);
    }

    let mut taxes = TaxBreakdown::default();
    let mut basis = (None, None);
    if let Some(imposto) = det.child("imposto") {
        if let Some(icms) = imposto.child("ICMS").and_then(|g| g.first_child()) {
            if let Some(code) = icms.text("CST").or_else(|| icms.text("CSOSN")) {
                item = item.tax_situation(code);
            }
            taxes.icms = icms.amount("vICMS")?;
            taxes.icms_st = icms.amount("vICMSST")?;
            basis = (icms.decimal("vBC")?, icms.decimal("pICMS")?);
        }
        taxes.ipi = imposto.amount("IPI/IPITrib/vIPI")?;
        taxes.pis = group_amount(imposto, "PIS", "vPIS")?;
        taxes.cofins = group_amount(imposto, "COFINS", "vCOFINS")?;
    }

    let mut item = item.taxes(taxes).build();
    item.tax_base = basis.0;
    item.tax_rate = basis.1;
    Ok(item)
}

/// Amount inside the single situation-specific child of a tax group
/// (`PIS/PISAliq/vPIS`, `PIS/PISOutr/vPIS`, ...).
fn group_amount(imposto: Node<'_>, group: &str, field: &str) -> Result<Decimal, ParseError> {
    match imposto.child(group).and_then(|g| g.first_child()) {
        Some(inner) => inner.amount(field),
        None => Ok(Decimal::ZERO),
    }
}

fn parse_totals(info: Node<'_>) -> Result<Totals, ParseError> {
    let tot = info.require_node("total/ICMSTot")?;
    let tax_breakdown = TaxBreakdown {
        icms: tot.amount("vICMS")?,
        icms_st: tot.amount("vST")?,
        ipi: tot.amount("vIPI")?,
        pis: tot.amount("vPIS")?,
        cofins: tot.amount("vCOFINS")?,
    };
    let (freight, insurance, other) = (
        tot.amount("vFrete")?,
        tot.amount("vSeg")?,
        tot.amount("vOutro")?,
    );
    let other_charges = freight
        .checked_add(insurance)
        .and_then(|v| v.checked_add(other))
        .ok_or_else(|| ParseError::overflow("total/ICMSTot"))?;
    Ok(Totals {
        products: tot.amount("vProd")?,
        taxes: tax_breakdown
            .total()
            .ok_or_else(|| ParseError::overflow("total/ICMSTot"))?,
        invoice_total: tot.require_decimal("vNF")?,
        discount: tot.amount("vDesc")?,
        other_charges,
        tax_breakdown,
    })
}
