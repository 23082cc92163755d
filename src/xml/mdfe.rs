//! MDF-e (model 58).

use rust_decimal::Decimal;

use super::reader::Node;
use super::{Located, parse_issuer};
use crate::core::codes::normalize_modal;
use crate::core::*;

pub(super) fn parse(doc: &Located<'_>) -> Result<Document, ParseError> {
    let info = doc.info;
    let ide = info.require_node("ide")?;
    let access_key = doc.access_key("MDFe", "protMDFe/infProt/chMDFe")?;

    let route = ide
        .children("infPercurso")
        .iter()
        .filter_map(|p| p.owned("UFPer"))
        .collect();

    let rodo = info.at("infModal/rodo");
    let transport = Transport {
        modal: normalize_modal(ide.require("modal")?),
        carrier_registration: rodo.and_then(|r| {
            r.owned("infANTT/RNTRC").or_else(|| r.owned("RNTRC"))
        }),
        vehicle_plate: rodo.and_then(|r| r.owned("veicTracao/placa")),
        cargo_weight: cargo_weight(info)?,
        origin: ide.owned("UFIni"),
        destination: ide.owned("UFFim"),
        route,
    };

    let totals = Totals {
        invoice_total: info.amount("tot/vCarga")?,
        ..Default::default()
    };

    let mut builder = DocumentBuilder::new(doc.variant, access_key, ide.require_timestamp("dhEmi")?)
        .issuer(parse_issuer(info)?)
        .transport(transport)
        .totals(totals);
    if let Some(series) = ide.text("serie") {
        builder = builder.series(series);
    }
    if let Some(number) = ide.text("nMDF") {
        builder = builder.number(number);
    }

    builder.build()
}

/// `tot/qCarga` in kilograms; unit `01` is kilograms, `02` tonnes.
fn cargo_weight(info: Node<'_>) -> Result<Option<Decimal>, ParseError> {
    let Some(quantity) = info.decimal("tot/qCarga")? else {
        return Ok(None);
    };
    match info.text("tot/cUnid") {
        Some("02") => quantity
            .checked_mul(Decimal::ONE_THOUSAND)
            .map(Some)
            .ok_or_else(|| ParseError::overflow("tot/qCarga")),
        _ => Ok(Some(quantity)),
    }
}
