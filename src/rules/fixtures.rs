//! Internally consistent documents of each variant for rule tests.

use chrono::DateTime;
use rust_decimal_macros::dec;

use crate::core::*;

pub const NFE_KEY: &str = "35240511222333000181550010000001231123456785";
pub const NFCE_KEY: &str = "35240511222333000181650010000004561123456785";
pub const CTE_KEY: &str = "35240512345678000195570010000007891123456788";
pub const MDFE_KEY: &str = "35240512345678000195580010000000421123456787";

fn issued(ts: &str) -> chrono::DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(ts).unwrap()
}

fn retailer() -> Issuer {
    IssuerBuilder::new("11222333000181", "ACME Comercio Ltda", "SP")
        .postal_code("01310100")
        .city("São Paulo")
        .registration_id("110042490114")
        .build()
}

fn carrier() -> Issuer {
    IssuerBuilder::new("12345678000195", "Transportes Rapido Ltda", "SP")
        .postal_code("04538132")
        .registration_id("110042490114")
        .build()
}

pub fn goods_invoice() -> Document {
    DocumentBuilder::new(
        DocumentType::GoodsInvoice,
        NFE_KEY,
        issued("2024-05-10T10:00:00-03:00"),
    )
    .series("1")
    .number("123")
    .operation_nature("Venda de mercadoria")
    .issuer(retailer())
    .recipient(Recipient {
        identifier: Some("98765432000198".into()),
        name: Some("Cliente Exemplo SA".into()),
        jurisdiction: Some("SP".into()),
        registration_id: None,
    })
    .tax_regime(TaxRegime::Normal)
    .add_item(
        LineItemBuilder::new(1, "P-001", "Notebook", dec!(10), "UN", dec!(100.00))
            .line_total(dec!(1000.00))
            .classification("84713012")
            .operation_code("5102")
            .tax_situation("00")
            .icms_basis(dec!(1000.00), dec!(18.00))
            .taxes(TaxBreakdown {
                icms: dec!(180.00),
                icms_st: dec!(0),
                ipi: dec!(100.00),
                pis: dec!(16.50),
                cofins: dec!(76.00),
            })
            .build(),
    )
    .build()
    .unwrap()
}

pub fn consumer_invoice() -> Document {
    DocumentBuilder::new(
        DocumentType::ConsumerInvoice,
        NFCE_KEY,
        issued("2024-05-10T18:45:00-03:00"),
    )
    .operation_nature("Venda ao consumidor")
    .issuer(retailer())
    .tax_regime(TaxRegime::SimplesNacional)
    .add_item(
        LineItemBuilder::new(1, "P-002", "Caneta", dec!(3), "UN", dec!(2.50))
            .classification("96081000")
            .operation_code("5102")
            .tax_situation("102")
            .build(),
    )
    .build()
    .unwrap()
}

pub fn waybill() -> Document {
    DocumentBuilder::new(
        DocumentType::TransportWaybill,
        CTE_KEY,
        issued("2024-05-02T08:30:00-03:00"),
    )
    .operation_nature("Prestacao de servico de transporte")
    .operation_code("5353")
    .issuer(carrier())
    .recipient(Recipient {
        identifier: Some("11222333000181".into()),
        name: Some("ACME Comercio Ltda".into()),
        jurisdiction: Some("SP".into()),
        registration_id: Some("110042490114".into()),
    })
    .tax_regime(TaxRegime::Normal)
    .transport(Transport {
        modal: "01".into(),
        carrier_registration: Some("12345678".into()),
        vehicle_plate: Some("ABC1234".into()),
        cargo_weight: Some(dec!(1500)),
        origin: Some("SP".into()),
        destination: Some("SP".into()),
        route: Vec::new(),
    })
    .totals(Totals {
        invoice_total: dec!(1500.00),
        taxes: dec!(180.00),
        tax_breakdown: TaxBreakdown {
            icms: dec!(180.00),
            ..Default::default()
        },
        ..Default::default()
    })
    .build()
    .unwrap()
}

pub fn manifest() -> Document {
    DocumentBuilder::new(
        DocumentType::TransportManifest,
        MDFE_KEY,
        issued("2024-05-03T06:00:00-03:00"),
    )
    .issuer(carrier())
    .transport(Transport {
        modal: "01".into(),
        carrier_registration: Some("12345678".into()),
        vehicle_plate: Some("ABC1D23".into()),
        cargo_weight: Some(dec!(12500)),
        origin: Some("SP".into()),
        destination: Some("BA".into()),
        route: vec!["MG".into()],
    })
    .totals(Totals {
        invoice_total: dec!(52000.00),
        ..Default::default()
    })
    .build()
    .unwrap()
}

/// Mutable access to the shared header, for tests that corrupt one field.
pub fn header_mut(document: &mut Document) -> &mut Header {
    match document {
        Document::GoodsInvoice(i) | Document::ConsumerInvoice(i) => &mut i.header,
        Document::TransportWaybill(t) | Document::TransportManifest(t) => &mut t.header,
    }
}

pub fn items_mut(document: &mut Document) -> &mut Vec<LineItem> {
    match document {
        Document::GoodsInvoice(i) | Document::ConsumerInvoice(i) => &mut i.items,
        _ => panic!("not an invoice"),
    }
}

pub fn transport_mut(document: &mut Document) -> &mut Transport {
    match document {
        Document::TransportWaybill(t) | Document::TransportManifest(t) => &mut t.transport,
        _ => panic!("not a transport document"),
    }
}

pub fn totals_mut(document: &mut Document) -> &mut Totals {
    match document {
        Document::GoodsInvoice(i) | Document::ConsumerInvoice(i) => &mut i.totals,
        Document::TransportWaybill(t) | Document::TransportManifest(t) => &mut t.totals,
    }
}

/// Codes of every failing rule under the default configuration.
pub fn failing(document: &Document) -> Vec<String> {
    super::Validator::default()
        .validate(document)
        .into_iter()
        .map(|i| i.code)
        .collect()
}

pub fn fails(document: &Document, code: &str) -> bool {
    failing(document).iter().any(|c| c == code)
}
