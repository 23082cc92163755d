use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use super::error::ParseError;
use super::types::*;

/// Builder for normalized documents.
///
/// Parsers assemble their output through this builder, so every
/// [`Document`] in circulation satisfies the same invariants: a 44-digit
/// access key, at least one item on invoices and none on transport
/// documents.
///
/// ```
/// use nota::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::DateTime;
///
/// let issued = DateTime::parse_from_rfc3339("2024-05-10T10:00:00-03:00").unwrap();
/// let document = DocumentBuilder::new(
///     DocumentType::GoodsInvoice,
///     "35240511222333000181550010000001231123456785",
///     issued,
/// )
/// .issuer(IssuerBuilder::new("11222333000181", "ACME Comercio Ltda", "SP").build())
/// .tax_regime(TaxRegime::Normal)
/// .add_item(
///     LineItemBuilder::new(1, "P-001", "Notebook", dec!(10), "UN", dec!(100.00))
///         .operation_code("5102")
///         .build(),
/// )
/// .build()
/// .unwrap();
///
/// assert_eq!(document.totals().products, dec!(1000.00));
/// ```
pub struct DocumentBuilder {
    document_type: DocumentType,
    access_key: String,
    issue_date: DateTime<FixedOffset>,
    series: Option<String>,
    number: Option<String>,
    operation_nature: Option<String>,
    operation_code: Option<String>,
    issuer: Option<Issuer>,
    recipient: Option<Recipient>,
    tax_regime: Option<TaxRegime>,
    items: Vec<LineItem>,
    transport: Transport,
    totals: Option<Totals>,
    discount: Decimal,
    other_charges: Decimal,
}

impl DocumentBuilder {
    pub fn new(
        document_type: DocumentType,
        access_key: impl Into<String>,
        issue_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            document_type,
            access_key: access_key.into(),
            issue_date,
            series: None,
            number: None,
            operation_nature: None,
            operation_code: None,
            issuer: None,
            recipient: None,
            tax_regime: None,
            items: Vec::new(),
            transport: Transport::default(),
            totals: None,
            discount: Decimal::ZERO,
            other_charges: Decimal::ZERO,
        }
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn operation_nature(mut self, nature: impl Into<String>) -> Self {
        self.operation_nature = Some(nature.into());
        self
    }

    /// Header-level CFOP (waybills).
    pub fn operation_code(mut self, cfop: impl Into<String>) -> Self {
        self.operation_code = Some(cfop.into());
        self
    }

    pub fn issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn tax_regime(mut self, regime: TaxRegime) -> Self {
        self.tax_regime = Some(regime);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Use declared totals instead of deriving them from the items.
    pub fn totals(mut self, totals: Totals) -> Self {
        self.totals = Some(totals);
        self
    }

    /// Discount applied when totals are derived.
    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = amount;
        self
    }

    /// Freight, insurance, and other charges applied when totals are derived.
    pub fn other_charges(mut self, amount: Decimal) -> Self {
        self.other_charges = amount;
        self
    }

    /// Check invariants and assemble the document.
    pub fn build(self) -> Result<Document, ParseError> {
        if self.access_key.len() != 44 || !self.access_key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidValue {
                field: "access_key".into(),
                value: self.access_key,
            });
        }
        let issuer = self
            .issuer
            .ok_or_else(|| ParseError::MissingField("emit".into()))?;

        let is_invoice = self.document_type.is_invoice();
        if is_invoice && self.items.is_empty() {
            return Err(ParseError::MissingField("det".into()));
        }
        if !is_invoice && !self.items.is_empty() {
            return Err(ParseError::InvalidValue {
                field: "det".into(),
                value: format!("{} items on a transport document", self.items.len()),
            });
        }

        let totals = match self.totals {
            Some(totals) => totals,
            None => derive_totals(&self.items, self.discount, self.other_charges)?,
        };

        let header = Header {
            document_type: self.document_type,
            access_key: self.access_key,
            series: self.series,
            number: self.number,
            issue_date: self.issue_date,
            operation_nature: self.operation_nature,
            operation_code: self.operation_code,
            issuer,
            recipient: self.recipient,
            tax_regime: self.tax_regime,
        };

        Ok(match self.document_type {
            DocumentType::GoodsInvoice => Document::GoodsInvoice(Invoice {
                header,
                items: self.items,
                totals,
            }),
            DocumentType::ConsumerInvoice => Document::ConsumerInvoice(Invoice {
                header,
                items: self.items,
                totals,
            }),
            DocumentType::TransportWaybill => Document::TransportWaybill(TransportDocument {
                header,
                transport: self.transport,
                totals,
            }),
            DocumentType::TransportManifest => Document::TransportManifest(TransportDocument {
                header,
                transport: self.transport,
                totals,
            }),
        })
    }
}

/// Totals consistent with the items by construction.
fn derive_totals(
    items: &[LineItem],
    discount: Decimal,
    other_charges: Decimal,
) -> Result<Totals, ParseError> {
    let overflow = || ParseError::overflow("total");
    let products = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.line_total))
        .ok_or_else(overflow)?;
    let tax_breakdown =
        TaxBreakdown::sum_of(items.iter().map(|i| i.taxes)).ok_or_else(overflow)?;
    let invoice_total = products
        .checked_sub(discount)
        .and_then(|v| v.checked_add(other_charges))
        .and_then(|v| v.checked_add(tax_breakdown.ipi))
        .and_then(|v| v.checked_add(tax_breakdown.icms_st))
        .ok_or_else(overflow)?;
    Ok(Totals {
        products,
        taxes: tax_breakdown.total().ok_or_else(overflow)?,
        invoice_total,
        discount,
        other_charges,
        tax_breakdown,
    })
}

/// Builder for [`Issuer`].
pub struct IssuerBuilder {
    identifier: String,
    name: String,
    jurisdiction: String,
    trade_name: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    registration_id: Option<String>,
}

impl IssuerBuilder {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            jurisdiction: jurisdiction.into(),
            trade_name: None,
            postal_code: None,
            city: None,
            registration_id: None,
        }
    }

    pub fn trade_name(mut self, name: impl Into<String>) -> Self {
        self.trade_name = Some(name.into());
        self
    }

    pub fn postal_code(mut self, cep: impl Into<String>) -> Self {
        self.postal_code = Some(cep.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn registration_id(mut self, ie: impl Into<String>) -> Self {
        self.registration_id = Some(ie.into());
        self
    }

    pub fn build(self) -> Issuer {
        Issuer {
            identifier: self.identifier,
            name: self.name,
            trade_name: self.trade_name,
            jurisdiction: self.jurisdiction,
            postal_code: self.postal_code,
            city: self.city,
            registration_id: self.registration_id,
        }
    }
}

/// Builder for [`LineItem`].
///
/// The line total defaults to `quantity * unit_price`, saturating at the
/// `Decimal` bounds.
pub struct LineItemBuilder {
    number: u32,
    product_code: String,
    description: String,
    quantity: Decimal,
    unit: String,
    unit_price: Decimal,
    line_total: Option<Decimal>,
    classification: Option<String>,
    operation_code: Option<String>,
    tax_situation: Option<String>,
    taxes: TaxBreakdown,
    tax_rate: Option<Decimal>,
    tax_base: Option<Decimal>,
}

impl LineItemBuilder {
    pub fn new(
        number: u32,
        product_code: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            number,
            product_code: product_code.into(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            line_total: None,
            classification: None,
            operation_code: None,
            tax_situation: None,
            taxes: TaxBreakdown::default(),
            tax_rate: None,
            tax_base: None,
        }
    }

    pub fn line_total(mut self, total: Decimal) -> Self {
        self.line_total = Some(total);
        self
    }

    /// NCM code.
    pub fn classification(mut self, ncm: impl Into<String>) -> Self {
        self.classification = Some(ncm.into());
        self
    }

    /// CFOP code.
    pub fn operation_code(mut self, cfop: impl Into<String>) -> Self {
        self.operation_code = Some(cfop.into());
        self
    }

    /// CST or CSOSN code.
    pub fn tax_situation(mut self, code: impl Into<String>) -> Self {
        self.tax_situation = Some(code.into());
        self
    }

    pub fn taxes(mut self, taxes: TaxBreakdown) -> Self {
        self.taxes = taxes;
        self
    }

    /// ICMS base and rate (percent).
    pub fn icms_basis(mut self, base: Decimal, rate: Decimal) -> Self {
        self.tax_base = Some(base);
        self.tax_rate = Some(rate);
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            number: self.number,
            product_code: self.product_code,
            description: self.description,
            classification: self.classification,
            operation_code: self.operation_code,
            tax_situation: self.tax_situation,
            unit: self.unit,
            line_total: self
                .line_total
                .unwrap_or_else(|| self.quantity.saturating_mul(self.unit_price)),
            quantity: self.quantity,
            unit_price: self.unit_price,
            taxes: self.taxes,
            tax_rate: self.tax_rate,
            tax_base: self.tax_base,
        }
    }
}
