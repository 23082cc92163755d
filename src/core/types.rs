use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Model code of a fiscal document (the `mod` field of the access key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 55: NF-e, goods invoice.
    GoodsInvoice,
    /// 65: NFC-e, consumer invoice.
    ConsumerInvoice,
    /// 57: CT-e, transport waybill.
    TransportWaybill,
    /// 58: MDF-e, transport manifest.
    TransportManifest,
}

impl DocumentType {
    /// Two-digit model code.
    pub fn model_code(&self) -> &'static str {
        match self {
            Self::GoodsInvoice => "55",
            Self::ConsumerInvoice => "65",
            Self::TransportWaybill => "57",
            Self::TransportManifest => "58",
        }
    }

    /// Parse from the two-digit model code.
    pub fn from_model_code(code: &str) -> Option<Self> {
        match code {
            "55" => Some(Self::GoodsInvoice),
            "65" => Some(Self::ConsumerInvoice),
            "57" => Some(Self::TransportWaybill),
            "58" => Some(Self::TransportManifest),
            _ => None,
        }
    }

    /// Invoice variants carry line items; transport variants never do.
    pub fn is_invoice(&self) -> bool {
        matches!(self, Self::GoodsInvoice | Self::ConsumerInvoice)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GoodsInvoice => "NF-e",
            Self::ConsumerInvoice => "NFC-e",
            Self::TransportWaybill => "CT-e",
            Self::TransportManifest => "MDF-e",
        };
        f.write_str(name)
    }
}

/// CRT: tax regime of the issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// 1: Simples Nacional.
    SimplesNacional,
    /// 2: Simples Nacional, gross revenue above the sub-limit.
    SimplesExcessoSublimite,
    /// 3: Regime normal.
    Normal,
    /// 4: Simples Nacional, individual micro-entrepreneur (MEI).
    Mei,
    /// Any other code value.
    Other(u8),
}

impl TaxRegime {
    pub fn code(&self) -> u8 {
        match self {
            Self::SimplesNacional => 1,
            Self::SimplesExcessoSublimite => 2,
            Self::Normal => 3,
            Self::Mei => 4,
            Self::Other(c) => *c,
        }
    }

    /// Parse from the CRT numeric code.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::SimplesNacional,
            2 => Self::SimplesExcessoSublimite,
            3 => Self::Normal,
            4 => Self::Mei,
            c => Self::Other(c),
        }
    }

    /// Whether items must be coded with CSOSN instead of CST.
    ///
    /// Issuers above the Simples sub-limit report ICMS like regular-regime
    /// taxpayers, so only codes 1 and 4 select the CSOSN scheme.
    pub fn uses_csosn(&self) -> bool {
        matches!(self, Self::SimplesNacional | Self::Mei)
    }
}

/// Header fields shared by every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Document model.
    pub document_type: DocumentType,
    /// 44-digit access key.
    pub access_key: String,
    /// Document series.
    pub series: Option<String>,
    /// Document number within the series.
    pub number: Option<String>,
    /// Emission timestamp with its original UTC offset.
    pub issue_date: DateTime<FixedOffset>,
    /// Nature of the operation (`natOp`).
    pub operation_nature: Option<String>,
    /// Header-level operation code (CT-e only; invoices code per item).
    pub operation_code: Option<String>,
    /// Issuer (emitente).
    pub issuer: Issuer,
    /// Recipient (destinatário); optional on NFC-e and absent on MDF-e.
    pub recipient: Option<Recipient>,
    /// CRT of the issuer, when the layout declares one.
    pub tax_regime: Option<TaxRegime>,
}

/// Issuer of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issuer {
    /// CNPJ (14 digits) or CPF (11 digits).
    pub identifier: String,
    /// Legal name.
    pub name: String,
    /// Trade name.
    pub trade_name: Option<String>,
    /// UF abbreviation (e.g. "SP").
    pub jurisdiction: String,
    /// CEP, 8 digits.
    pub postal_code: Option<String>,
    /// Municipality name.
    pub city: Option<String>,
    /// State registration (IE), or "ISENTO".
    pub registration_id: Option<String>,
}

/// Recipient of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    /// CNPJ, CPF or foreign identifier.
    pub identifier: Option<String>,
    /// Legal name.
    pub name: Option<String>,
    /// UF abbreviation, "EX" for recipients abroad.
    pub jurisdiction: Option<String>,
    /// State registration (IE).
    pub registration_id: Option<String>,
}

/// Amounts per tax category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub icms: Decimal,
    /// ICMS withheld by tax substitution.
    pub icms_st: Decimal,
    pub ipi: Decimal,
    pub pis: Decimal,
    pub cofins: Decimal,
}

impl TaxBreakdown {
    /// Sum over all five categories, `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.icms
            .checked_add(self.icms_st)?
            .checked_add(self.ipi)?
            .checked_add(self.pis)?
            .checked_add(self.cofins)
    }

    /// Category-wise sum, `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            icms: self.icms.checked_add(rhs.icms)?,
            icms_st: self.icms_st.checked_add(rhs.icms_st)?,
            ipi: self.ipi.checked_add(rhs.ipi)?,
            pis: self.pis.checked_add(rhs.pis)?,
            cofins: self.cofins.checked_add(rhs.cofins)?,
        })
    }

    /// Category-wise sum of many breakdowns, `None` on overflow.
    pub fn sum_of(breakdowns: impl IntoIterator<Item = Self>) -> Option<Self> {
        breakdowns
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }
}

/// Invoice line item (`det`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// `nItem`, 1-based.
    pub number: u32,
    /// Seller's product code.
    pub product_code: String,
    pub description: String,
    /// NCM product classification.
    pub classification: Option<String>,
    /// CFOP operation code.
    pub operation_code: Option<String>,
    /// CST (2 digits) or CSOSN (3 digits) of the ICMS group.
    pub tax_situation: Option<String>,
    /// Commercial unit.
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Gross line value (`vProd`).
    pub line_total: Decimal,
    /// Per-item tax amounts.
    pub taxes: TaxBreakdown,
    /// ICMS rate in percent.
    pub tax_rate: Option<Decimal>,
    /// ICMS calculation base.
    pub tax_base: Option<Decimal>,
}

/// Monetary totals of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of goods (`vProd`); zero for transport documents.
    pub products: Decimal,
    /// Sum of the tax breakdown.
    pub taxes: Decimal,
    /// Document total (`vNF`, `vTPrest`, or `vCarga`).
    pub invoice_total: Decimal,
    pub discount: Decimal,
    /// Freight, insurance, and other charges.
    pub other_charges: Decimal,
    /// Document-level tax breakdown.
    pub tax_breakdown: TaxBreakdown,
}

/// Transport-specific data of waybills and manifests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    /// Two-digit modal code ("01" road ... "06" multimodal).
    pub modal: String,
    /// RNTRC of the carrier.
    pub carrier_registration: Option<String>,
    /// Plate of the traction vehicle.
    pub vehicle_plate: Option<String>,
    /// Gross cargo weight in kilograms.
    pub cargo_weight: Option<Decimal>,
    /// UF where the service starts.
    pub origin: Option<String>,
    /// UF where the service ends.
    pub destination: Option<String>,
    /// Intermediate UFs crossed, in travel order (MDF-e only).
    pub route: Vec<String>,
}

/// NF-e / NFC-e body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub header: Header,
    pub items: Vec<LineItem>,
    pub totals: Totals,
}

/// CT-e / MDF-e body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportDocument {
    pub header: Header,
    pub transport: Transport,
    pub totals: Totals,
}

/// A normalized fiscal document.
///
/// Constructed once by a parser (or [`DocumentBuilder`](super::DocumentBuilder))
/// and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant")]
pub enum Document {
    GoodsInvoice(Invoice),
    ConsumerInvoice(Invoice),
    TransportWaybill(TransportDocument),
    TransportManifest(TransportDocument),
}

impl Document {
    pub fn header(&self) -> &Header {
        match self {
            Self::GoodsInvoice(i) | Self::ConsumerInvoice(i) => &i.header,
            Self::TransportWaybill(t) | Self::TransportManifest(t) => &t.header,
        }
    }

    pub fn totals(&self) -> &Totals {
        match self {
            Self::GoodsInvoice(i) | Self::ConsumerInvoice(i) => &i.totals,
            Self::TransportWaybill(t) | Self::TransportManifest(t) => &t.totals,
        }
    }

    /// Line items; always empty for transport variants.
    pub fn items(&self) -> &[LineItem] {
        match self {
            Self::GoodsInvoice(i) | Self::ConsumerInvoice(i) => &i.items,
            Self::TransportWaybill(_) | Self::TransportManifest(_) => &[],
        }
    }

    /// Transport data; `None` for invoice variants.
    pub fn transport(&self) -> Option<&Transport> {
        match self {
            Self::GoodsInvoice(_) | Self::ConsumerInvoice(_) => None,
            Self::TransportWaybill(t) | Self::TransportManifest(t) => Some(&t.transport),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::GoodsInvoice(_) => DocumentType::GoodsInvoice,
            Self::ConsumerInvoice(_) => DocumentType::ConsumerInvoice,
            Self::TransportWaybill(_) => DocumentType::TransportWaybill,
            Self::TransportManifest(_) => DocumentType::TransportManifest,
        }
    }

    pub fn access_key(&self) -> &str {
        &self.header().access_key
    }

    pub fn issuer(&self) -> &Issuer {
        &self.header().issuer
    }

    pub fn recipient(&self) -> Option<&Recipient> {
        self.header().recipient.as_ref()
    }

    pub fn is_invoice(&self) -> bool {
        self.document_type().is_invoice()
    }
}
