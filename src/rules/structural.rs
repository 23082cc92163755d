//! Access-key shape and its consistency with the header.

use super::{Context, Rule};
use crate::checksum::AccessKey;
use crate::core::Severity::{Error, Warning};
use crate::core::jurisdictions;

pub(super) const RULES: &[Rule] = &[
    Rule::new("STR-01", Error, "access key must have exactly 44 digits", key_shape)
        .field("header.access_key"),
    Rule::new("STR-02", Error, "invoice has no line items", has_items)
        .field("items")
        .suggestion("add at least one det element"),
    Rule::new(
        "STR-03",
        Error,
        "access key model does not match the document type",
        key_model,
    )
    .field("header.access_key"),
    Rule::new(
        "STR-04",
        Warning,
        "access key UF code does not match the issuer's UF",
        key_jurisdiction,
    )
    .field("header.access_key"),
    Rule::new(
        "STR-05",
        Warning,
        "access key year-month does not match the issue date",
        key_period,
    )
    .field("header.issue_date"),
    Rule::new(
        "STR-06",
        Warning,
        "access key issuer segment does not match the issuer identifier",
        key_issuer,
    )
    .field("header.access_key"),
];

fn key_shape(ctx: &Context<'_>) -> bool {
    AccessKey::parse(ctx.document.access_key()).is_some()
}

fn has_items(ctx: &Context<'_>) -> bool {
    !ctx.document.is_invoice() || !ctx.document.items().is_empty()
}

/// Segment rules only apply to keys that have segments; STR-01 reports the rest.
fn with_key(ctx: &Context<'_>, check: impl FnOnce(&AccessKey) -> bool) -> bool {
    AccessKey::parse(ctx.document.access_key()).is_none_or(|key| check(&key))
}

fn key_model(ctx: &Context<'_>) -> bool {
    with_key(ctx, |key| key.model == ctx.document.document_type().model_code())
}

fn key_jurisdiction(ctx: &Context<'_>) -> bool {
    // An unknown issuer UF is reported by ID-06.
    match jurisdictions::ibge_code(&ctx.document.issuer().jurisdiction) {
        Some(code) => with_key(ctx, |key| key.jurisdiction_code == code),
        None => true,
    }
}

fn key_period(ctx: &Context<'_>) -> bool {
    let period = ctx.document.header().issue_date.format("%y%m").to_string();
    with_key(ctx, |key| key.year_month == period)
}

fn key_issuer(ctx: &Context<'_>) -> bool {
    let identifier = crate::core::codes::strip_formatting(&ctx.document.issuer().identifier);
    with_key(ctx, |key| key.issuer_id == format!("{identifier:0>14}"))
}
