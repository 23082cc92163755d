//! Rules backed by capability adapters.
//!
//! Every rule here passes unless the adapter gives a definite answer that
//! contradicts the document. `NotFound`, `Unavailable`, an empty adapter
//! slot, and `external_lookups = false` all pass.

use super::{Context, Rule};
use crate::capability::{Outcome, name_similarity};
use crate::core::Severity::{Info, Warning};
use crate::core::codes::strip_formatting;
use crate::core::jurisdictions::ABROAD;

pub(super) const RULES: &[Rule] = &[
    Rule::new("EXT-01", Warning, "access key was already processed", not_duplicate)
        .field("header.access_key"),
    Rule::new(
        "EXT-02",
        Warning,
        "issuer is not active in the federal registry",
        issuer_active,
    )
    .field("header.issuer.identifier"),
    Rule::new(
        "EXT-03",
        Warning,
        "recipient is not active in the federal registry",
        recipient_active,
    )
    .field("header.recipient.identifier"),
    Rule::new(
        "EXT-04",
        Warning,
        "issuer CEP belongs to a different UF",
        issuer_address,
    )
    .field("header.issuer.postal_code"),
    Rule::new("EXT-05", Warning, "NCM code is not in the product catalog", catalog)
        .field("items[].classification"),
    Rule::new(
        "EXT-06",
        Info,
        "issuer name differs from the registered name",
        issuer_name,
    )
    .field("header.issuer.name"),
];

fn not_duplicate(ctx: &Context<'_>) -> bool {
    !ctx.config.external_lookups
        || ctx.capabilities.seen(ctx.document.access_key()) != Outcome::Found(true)
}

fn active(ctx: &Context<'_>, identifier: &str) -> bool {
    match ctx.capabilities.identifier_status(&strip_formatting(identifier)) {
        Outcome::Found(status) => status.status.is_active(),
        Outcome::NotFound | Outcome::Unavailable => true,
    }
}

fn issuer_active(ctx: &Context<'_>) -> bool {
    !ctx.config.external_lookups || active(ctx, &ctx.document.issuer().identifier)
}

fn recipient_active(ctx: &Context<'_>) -> bool {
    if !ctx.config.external_lookups {
        return true;
    }
    let Some(recipient) = ctx.document.recipient() else {
        return true;
    };
    if recipient.jurisdiction.as_deref() == Some(ABROAD) {
        return true;
    }
    recipient.identifier.as_deref().is_none_or(|id| active(ctx, id))
}

fn issuer_address(ctx: &Context<'_>) -> bool {
    if !ctx.config.external_lookups {
        return true;
    }
    let issuer = ctx.document.issuer();
    let Some(cep) = &issuer.postal_code else {
        return true;
    };
    match ctx.capabilities.address(&strip_formatting(cep)) {
        Outcome::Found(address) => address.jurisdiction == issuer.jurisdiction,
        Outcome::NotFound | Outcome::Unavailable => true,
    }
}

fn catalog(ctx: &Context<'_>) -> bool {
    if !ctx.config.external_lookups {
        return true;
    }
    ctx.document
        .items()
        .iter()
        .filter_map(|i| i.classification.as_deref())
        .all(|ncm| ctx.capabilities.product_exists(ncm) != Outcome::Found(false))
}

fn issuer_name(ctx: &Context<'_>) -> bool {
    if !ctx.config.external_lookups {
        return true;
    }
    let issuer = ctx.document.issuer();
    let registered = ctx
        .capabilities
        .identifier_status(&strip_formatting(&issuer.identifier))
        .found()
        .and_then(|status| status.registered_name);
    match registered {
        Some(name) => name_similarity(&issuer.name, &name) >= ctx.config.name_match_threshold,
        None => true,
    }
}
