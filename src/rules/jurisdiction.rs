//! CFOP scope against the parties' UFs, and transport routes.

use std::collections::HashSet;

use super::{Context, Rule};
use crate::core::Severity::Warning;
use crate::core::codes::{OperationDirection, OperationScope, operation_scope};
use crate::core::jurisdictions::{ABROAD, is_known_jurisdiction};
use crate::core::DocumentType;

pub(super) const RULES: &[Rule] = &[
    Rule::new(
        "JUR-01",
        Warning,
        "CFOP scope does not match the origin and destination UFs",
        cfop_scope,
    )
    .field("items[].operation_code")
    .suggestion("use 5xxx within one UF, 6xxx across UFs, 7xxx for exports"),
    Rule::new("JUR-02", Warning, "CFOP is not a valid 4-digit operation code", cfop_format)
        .field("items[].operation_code"),
    Rule::new(
        "JUR-03",
        Warning,
        "route, origin or destination names an unknown UF",
        route_known,
    )
    .field("transport.route"),
    Rule::new("JUR-04", Warning, "route lists the same UF twice", route_unique)
        .field("transport.route"),
    Rule::new(
        "JUR-05",
        Warning,
        "route repeats the origin or destination UF",
        route_excludes_endpoints,
    )
    .field("transport.route"),
    Rule::new("JUR-06", Warning, "recipient UF is not recognized", recipient_uf)
        .field("header.recipient.jurisdiction"),
    Rule::new(
        "JUR-07",
        Warning,
        "consumer invoices only allow in-state outbound CFOPs (5xxx)",
        consumer_cfop,
    )
    .field("items[].operation_code"),
];

fn expected_scope(from: &str, to: &str) -> OperationScope {
    if to == ABROAD {
        OperationScope::Foreign
    } else if from == to {
        OperationScope::SameJurisdiction
    } else {
        OperationScope::CrossJurisdiction
    }
}

/// Malformed codes are left to JUR-02.
fn scope_matches(cfop: &str, from: &str, to: &str) -> bool {
    match operation_scope(cfop) {
        Some((scope, _)) => scope == expected_scope(from, to),
        None => true,
    }
}

fn cfop_scope(ctx: &Context<'_>) -> bool {
    let doc = ctx.document;
    if let Some(transport) = doc.transport() {
        return match (
            &doc.header().operation_code,
            &transport.origin,
            &transport.destination,
        ) {
            (Some(cfop), Some(from), Some(to)) => scope_matches(cfop, from, to),
            _ => true,
        };
    }

    let Some(to) = doc.recipient().and_then(|r| r.jurisdiction.as_deref()) else {
        return true;
    };
    let from = &doc.issuer().jurisdiction;
    doc.items()
        .iter()
        .filter_map(|i| i.operation_code.as_deref())
        .all(|cfop| scope_matches(cfop, from, to))
}

fn cfop_format(ctx: &Context<'_>) -> bool {
    let doc = ctx.document;
    doc.items()
        .iter()
        .filter_map(|i| i.operation_code.as_deref())
        .chain(doc.header().operation_code.as_deref())
        .all(|cfop| operation_scope(cfop).is_some())
}

fn route_known(ctx: &Context<'_>) -> bool {
    let Some(t) = ctx.document.transport() else {
        return true;
    };
    t.route
        .iter()
        .map(String::as_str)
        .chain(t.origin.as_deref())
        .chain(t.destination.as_deref())
        .all(is_known_jurisdiction)
}

fn route_unique(ctx: &Context<'_>) -> bool {
    let Some(t) = ctx.document.transport() else {
        return true;
    };
    let mut seen = HashSet::new();
    t.route.iter().all(|uf| seen.insert(uf))
}

fn route_excludes_endpoints(ctx: &Context<'_>) -> bool {
    let Some(t) = ctx.document.transport() else {
        return true;
    };
    t.route
        .iter()
        .all(|uf| Some(uf) != t.origin.as_ref() && Some(uf) != t.destination.as_ref())
}

fn recipient_uf(ctx: &Context<'_>) -> bool {
    match ctx.document.recipient().and_then(|r| r.jurisdiction.as_deref()) {
        Some(uf) => uf == ABROAD || is_known_jurisdiction(uf),
        None => true,
    }
}

fn consumer_cfop(ctx: &Context<'_>) -> bool {
    if ctx.document.document_type() != DocumentType::ConsumerInvoice {
        return true;
    }
    ctx.document
        .items()
        .iter()
        .filter_map(|i| i.operation_code.as_deref())
        .all(|cfop| {
            operation_scope(cfop)
                .is_none_or(|s| s == (OperationScope::SameJurisdiction, OperationDirection::Outbound))
        })
}
