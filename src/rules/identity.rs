//! Check digits of CPF/CNPJ, access key, and state registrations.

use super::{Context, Rule};
use crate::checksum::{AccessKey, is_valid_access_key, is_valid_national_id, is_valid_registration};
use crate::core::Severity::Error;
use crate::core::codes::strip_formatting;
use crate::core::jurisdictions::{ABROAD, is_known_jurisdiction};

pub(super) const RULES: &[Rule] = &[
    Rule::new("ID-01", Error, "issuer CPF/CNPJ check digits are invalid", issuer_id)
        .field("header.issuer.identifier"),
    Rule::new("ID-02", Error, "recipient CPF/CNPJ check digits are invalid", recipient_id)
        .field("header.recipient.identifier"),
    Rule::new("ID-03", Error, "access key check digit is invalid", access_key)
        .field("header.access_key"),
    Rule::new(
        "ID-04",
        Error,
        "issuer state registration (IE) is invalid for its UF",
        issuer_registration,
    )
    .field("header.issuer.registration_id")
    .suggestion("use the IE exactly as registered, or ISENTO if exempt"),
    Rule::new(
        "ID-05",
        Error,
        "recipient state registration (IE) is invalid for its UF",
        recipient_registration,
    )
    .field("header.recipient.registration_id"),
    Rule::new("ID-06", Error, "issuer UF is not a Brazilian federative unit", issuer_uf)
        .field("header.issuer.jurisdiction"),
];

fn issuer_id(ctx: &Context<'_>) -> bool {
    is_valid_national_id(&strip_formatting(&ctx.document.issuer().identifier))
}

/// Foreign recipients carry no CPF/CNPJ; an absent identifier is not checked.
fn recipient_id(ctx: &Context<'_>) -> bool {
    let Some(recipient) = ctx.document.recipient() else {
        return true;
    };
    if recipient.jurisdiction.as_deref() == Some(ABROAD) {
        return true;
    }
    match recipient.identifier.as_deref() {
        Some(id) => is_valid_national_id(&strip_formatting(id)),
        None => true,
    }
}

fn access_key(ctx: &Context<'_>) -> bool {
    let key = ctx.document.access_key();
    AccessKey::parse(key).is_none() || is_valid_access_key(key)
}

fn issuer_registration(ctx: &Context<'_>) -> bool {
    let issuer = ctx.document.issuer();
    match &issuer.registration_id {
        Some(ie) => is_valid_registration(&issuer.jurisdiction, &strip_formatting(ie)),
        None => true,
    }
}

fn recipient_registration(ctx: &Context<'_>) -> bool {
    let Some(recipient) = ctx.document.recipient() else {
        return true;
    };
    match (&recipient.jurisdiction, &recipient.registration_id) {
        (Some(uf), Some(ie)) => is_valid_registration(uf, &strip_formatting(ie)),
        _ => true,
    }
}

fn issuer_uf(ctx: &Context<'_>) -> bool {
    is_known_jurisdiction(&ctx.document.issuer().jurisdiction)
}
