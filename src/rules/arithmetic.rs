//! Tax arithmetic, compared with the configured tolerance.

use rust_decimal::Decimal;

use super::{Context, Rule, close};
use crate::core::Severity::Warning;
use crate::core::TaxBreakdown;

pub(super) const RULES: &[Rule] = &[
    Rule::new(
        "ARI-01",
        Warning,
        "line total differs from quantity times unit price",
        line_totals,
    )
    .field("items[].line_total"),
    Rule::new(
        "ARI-02",
        Warning,
        "ICMS value differs from base times rate",
        icms_values,
    )
    .field("items[].taxes.icms"),
    Rule::new(
        "ARI-03",
        Warning,
        "sum of line totals differs from the products total",
        products_total,
    )
    .field("totals.products"),
    Rule::new(
        "ARI-04",
        Warning,
        "item taxes do not add up to the document tax totals",
        tax_totals,
    )
    .field("totals.tax_breakdown"),
    Rule::new(
        "ARI-05",
        Warning,
        "document total differs from products minus discount plus charges, IPI and ICMS-ST",
        invoice_total,
    )
    .field("totals.invoice_total"),
    Rule::new("ARI-06", Warning, "document totals must not be negative", non_negative)
        .field("totals"),
];

fn line_totals(ctx: &Context<'_>) -> bool {
    ctx.document.items().iter().all(|i| {
        i.quantity
            .checked_mul(i.unit_price)
            .is_some_and(|expected| close(ctx, expected, i.line_total))
    })
}

fn icms_values(ctx: &Context<'_>) -> bool {
    ctx.document.items().iter().all(|i| match (i.tax_base, i.tax_rate) {
        (Some(base), Some(rate)) => base
            .checked_mul(rate)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .is_some_and(|expected| close(ctx, expected, i.taxes.icms)),
        _ => true,
    })
}

fn products_total(ctx: &Context<'_>) -> bool {
    if !ctx.document.is_invoice() {
        return true;
    }
    ctx.document
        .items()
        .iter()
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.line_total))
        .is_some_and(|sum| close(ctx, sum, ctx.document.totals().products))
}

fn tax_totals(ctx: &Context<'_>) -> bool {
    if !ctx.document.is_invoice() {
        return true;
    }
    let Some(items) = TaxBreakdown::sum_of(ctx.document.items().iter().map(|i| i.taxes)) else {
        return false;
    };
    let declared = ctx.document.totals().tax_breakdown;
    [
        (items.icms, declared.icms),
        (items.icms_st, declared.icms_st),
        (items.ipi, declared.ipi),
        (items.pis, declared.pis),
        (items.cofins, declared.cofins),
    ]
    .into_iter()
    .all(|(a, b)| close(ctx, a, b))
}

fn invoice_total(ctx: &Context<'_>) -> bool {
    if !ctx.document.is_invoice() {
        return true;
    }
    let t = ctx.document.totals();
    t.products
        .checked_sub(t.discount)
        .and_then(|v| v.checked_add(t.other_charges))
        .and_then(|v| v.checked_add(t.tax_breakdown.ipi))
        .and_then(|v| v.checked_add(t.tax_breakdown.icms_st))
        .is_some_and(|expected| close(ctx, expected, t.invoice_total))
}

fn non_negative(ctx: &Context<'_>) -> bool {
    let t = ctx.document.totals();
    [
        t.products,
        t.taxes,
        t.invoice_total,
        t.discount,
        t.other_charges,
    ]
    .iter()
    .all(|v| *v >= Decimal::ZERO)
}
