//! Modal, carrier, vehicle, and cargo checks for waybills and manifests.

use rust_decimal::Decimal;

use super::{Context, Rule};
use crate::core::Severity::Warning;
use crate::core::Transport;
use crate::core::codes::{Modal, is_valid_carrier_registration, is_valid_plate};

pub(super) const RULES: &[Rule] = &[
    Rule::new("TRN-01", Warning, "transport modal code is not recognized", modal)
        .field("transport.modal")
        .suggestion("use 01 road, 02 air, 03 waterway, 04 rail, 05 pipeline or 06 multimodal"),
    Rule::new("TRN-02", Warning, "RNTRC must have exactly 8 digits", carrier_registration)
        .field("transport.carrier_registration"),
    Rule::new("TRN-03", Warning, "vehicle plate is not a valid Brazilian plate", plate)
        .field("transport.vehicle_plate")
        .suggestion("use AAA9999 or the Mercosul form AAA9A99"),
    Rule::new("TRN-04", Warning, "declared cargo weight must be positive", cargo_weight)
        .field("transport.cargo_weight"),
];

fn with_transport(ctx: &Context<'_>, check: impl FnOnce(&Transport) -> bool) -> bool {
    ctx.document.transport().is_none_or(check)
}

fn modal(ctx: &Context<'_>) -> bool {
    with_transport(ctx, |t| Modal::from_code(&t.modal).is_some())
}

fn carrier_registration(ctx: &Context<'_>) -> bool {
    with_transport(ctx, |t| {
        t.carrier_registration
            .as_deref()
            .is_none_or(is_valid_carrier_registration)
    })
}

fn plate(ctx: &Context<'_>) -> bool {
    with_transport(ctx, |t| t.vehicle_plate.as_deref().is_none_or(is_valid_plate))
}

fn cargo_weight(ctx: &Context<'_>) -> bool {
    with_transport(ctx, |t| t.cargo_weight.is_none_or(|w| w > Decimal::ZERO))
}
