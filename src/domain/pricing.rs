//! Cost aggregation and margin application.
//!
//! Everything here is a pure function of the draft snapshot: no I/O, no
//! caching, cheap enough to rerun on every edit. Offer data that covers none
//! of the requested containers contributes 0, never an error.

use tracing::debug;

use super::entities::{HaulageOffer, MiscellaneousLine, PricedContainer, SeafreightOffer};
use super::quote::{PricingOverride, QuoteDraft};

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Seafreight cost for one container type: the first selected offer covering
/// that type, summed service prices times quantity. The selection invariant
/// guarantees at most one candidate.
pub fn seafreight_cost(container: &str, quantity: u32, offers: &[SeafreightOffer]) -> f64 {
    offers
        .iter()
        .find(|offer| offer.default_container() == Some(container))
        .map(|offer| offer.services_total() * f64::from(quantity))
        .unwrap_or(0.0)
}

/// Haulage cost: `unit_tariff × quantity` when a haulage offer is selected and
/// lists the container type. Free time and overtime tariff are informational
/// for the email only.
pub fn haulage_cost(container: &str, quantity: u32, haulage: Option<&HaulageOffer>) -> f64 {
    haulage
        .filter(|offer| offer.applies_to(container))
        .map(|offer| offer.unit_tariff * f64::from(quantity))
        .unwrap_or(0.0)
}

/// Miscellaneous cost for one container type: every selected line bound to
/// that type, its services total times quantity. General lines
/// (`default_container == None`) are excluded here — they are displayed as
/// shipment-wide items and stay out of the per-container sale price.
pub fn misc_cost(container: &str, quantity: u32, lines: &[MiscellaneousLine]) -> f64 {
    lines
        .iter()
        .filter(|line| line.default_container.as_deref() == Some(container))
        .map(|line| line.services_total() * f64::from(quantity))
        .sum()
}

/// Sale price from a raw cost: margin-adjusted value rounded to 2 decimals,
/// then the lump sum added as an exact amount. The order matters — the lump
/// sum is never part of the rounded term. Mutual exclusion upstream keeps the
/// inactive term at 0.
pub fn sale_price(raw_cost: f64, markup: &PricingOverride) -> f64 {
    round2(raw_cost * (1.0 + markup.margin / 100.0)) + markup.adding
}

/// Inverse of [`sale_price`]: the cost that was marked up. Margin is
/// constrained to `[0, 100]` at the override setter, so the divisor is
/// always >= 1.
pub fn purchase_price(sale: f64, markup: &PricingOverride) -> f64 {
    round2((sale - markup.adding) / (1.0 + markup.margin / 100.0))
}

/// Prices one container of the draft.
///
/// Returns `None` when the index is out of range or when the seafreight-only
/// sale price is exactly 0 — such containers are dropped from the summary
/// table and the quote email.
pub fn price_container(draft: &QuoteDraft, index: usize) -> Option<PricedContainer> {
    let selection = draft.containers().get(index)?;
    let markup = draft.override_at(index)?;

    let sea = seafreight_cost(&selection.container, selection.quantity, draft.seafreights());
    if sale_price(sea, markup) == 0.0 {
        return None;
    }

    let raw_cost = sea
        + haulage_cost(&selection.container, selection.quantity, draft.haulage())
        + misc_cost(&selection.container, selection.quantity, draft.miscs());

    let sale = sale_price(raw_cost, markup);
    let purchase = purchase_price(sale, markup);

    Some(PricedContainer {
        container: selection.container.clone(),
        quantity: selection.quantity,
        purchase_price: purchase,
        profit: sale - purchase,
        sale_price: sale,
    })
}

/// A general (container-independent) miscellaneous service, surfaced for the
/// summary and the email but not folded into any container's sale price.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralService {
    pub supplier_name: String,
    pub currency: String,
    pub total: f64,
}

/// All priced containers of a draft plus shipment totals.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteSummary {
    pub containers: Vec<PricedContainer>,
    pub total_sale: f64,
    pub total_profit: f64,
    pub general_services: Vec<GeneralService>,
}

/// Prices the whole draft. Containers whose seafreight-only price is 0 are
/// filtered out; general miscellaneous lines are listed separately.
pub fn price_quote(draft: &QuoteDraft) -> QuoteSummary {
    let mut containers = Vec::with_capacity(draft.containers().len());
    let mut total_sale = 0.0;
    let mut total_profit = 0.0;

    for index in 0..draft.containers().len() {
        if let Some(priced) = price_container(draft, index) {
            total_sale += priced.sale_price;
            total_profit += priced.profit;
            containers.push(priced);
        }
    }

    let general_services = draft
        .miscs()
        .iter()
        .filter(|line| line.is_general())
        .map(|line| GeneralService {
            supplier_name: line.supplier_name.clone(),
            currency: line.currency.clone(),
            total: round2(line.services_total()),
        })
        .collect();

    debug!(
        priced = containers.len(),
        requested = draft.containers().len(),
        total_sale,
        "draft repriced"
    );

    QuoteSummary {
        containers,
        total_sale: round2(total_sale),
        total_profit: round2(total_profit),
        general_services,
    }
}
