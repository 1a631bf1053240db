//! Domain logic for quote pricing lives here.

pub mod entities;
pub mod pricing;
pub mod quote;

#[allow(unused_imports)]
pub use entities::{
    ContainerSelection, ContainerSpec, HaulageOffer, MiscellaneousLine, OfferedContainer,
    OfferedService, PricedContainer, SeafreightOffer,
};
#[allow(unused_imports)]
pub use pricing::{
    haulage_cost, misc_cost, price_container, price_quote, purchase_price, round2, sale_price,
    seafreight_cost, GeneralService, QuoteSummary,
};
#[allow(unused_imports)]
pub use quote::{
    validate_seafreight_selection, CarrierConsistency, OverrideKind, PricingOverride, QuoteDraft,
    QuotePayload, DEFAULT_MARGIN_PCT,
};
