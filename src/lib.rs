//! Pricing engine for freight-forwarding quotes.
//!
//! A multi-step wizard in the host application combines a haulage offer,
//! seafreight offers (one per container type) and miscellaneous service lines
//! into per-container sale prices, then renders a priced customer email. This
//! crate is the pure-computation core of that wizard: it owns the draft-quote
//! snapshot, the cost aggregation and margin/lump-sum rules, the selection
//! validators and the email template substitution. All fetching, persistence
//! and UI stays with the host.

pub mod domain;
pub mod email;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use domain::{
    price_container, price_quote, CarrierConsistency, ContainerSelection, HaulageOffer,
    MiscellaneousLine, OverrideKind, PricedContainer, PricingOverride, QuoteDraft, QuotePayload,
    QuoteSummary, SeafreightOffer,
};
pub use error::{QuoteError, Result};
