//! Draft-quote state: the snapshot every pricing function computes over.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::entities::{
    ContainerSelection, HaulageOffer, MiscellaneousLine, PricedContainer, SeafreightOffer,
};
use super::pricing;
use crate::error::{QuoteError, Result};

/// Default percentage margin applied to each container until staff override it.
pub const DEFAULT_MARGIN_PCT: f64 = 22.0;

/// Per-container markup: a percentage margin OR a flat lump sum ("adding").
///
/// The two are mutually exclusive, never additive. The invariant is enforced
/// at the single mutation point [`QuoteDraft::set_pricing_override`]; the
/// pricing formulas assume the inactive term is 0 and do not re-validate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingOverride {
    pub margin: f64,
    pub adding: f64,
}

impl Default for PricingOverride {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN_PCT,
            adding: 0.0,
        }
    }
}

/// Which half of the margin/adding pair an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideKind {
    Margin,
    Adding,
}

/// Whether the selected seafreight offers all come from one carrier.
///
/// Advisory only: a mixed selection prompts for confirmation in the host
/// wizard but is never rejected here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CarrierConsistency {
    Consistent,
    Mixed(Vec<String>),
}

/// The in-progress quote: requested containers, currently selected offers and
/// per-container pricing overrides.
///
/// Fields are private so the positional invariant (`overrides` stays
/// index-aligned with `containers`) and the selection invariants survive every
/// mutation. All offer data is a read-only snapshot fetched by the host
/// application; the draft never performs I/O.
#[derive(Clone, Debug, Default)]
pub struct QuoteDraft {
    containers: Vec<ContainerSelection>,
    seafreights: Vec<SeafreightOffer>,
    haulage: Option<HaulageOffer>,
    miscs: Vec<MiscellaneousLine>,
    overrides: Vec<PricingOverride>,
}

impl QuoteDraft {
    pub fn new(containers: Vec<ContainerSelection>) -> Self {
        let overrides = vec![PricingOverride::default(); containers.len()];
        Self {
            containers,
            seafreights: Vec::new(),
            haulage: None,
            miscs: Vec::new(),
            overrides,
        }
    }

    pub fn containers(&self) -> &[ContainerSelection] {
        &self.containers
    }

    pub fn seafreights(&self) -> &[SeafreightOffer] {
        &self.seafreights
    }

    pub fn haulage(&self) -> Option<&HaulageOffer> {
        self.haulage.as_ref()
    }

    pub fn miscs(&self) -> &[MiscellaneousLine] {
        &self.miscs
    }

    pub fn overrides(&self) -> &[PricingOverride] {
        &self.overrides
    }

    pub fn override_at(&self, index: usize) -> Option<&PricingOverride> {
        self.overrides.get(index)
    }

    /// Number of distinct container type names requested.
    pub fn distinct_container_count(&self) -> usize {
        self.containers
            .iter()
            .map(|c| c.container.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn add_container(&mut self, selection: ContainerSelection) {
        self.containers.push(selection);
        self.overrides.push(PricingOverride::default());
    }

    pub fn remove_container(&mut self, index: usize) -> Result<ContainerSelection> {
        if index >= self.containers.len() {
            return Err(QuoteError::ContainerIndexOutOfRange(index));
        }
        self.overrides.remove(index);
        Ok(self.containers.remove(index))
    }

    /// Edits the margin/adding pair for one container.
    ///
    /// Setting a non-zero margin zeroes the lump sum and vice versa. Margin is
    /// constrained to `[0, 100]` here rather than trusting the host UI, which
    /// also keeps the purchase-price inverse formula away from its
    /// `margin = -100` division by zero.
    pub fn set_pricing_override(
        &mut self,
        index: usize,
        kind: OverrideKind,
        value: f64,
    ) -> Result<()> {
        let Some(entry) = self.overrides.get_mut(index) else {
            return Err(QuoteError::ContainerIndexOutOfRange(index));
        };

        match kind {
            OverrideKind::Margin => {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return Err(QuoteError::InvalidMargin(value));
                }
                entry.margin = value;
                if value != 0.0 {
                    entry.adding = 0.0;
                }
            }
            OverrideKind::Adding => {
                if !value.is_finite() || value < 0.0 {
                    return Err(QuoteError::InvalidAdding(value));
                }
                entry.adding = value;
                if value != 0.0 {
                    entry.margin = 0.0;
                }
            }
        }

        Ok(())
    }

    /// Replaces the seafreight selection atomically.
    ///
    /// Rejected (prior selection retained, nothing partially applied) when the
    /// set exceeds the number of distinct requested container types or when
    /// two offers cover the same default container.
    pub fn select_seafreights(&mut self, offers: Vec<SeafreightOffer>) -> Result<()> {
        if let Err(err) = validate_seafreight_selection(&offers, self.distinct_container_count()) {
            warn!(rejected = offers.len(), %err, "seafreight selection rejected");
            return Err(err);
        }
        self.seafreights = offers;
        Ok(())
    }

    pub fn select_haulage(&mut self, offer: HaulageOffer) {
        self.haulage = Some(offer);
    }

    pub fn clear_haulage(&mut self) {
        self.haulage = None;
    }

    pub fn add_misc(&mut self, line: MiscellaneousLine) {
        self.miscs.push(line);
    }

    /// Removes every selected miscellaneous line with the given id.
    pub fn remove_misc(&mut self, miscellaneous_id: &str) {
        self.miscs
            .retain(|line| line.miscellaneous_id != miscellaneous_id);
    }

    /// Checks whether the selected offers all share one carrier. Used by the
    /// wizard before leaving the seafreight step; a mixed result only prompts
    /// for confirmation.
    pub fn carrier_consistency(&self) -> CarrierConsistency {
        let mut carriers: Vec<String> = self
            .seafreights
            .iter()
            .map(|offer| offer.carrier_name.clone())
            .collect();
        carriers.sort();
        carriers.dedup();

        if carriers.len() > 1 {
            CarrierConsistency::Mixed(carriers)
        } else {
            CarrierConsistency::Consistent
        }
    }

    /// Assembles the creation payload the host application sends to the quote
    /// service. Pricing is recomputed from the current snapshot; nothing is
    /// cached between edits.
    pub fn to_payload(&self) -> QuotePayload {
        let summary = pricing::price_quote(self);
        QuotePayload {
            quote_id: Uuid::new_v4(),
            seafreight_ids: self
                .seafreights
                .iter()
                .map(|offer| offer.seafreight_id.clone())
                .collect(),
            haulage_id: self.haulage.as_ref().map(|offer| offer.id.clone()),
            miscellaneous_ids: self
                .miscs
                .iter()
                .map(|line| line.miscellaneous_id.clone())
                .collect(),
            containers: summary.containers,
            total_sale: summary.total_sale,
            total_profit: summary.total_profit,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Validates a candidate seafreight selection without applying it.
pub fn validate_seafreight_selection(
    offers: &[SeafreightOffer],
    distinct_containers: usize,
) -> Result<()> {
    if offers.len() > distinct_containers {
        return Err(QuoteError::SelectionTooLarge {
            selected: offers.len(),
            requested: distinct_containers,
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for offer in offers {
        if let Some(container) = offer.default_container() {
            if !seen.insert(container) {
                return Err(QuoteError::DuplicateContainerType(container.to_string()));
            }
        }
    }

    Ok(())
}

/// Draft-quote snapshot POSTed once to the creation endpoint by the host
/// application. The engine only assembles it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotePayload {
    pub quote_id: Uuid,
    pub seafreight_ids: Vec<String>,
    pub haulage_id: Option<String>,
    pub miscellaneous_ids: Vec<String>,
    pub containers: Vec<PricedContainer>,
    pub total_sale: f64,
    pub total_profit: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{haulage_offer, misc_line, seafreight_offer};

    fn two_type_draft() -> QuoteDraft {
        QuoteDraft::new(vec![
            ContainerSelection::new("20' Dry", 2),
            ContainerSelection::new("40' HC", 1),
        ])
    }

    #[test]
    fn overrides_stay_aligned_with_containers() {
        let mut draft = two_type_draft();
        assert_eq!(draft.overrides().len(), 2);
        assert_eq!(draft.overrides()[0].margin, DEFAULT_MARGIN_PCT);

        draft.add_container(ContainerSelection::new("45' HC", 3));
        assert_eq!(draft.overrides().len(), 3);

        draft.remove_container(1).unwrap();
        assert_eq!(draft.containers().len(), 2);
        assert_eq!(draft.overrides().len(), 2);

        assert_eq!(
            draft.remove_container(7),
            Err(QuoteError::ContainerIndexOutOfRange(7))
        );
    }

    #[test]
    fn margin_and_adding_are_mutually_exclusive() {
        let mut draft = two_type_draft();

        draft
            .set_pricing_override(0, OverrideKind::Adding, 50.0)
            .unwrap();
        assert_eq!(draft.override_at(0).unwrap().adding, 50.0);
        assert_eq!(draft.override_at(0).unwrap().margin, 0.0);

        draft
            .set_pricing_override(0, OverrideKind::Margin, 15.0)
            .unwrap();
        assert_eq!(draft.override_at(0).unwrap().margin, 15.0);
        assert_eq!(draft.override_at(0).unwrap().adding, 0.0);

        // The other container keeps its default.
        assert_eq!(draft.override_at(1).unwrap().margin, DEFAULT_MARGIN_PCT);
    }

    #[test]
    fn setting_margin_to_zero_keeps_lump_sum() {
        let mut draft = two_type_draft();
        draft
            .set_pricing_override(0, OverrideKind::Adding, 50.0)
            .unwrap();
        draft
            .set_pricing_override(0, OverrideKind::Margin, 0.0)
            .unwrap();
        assert_eq!(draft.override_at(0).unwrap().adding, 50.0);
    }

    #[test]
    fn override_edits_are_validated() {
        let mut draft = two_type_draft();
        assert_eq!(
            draft.set_pricing_override(0, OverrideKind::Margin, 120.0),
            Err(QuoteError::InvalidMargin(120.0))
        );
        assert_eq!(
            draft.set_pricing_override(0, OverrideKind::Margin, -5.0),
            Err(QuoteError::InvalidMargin(-5.0))
        );
        assert_eq!(
            draft.set_pricing_override(0, OverrideKind::Adding, -1.0),
            Err(QuoteError::InvalidAdding(-1.0))
        );
        assert_eq!(
            draft.set_pricing_override(9, OverrideKind::Margin, 10.0),
            Err(QuoteError::ContainerIndexOutOfRange(9))
        );
        // Failed edits leave the pair untouched.
        assert_eq!(draft.override_at(0).unwrap().margin, DEFAULT_MARGIN_PCT);
    }

    #[test]
    fn duplicate_container_selection_is_rejected_atomically() {
        let mut draft = two_type_draft();
        draft
            .select_seafreights(vec![seafreight_offer("SF-1", "20' Dry", &[500.0])])
            .unwrap();

        let err = draft
            .select_seafreights(vec![
                seafreight_offer("SF-2", "40' HC", &[900.0]),
                seafreight_offer("SF-3", "40' HC", &[850.0]),
            ])
            .unwrap_err();
        assert_eq!(err, QuoteError::DuplicateContainerType("40' HC".to_string()));

        // Previous valid selection retained, nothing partially applied.
        assert_eq!(draft.seafreights().len(), 1);
        assert_eq!(draft.seafreights()[0].seafreight_id, "SF-1");
    }

    #[test]
    fn oversized_selection_is_rejected() {
        let mut draft = two_type_draft();
        let err = draft
            .select_seafreights(vec![
                seafreight_offer("SF-1", "20' Dry", &[500.0]),
                seafreight_offer("SF-2", "40' HC", &[900.0]),
                seafreight_offer("SF-3", "45' HC", &[950.0]),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            QuoteError::SelectionTooLarge {
                selected: 3,
                requested: 2,
            }
        );
        assert!(draft.seafreights().is_empty());
    }

    #[test]
    fn duplicate_quantities_count_as_one_type() {
        let draft = QuoteDraft::new(vec![
            ContainerSelection::new("20' Dry", 2),
            ContainerSelection::new("20' Dry", 1),
        ]);
        assert_eq!(draft.distinct_container_count(), 1);
    }

    #[test]
    fn carrier_consistency_is_advisory() {
        let mut draft = two_type_draft();
        assert_eq!(draft.carrier_consistency(), CarrierConsistency::Consistent);

        let mut cma = seafreight_offer("SF-2", "40' HC", &[900.0]);
        cma.carrier_name = "CMA CGM".to_string();
        draft
            .select_seafreights(vec![seafreight_offer("SF-1", "20' Dry", &[500.0]), cma])
            .unwrap();

        match draft.carrier_consistency() {
            CarrierConsistency::Mixed(carriers) => {
                assert_eq!(carriers, vec!["CMA CGM".to_string(), "Maersk".to_string()]);
            }
            CarrierConsistency::Consistent => panic!("expected mixed carriers"),
        }
    }

    #[test]
    fn misc_lines_can_be_added_and_removed_by_id() {
        let mut draft = two_type_draft();
        draft.add_misc(misc_line("M-1", Some("20' Dry"), 80.0));
        draft.add_misc(misc_line("M-2", None, 120.0));
        assert_eq!(draft.miscs().len(), 2);

        draft.remove_misc("M-1");
        assert_eq!(draft.miscs().len(), 1);
        assert_eq!(draft.miscs()[0].miscellaneous_id, "M-2");
    }

    #[test]
    fn payload_snapshots_selection_and_prices() {
        let mut draft = two_type_draft();
        draft
            .select_seafreights(vec![seafreight_offer("SF-1", "20' Dry", &[500.0, 50.0])])
            .unwrap();
        draft.select_haulage(haulage_offer("H-1", 100.0, &["20' Dry"]));
        draft.add_misc(misc_line("M-1", Some("20' Dry"), 80.0));

        let payload = draft.to_payload();
        assert_eq!(payload.seafreight_ids, vec!["SF-1".to_string()]);
        assert_eq!(payload.haulage_id, Some("H-1".to_string()));
        assert_eq!(payload.miscellaneous_ids, vec!["M-1".to_string()]);
        // Only the 20' Dry prices; the 40' HC has no seafreight cover.
        assert_eq!(payload.containers.len(), 1);
        assert_eq!(payload.total_sale, payload.containers[0].sale_price);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"seafreight_ids\":[\"SF-1\"]"));
    }
}
