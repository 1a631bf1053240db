use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One container type requested on the shipment, with its quantity.
///
/// Created when staff add a container to the shipment request; immutable once
/// the offer-selection wizard starts, except via explicit removal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerSelection {
    /// Container type name (e.g., "20' Dry", "40' HC").
    pub container: String,
    /// Number of units requested. Always > 0.
    pub quantity: u32,
}

impl ContainerSelection {
    pub fn new(container: impl Into<String>, quantity: u32) -> Self {
        Self {
            container: container.into(),
            quantity,
        }
    }
}

/// A single priced service inside an offer (e.g., "BAF", "THC").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferedService {
    pub service_name: String,
    pub price: f64,
}

/// Container type an offer applies to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub package_name: String,
}

/// A container entry inside an offer: the type plus the services priced for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferedContainer {
    pub container: ContainerSpec,
    pub services: Vec<OfferedService>,
}

/// A carrier's priced service bundle for shipping one container type.
///
/// At most one seafreight offer is selected per distinct container type; the
/// selection validator rejects sets where two offers share a default container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeafreightOffer {
    pub seafreight_id: String,
    pub carrier_name: String,
    pub currency: String,
    pub containers: Vec<OfferedContainer>,
    pub frequency: Option<String>,
    pub transit_time_days: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub valid_until: Option<OffsetDateTime>,
}

impl SeafreightOffer {
    /// The container type this offer covers: the package name of its first
    /// container entry. `None` when the offer carries no container at all.
    pub fn default_container(&self) -> Option<&str> {
        self.containers
            .first()
            .map(|entry| entry.container.package_name.as_str())
    }

    /// Sum of the service prices of the covered container, for one unit.
    pub fn services_total(&self) -> f64 {
        self.containers
            .first()
            .map(|entry| entry.services.iter().map(|s| s.price).sum())
            .unwrap_or(0.0)
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.valid_until.map(|until| until < now).unwrap_or(false)
    }
}

/// A haulier's priced service for inland transport of containers.
///
/// At most one haulage offer is selected per quote; it applies uniformly to
/// every requested container type listed in `container_names`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaulageOffer {
    pub id: String,
    pub haulier_name: String,
    pub currency: String,
    /// Price per container unit. The only haulage field that enters the cost sum.
    pub unit_tariff: f64,
    /// Informational: shown in the quote email, never priced.
    pub overtime_tariff: f64,
    /// Informational: free loading time in hours.
    pub free_time_hours: f64,
    pub multi_stop: bool,
    pub container_names: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub valid_until: Option<OffsetDateTime>,
}

impl HaulageOffer {
    pub fn applies_to(&self, container: &str) -> bool {
        self.container_names.iter().any(|name| name == container)
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.valid_until.map(|until| until < now).unwrap_or(false)
    }
}

/// An ancillary service charge (documentation, handling, ...).
///
/// A line with `default_container == None` is a "general" service that applies
/// to the whole shipment; otherwise it applies only to containers of the
/// matching type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiscellaneousLine {
    pub miscellaneous_id: String,
    pub supplier_name: String,
    pub currency: String,
    pub default_container: Option<String>,
    pub containers: Vec<OfferedContainer>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub valid_until: Option<OffsetDateTime>,
}

impl MiscellaneousLine {
    /// General services are displayed shipment-wide, not folded into the
    /// per-container sale price.
    pub fn is_general(&self) -> bool {
        self.default_container.is_none()
    }

    /// Total of all service prices across the line's container entries.
    pub fn services_total(&self) -> f64 {
        self.containers
            .iter()
            .flat_map(|entry| entry.services.iter())
            .map(|s| s.price)
            .sum()
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.valid_until.map(|until| until < now).unwrap_or(false)
    }
}

/// A priced container as shown in the summary table and the quote email.
/// Derived on demand, never stored; recomputed whenever any input changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedContainer {
    pub container: String,
    pub quantity: u32,
    pub purchase_price: f64,
    pub profit: f64,
    pub sale_price: f64,
}
