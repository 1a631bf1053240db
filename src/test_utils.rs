//! Offer builders shared by the unit tests.

use crate::domain::entities::{
    ContainerSpec, HaulageOffer, MiscellaneousLine, OfferedContainer, OfferedService,
    SeafreightOffer,
};

pub fn seafreight_offer(id: &str, container: &str, prices: &[f64]) -> SeafreightOffer {
    SeafreightOffer {
        seafreight_id: id.to_string(),
        carrier_name: "Maersk".to_string(),
        currency: "EUR".to_string(),
        containers: vec![offered_container(container, prices)],
        frequency: Some("weekly".to_string()),
        transit_time_days: Some(21),
        valid_until: None,
    }
}

pub fn haulage_offer(id: &str, unit_tariff: f64, containers: &[&str]) -> HaulageOffer {
    HaulageOffer {
        id: id.to_string(),
        haulier_name: "TransRoad".to_string(),
        currency: "EUR".to_string(),
        unit_tariff,
        overtime_tariff: 45.0,
        free_time_hours: 2.0,
        multi_stop: false,
        container_names: containers.iter().map(|c| c.to_string()).collect(),
        valid_until: None,
    }
}

pub fn misc_line(id: &str, default_container: Option<&str>, price: f64) -> MiscellaneousLine {
    let container = default_container.unwrap_or("20' Dry");
    MiscellaneousLine {
        miscellaneous_id: id.to_string(),
        supplier_name: "DocsCo".to_string(),
        currency: "EUR".to_string(),
        default_container: default_container.map(|c| c.to_string()),
        containers: vec![offered_container(container, &[price])],
        valid_until: None,
    }
}

fn offered_container(container: &str, prices: &[f64]) -> OfferedContainer {
    OfferedContainer {
        container: ContainerSpec {
            package_name: container.to_string(),
        },
        services: prices
            .iter()
            .enumerate()
            .map(|(i, price)| OfferedService {
                service_name: format!("service-{i}"),
                price: *price,
            })
            .collect(),
    }
}
