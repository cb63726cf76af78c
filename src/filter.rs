use log::debug;
use std::collections::HashSet;

use crate::restaurant::{Dataset, Restaurant};

/// User-selected filter parameters, passed explicitly to every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub cities: HashSet<String>,
    pub require_online_delivery: bool,
    pub require_table_booking: bool,
}

impl FilterParams {
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        filter(
            dataset,
            &self.cities,
            self.require_online_delivery,
            self.require_table_booking,
        )
    }
}

/// Keeps rows in `cities` (all cities when empty) that offer at least one of
/// the requested services (no service check when none is requested).
pub fn filter(
    dataset: &Dataset,
    cities: &HashSet<String>,
    require_online_delivery: bool,
    require_table_booking: bool,
) -> Dataset {
    let mut conditions: Vec<fn(&Restaurant) -> bool> = Vec::new();
    if require_online_delivery {
        conditions.push(Restaurant::offers_online_delivery);
    }
    if require_table_booking {
        conditions.push(Restaurant::offers_table_booking);
    }

    let keep = dataset
        .iter()
        .enumerate()
        .filter(|(_, r)| cities.is_empty() || cities.contains(&r.city))
        .filter(|(_, r)| conditions.is_empty() || conditions.iter().any(|holds| holds(r)))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    debug!(
        "Filter kept {} of {} rows ({} cities, online_delivery={}, table_booking={})",
        keep.len(),
        dataset.len(),
        cities.len(),
        require_online_delivery,
        require_table_booking
    );
    dataset.select(keep)
}
