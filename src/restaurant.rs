use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

pub const DEFAULT_THUMBNAIL: &str = "https://img.icons8.com/ios-filled/100/000000/restaurant.png";
pub const UNKNOWN: &str = "Unknown";
pub const NO: &str = "No";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisines: String,
    pub average_cost_for_two: Option<f64>,
    pub aggregate_rating: f64,
    pub has_online_delivery: String,
    pub has_table_booking: String,
    pub price_range: Option<f64>,
    pub city: String,
    pub location: Option<GeoPoint>,
    pub thumbnail_url: String,
}

impl Default for Restaurant {
    fn default() -> Self {
        Self {
            name: String::new(),
            cuisines: UNKNOWN.to_string(),
            average_cost_for_two: None,
            aggregate_rating: 0.0,
            has_online_delivery: NO.to_string(),
            has_table_booking: NO.to_string(),
            price_range: None,
            city: UNKNOWN.to_string(),
            location: None,
            thumbnail_url: DEFAULT_THUMBNAIL.to_string(),
        }
    }
}

impl Restaurant {
    pub fn offers_online_delivery(&self) -> bool {
        self.has_online_delivery.eq_ignore_ascii_case("YES")
    }

    pub fn offers_table_booking(&self) -> bool {
        self.has_table_booking.eq_ignore_ascii_case("YES")
    }

    /// Rating rounded to whole stars, 0 to 5.
    pub fn stars(&self) -> usize {
        self.aggregate_rating.round().clamp(0.0, 5.0) as usize
    }
}

/// Content digest of the source a dataset was loaded from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceDigest([u8; 32]);

impl SourceDigest {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }
}

impl fmt::Debug for SourceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceDigest({})", short_hex(&self.0))
    }
}

/// Identity of a dataset snapshot: its source plus the exact sequence of
/// full-dataset rows it holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubsetKey([u8; 32]);

impl fmt::Debug for SubsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubsetKey({})", short_hex(&self.0))
    }
}

impl fmt::Display for SubsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_hex(&self.0))
    }
}

fn short_hex(bytes: &[u8]) -> String {
    bytes[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

/// An immutable, densely indexed table of restaurants.
///
/// Row `i` is always position `i`; `origin[i]` remembers where that row sat in
/// the fully loaded dataset so that subsets can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: SourceDigest,
    records: Vec<Restaurant>,
    origin: Vec<usize>,
}

impl Dataset {
    pub fn new(source: SourceDigest, records: Vec<Restaurant>) -> Self {
        let origin = (0..records.len()).collect();
        Self {
            source,
            records,
            origin,
        }
    }

    /// Builds a new dense dataset from the given row positions, in order.
    pub fn select<I>(&self, positions: I) -> Dataset
    where
        I: IntoIterator<Item = usize>,
    {
        let mut records = Vec::new();
        let mut origin = Vec::new();
        for position in positions {
            if let Some(record) = self.records.get(position) {
                records.push(record.clone());
                origin.push(self.origin[position]);
            }
        }
        Dataset {
            source: self.source,
            records,
            origin,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Restaurant> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Restaurant] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Restaurant> {
        self.records.iter()
    }

    pub fn origin(&self) -> &[usize] {
        &self.origin
    }

    pub fn source(&self) -> SourceDigest {
        self.source
    }

    pub fn key(&self) -> SubsetKey {
        let mut hasher = Sha256::new();
        hasher.update(self.source.0);
        hasher.update((self.origin.len() as u64).to_le_bytes());
        for position in &self.origin {
            hasher.update((*position as u64).to_le_bytes());
        }
        SubsetKey(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Restaurant {
        Restaurant {
            name: name.to_string(),
            ..Restaurant::default()
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(
            SourceDigest::from_bytes(b"test"),
            vec![named("A"), named("B"), named("C")],
        )
    }

    #[test]
    fn test_select_keeps_origin_and_reindexes() {
        let full = dataset();
        let subset = full.select(vec![2, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get(0).map(|r| r.name.as_str()), Some("C"));
        assert_eq!(subset.origin(), &[2, 0]);

        let nested = subset.select(vec![1]);
        assert_eq!(nested.origin(), &[0]);
        assert_eq!(nested.get(0).map(|r| r.name.as_str()), Some("A"));
    }

    #[test]
    fn test_key_depends_on_membership_and_order() {
        let full = dataset();
        let ab = full.select(vec![0, 1]);
        let ba = full.select(vec![1, 0]);
        let ac = full.select(vec![0, 2]);
        assert_eq!(ab.key(), full.select(vec![0, 1]).key());
        assert_ne!(ab.key(), ba.key());
        assert_ne!(ab.key(), ac.key());
    }

    #[test]
    fn test_key_depends_on_source() {
        let records = vec![named("A"), named("B")];
        let one = Dataset::new(SourceDigest::from_bytes(b"one"), records.clone());
        let two = Dataset::new(SourceDigest::from_bytes(b"two"), records);
        assert_ne!(one.key(), two.key());
    }

    #[test]
    fn test_service_flags_and_stars() {
        let restaurant = Restaurant {
            has_online_delivery: "yes".to_string(),
            aggregate_rating: 4.6,
            ..Restaurant::default()
        };
        assert!(restaurant.offers_online_delivery());
        assert!(!restaurant.offers_table_booking());
        assert_eq!(restaurant.stars(), 5);
    }
}
