//! Exploratory figures over a (filtered) dataset: KPIs, cuisine counts,
//! the rating distribution, map points and picker contents.

use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap};

use crate::ranker::top_n_by_rating;
use crate::restaurant::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_restaurants: usize,
    pub average_rating: f64,
    pub average_cost_for_two: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuisineCount {
    pub cuisine: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: usize,
    pub restaurants: Vec<String>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cuisines: String,
    pub average_cost_for_two: Option<f64>,
    pub aggregate_rating: f64,
}

/// One dot of the per-city price range versus rating scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub name: String,
    pub city: String,
    pub price_range: f64,
    pub aggregate_rating: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summarize(dataset: &Dataset) -> Summary {
    if dataset.is_empty() {
        return Summary {
            total_restaurants: 0,
            average_rating: 0.0,
            average_cost_for_two: 0.0,
        };
    }
    let ratings: Vec<f64> = dataset.iter().map(|r| r.aggregate_rating).collect();
    let costs: Vec<f64> = dataset.iter().filter_map(|r| r.average_cost_for_two).collect();
    let average_cost_for_two = if costs.is_empty() {
        0.0
    } else {
        round2(costs.mean())
    };
    Summary {
        total_restaurants: dataset.len(),
        average_rating: round2(ratings.mean()),
        average_cost_for_two,
    }
}

/// Most frequent individual cuisines; ties keep first appearance.
pub fn top_cuisines(dataset: &Dataset, n: usize) -> Vec<CuisineCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for restaurant in dataset.iter() {
        for cuisine in restaurant.cuisines.split(',').map(str::trim) {
            if cuisine.is_empty() {
                continue;
            }
            let count = counts.entry(cuisine.to_string()).or_insert(0);
            if *count == 0 {
                order.push(cuisine.to_string());
            }
            *count += 1;
        }
    }
    let mut ranked: Vec<CuisineCount> = order
        .into_iter()
        .map(|cuisine| CuisineCount {
            count: counts[&cuisine],
            cuisine,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Rows without a price range have no dot.
pub fn price_vs_rating(dataset: &Dataset) -> Vec<PricePoint> {
    dataset
        .iter()
        .filter_map(|r| {
            r.price_range.map(|price_range| PricePoint {
                name: r.name.clone(),
                city: r.city.clone(),
                price_range,
                aggregate_rating: r.aggregate_rating,
            })
        })
        .collect()
}

/// Every row's cuisine list joined by spaces, the word cloud input.
pub fn cuisine_text(dataset: &Dataset) -> String {
    dataset
        .iter()
        .map(|r| r.cuisines.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One bucket per distinct rating, ascending. Ratings held by the
/// `highlight_size` best restaurants are flagged.
pub fn rating_distribution(dataset: &Dataset, highlight_size: usize) -> Vec<RatingBucket> {
    let highlighted: Vec<f64> = top_n_by_rating(dataset, highlight_size)
        .iter()
        .map(|r| r.aggregate_rating)
        .collect();

    let mut rows: Vec<(f64, &str)> = dataset
        .iter()
        .map(|r| (r.aggregate_rating, r.name.as_str()))
        .collect();
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut buckets: Vec<RatingBucket> = Vec::new();
    for (rating, name) in rows {
        match buckets.last_mut() {
            Some(bucket) if bucket.rating == rating => {
                bucket.count += 1;
                bucket.restaurants.push(name.to_string());
            }
            _ => buckets.push(RatingBucket {
                rating,
                count: 1,
                restaurants: vec![name.to_string()],
                highlighted: highlighted.contains(&rating),
            }),
        }
    }
    buckets
}

/// Lowest and highest rating, the default range of the map slider.
pub fn rating_bounds(dataset: &Dataset) -> Option<(f64, f64)> {
    let ratings: Vec<f64> = dataset.iter().map(|r| r.aggregate_rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some((
        Statistics::min(ratings.iter()),
        Statistics::max(ratings.iter()),
    ))
}

pub fn within_rating_range(dataset: &Dataset, min: f64, max: f64) -> Dataset {
    let keep: Vec<usize> = dataset
        .iter()
        .enumerate()
        .filter(|(_, r)| r.aggregate_rating >= min && r.aggregate_rating <= max)
        .map(|(i, _)| i)
        .collect();
    dataset.select(keep)
}

pub fn map_points(dataset: &Dataset) -> Vec<MapPoint> {
    dataset
        .iter()
        .filter_map(|r| {
            r.location.map(|point| MapPoint {
                name: r.name.clone(),
                latitude: point.latitude,
                longitude: point.longitude,
                cuisines: r.cuisines.clone(),
                average_cost_for_two: r.average_cost_for_two,
                aggregate_rating: r.aggregate_rating,
            })
        })
        .collect()
}

pub fn cities(dataset: &Dataset) -> Vec<String> {
    dataset
        .iter()
        .map(|r| r.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn restaurant_names(dataset: &Dataset) -> Vec<String> {
    dataset
        .iter()
        .map(|r| r.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
