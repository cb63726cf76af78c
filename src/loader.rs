//! Reads the raw restaurant table and normalizes it into a [`Dataset`].
//!
//! Every column is optional. Absent columns fall back to the defaults
//! documented on [`Restaurant`]; only an unreadable or structurally broken
//! table is an error.

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use statrs::statistics::{Data, Median};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{RecommendError, Result};
use crate::restaurant::{
    Dataset, GeoPoint, Restaurant, SourceDigest, DEFAULT_THUMBNAIL, NO, UNKNOWN,
};

const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const INVALID_CITY: &str = "NEW";

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("valid pattern"));

pub fn normalize_column_name(raw: &str) -> String {
    NON_ALNUM
        .replace_all(&raw.trim().to_lowercase(), "_")
        .into_owned()
}

struct Columns {
    name: Option<usize>,
    cuisines: Option<usize>,
    cost: Option<usize>,
    rating: Option<usize>,
    online_delivery: Option<usize>,
    table_booking: Option<usize>,
    price_range: Option<usize>,
    city: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    thumbnail: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Self {
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| headers.iter().position(|h| h == c))
        };
        Self {
            name: find(&["restaurant_name", "name"]),
            cuisines: find(&["cuisines"]),
            cost: find(&["average_cost_for_two"]),
            rating: find(&["aggregate_rating"]),
            online_delivery: find(&["has_online_delivery"]),
            table_booking: find(&["has_table_booking"]),
            price_range: find(&["price_range"]),
            city: find(&["city"]),
            latitude: find(&["latitude"]),
            longitude: find(&["longitude"]),
            thumbnail: find(&["restaurant_thumb", "thumbnail_url"]),
        }
    }

    fn known(&self) -> HashSet<usize> {
        [
            self.name,
            self.cuisines,
            self.cost,
            self.rating,
            self.online_delivery,
            self.table_booking,
            self.price_range,
            self.city,
            self.latitude,
            self.longitude,
            self.thumbnail,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

struct RawRow {
    name: Option<String>,
    cuisines: Option<String>,
    cost: Option<f64>,
    rating: Option<f64>,
    online_delivery: Option<String>,
    table_booking: Option<String>,
    price_range: Option<f64>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    thumbnail: Option<String>,
    extras: Vec<Option<String>>,
}

fn cell(record: &StringRecord, column: Option<usize>) -> Option<String> {
    let value = record.get(column?)?;
    if MISSING_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn numeric(record: &StringRecord, column: Option<usize>) -> Option<f64> {
    cell(record, column)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn median(values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values).median())
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Loads and normalizes the restaurant table at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let label = path.display().to_string();
    debug!("Loading restaurant data from {}", label);
    let bytes = fs::read(path).map_err(|e| RecommendError::data_load(&label, e))?;
    load_bytes(&bytes, &label)
}

/// Same as [`load`] over an in-memory table; `label` names it in errors.
pub fn load_bytes(bytes: &[u8], label: &str) -> Result<Dataset> {
    let text = decode_latin1(bytes);
    // Short rows are padded with missing cells; long rows are rejected below.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RecommendError::data_load(label, e))?
        .iter()
        .map(normalize_column_name)
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(RecommendError::data_load(label, "no header row"));
    }

    let columns = Columns::locate(&headers);
    let known = columns.known();
    let extra_columns: Vec<usize> = (0..headers.len()).filter(|i| !known.contains(i)).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| RecommendError::data_load(label, e))?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(RecommendError::data_load(
                label,
                format!(
                    "line {} has {} fields, expected at most {}",
                    line,
                    record.len(),
                    headers.len()
                ),
            ));
        }
        rows.push(RawRow {
            name: cell(&record, columns.name),
            cuisines: cell(&record, columns.cuisines),
            cost: numeric(&record, columns.cost),
            rating: numeric(&record, columns.rating),
            online_delivery: cell(&record, columns.online_delivery),
            table_booking: cell(&record, columns.table_booking),
            price_range: numeric(&record, columns.price_range),
            city: cell(&record, columns.city),
            latitude: numeric(&record, columns.latitude),
            longitude: numeric(&record, columns.longitude),
            thumbnail: cell(&record, columns.thumbnail),
            extras: extra_columns
                .iter()
                .map(|&i| cell(&record, Some(i)))
                .collect(),
        });
    }
    debug!("Read {} raw rows with {} columns", rows.len(), headers.len());

    // Medians run over the whole table before any row is dropped.
    let rating_fill = if columns.rating.is_some() {
        median(rows.iter().filter_map(|r| r.rating).collect()).unwrap_or(0.0)
    } else {
        0.0
    };
    let price_fill = median(rows.iter().filter_map(|r| r.price_range).collect());
    debug!(
        "Rating fill value {}, price range fill value {:?}",
        rating_fill, price_fill
    );

    let before = rows.len();
    if columns.city.is_some() {
        rows.retain(|r| match &r.city {
            Some(city) => !city.eq_ignore_ascii_case(INVALID_CITY),
            None => false,
        });
        debug!("Dropped {} rows with a missing or invalid city", before - rows.len());
    }

    let has_coordinates = columns.latitude.is_some() && columns.longitude.is_some();
    if has_coordinates {
        let before = rows.len();
        rows.retain(|r| r.latitude.is_some() && r.longitude.is_some());
        debug!("Dropped {} rows without coordinates", before - rows.len());
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) if has_coordinates => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };
        let rating = row.rating.unwrap_or(rating_fill);
        let restaurant = Restaurant {
            name: row.name.unwrap_or_else(|| UNKNOWN.to_string()),
            cuisines: row.cuisines.unwrap_or_else(|| UNKNOWN.to_string()),
            average_cost_for_two: row.cost,
            aggregate_rating: rating.clamp(0.0, 5.0),
            has_online_delivery: row.online_delivery.unwrap_or_else(|| NO.to_string()),
            has_table_booking: row.table_booking.unwrap_or_else(|| NO.to_string()),
            price_range: row.price_range.or(price_fill),
            city: row.city.unwrap_or_else(|| UNKNOWN.to_string()),
            location,
            thumbnail_url: row.thumbnail.unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string()),
        };
        if seen.insert(row_key(&restaurant, rating, &row.extras)) {
            records.push(restaurant);
        }
    }
    debug!("Loaded {} restaurants", records.len());

    Ok(Dataset::new(SourceDigest::from_bytes(bytes), records))
}

/// Full-row identity; `rating` is the filled value before clamping.
fn row_key(restaurant: &Restaurant, rating: f64, extras: &[Option<String>]) -> Vec<String> {
    let number = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let mut key = vec![
        restaurant.name.clone(),
        restaurant.cuisines.clone(),
        number(restaurant.average_cost_for_two),
        rating.to_string(),
        restaurant.has_online_delivery.clone(),
        restaurant.has_table_booking.clone(),
        number(restaurant.price_range),
        restaurant.city.clone(),
        number(restaurant.location.map(|p| p.latitude)),
        number(restaurant.location.map(|p| p.longitude)),
        restaurant.thumbnail_url.clone(),
    ];
    key.extend(
        extras
            .iter()
            .map(|e| e.clone().unwrap_or_else(|| "\u{0}".to_string())),
    );
    key
}
