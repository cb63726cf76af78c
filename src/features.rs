use crate::restaurant::{Dataset, Restaurant};

/// Renders a number the way a float column prints; missing values vanish.
pub fn render_number(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e16 => format!("{:.1}", v),
        Some(v) => v.to_string(),
    }
}

/// `cuisines cost rating`, the text a restaurant is compared on.
pub fn composite_document(restaurant: &Restaurant) -> String {
    format!(
        "{} {} {}",
        restaurant.cuisines,
        render_number(restaurant.average_cost_for_two),
        render_number(Some(restaurant.aggregate_rating))
    )
}

pub fn composite_documents(dataset: &Dataset) -> Vec<String> {
    dataset.iter().map(composite_document).collect()
}
