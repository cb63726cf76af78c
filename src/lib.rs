//! Content-based restaurant recommendations over a filtered restaurant table.
//!
//! The pipeline is `load` → `filter` → `build_vectors` → `recommend`, with
//! `top_n_by_rating` and the [`stats`] helpers feeding the dashboard views.

pub mod cache;
pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod loader;
pub mod logger;
pub mod ranker;
pub mod restaurant;
pub mod session;
pub mod stats;
pub mod stopwords;
pub mod vector_ops;
pub mod vectorizer;

pub use error::{RecommendError, Result};
pub use filter::{filter, FilterParams};
pub use loader::load;
pub use ranker::{recommend, top_n_by_rating, Recommendation, RecommendedRestaurant};
pub use restaurant::{Dataset, GeoPoint, Restaurant, SubsetKey};
pub use session::Session;
pub use vectorizer::{build_vectors, VectorSpace};
