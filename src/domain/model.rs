use serde::{Deserialize, Serialize};

/// Aggregate review figures scraped for one domain.
///
/// This is also the cache value: its JSON form (`{"reviewsCount":…,"rating":…}`)
/// keeps the full-precision rating, truncation only happens on presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    reviews_count: u64,
    rating: f64,
}

impl ReviewSnapshot {
    pub fn new(reviews_count: u64, rating: f64) -> Self {
        Self {
            reviews_count,
            rating,
        }
    }

    pub fn reviews_count(&self) -> u64 {
        self.reviews_count
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn display_rating(&self) -> String {
        format_rating(self.rating)
    }
}

/// Renders a rating with exactly one fraction digit, truncating toward zero.
///
/// `4.567` becomes `"4.5"` and `4.9999` becomes `"4.9"`; the value is never
/// rounded up.
pub fn format_rating(rating: f64) -> String {
    let truncated = (rating * 10.0).trunc() / 10.0;
    format!("{:.1}", truncated)
}
