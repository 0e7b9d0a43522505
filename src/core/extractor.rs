use crate::domain::model::ReviewSnapshot;
use crate::utils::error::{Result, ReviewError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Element id of the block holding the business name, review count and rating.
pub const BUSINESS_UNIT_ID: &str = "business-unit-title";

const REVIEWS_CHILD_INDEX: usize = 1;
const RATING_CHILD_INDEX: usize = 2;

// ASCII only: `\d` would also accept other Unicode digit classes.
const REVIEWS_COUNT_PATTERN_STR: &str = r"^[0-9]+$";
const RATING_PATTERN_STR: &str = r"^[0-9]\.?[0-9]*$";

static BUSINESS_UNIT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("#{}", BUSINESS_UNIT_ID))
        .expect("Failed to parse business unit selector - this is a bug")
});

static REVIEWS_COUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(REVIEWS_COUNT_PATTERN_STR)
        .expect("Failed to compile reviews count pattern - this is a bug")
});

static RATING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(RATING_PATTERN_STR).expect("Failed to compile rating pattern - this is a bug")
});

/// Extracts the review count and rating from a review page.
///
/// The page must contain an element with id [`BUSINESS_UNIT_ID`] with at least
/// three child elements: the second holds text such as `1,274 reviews`, the
/// third holds the rating such as `4.9`. Anything else is a
/// [`ReviewError::ParsingFailure`]; no partial snapshot is ever returned.
pub fn extract(raw_markup: &str) -> Result<ReviewSnapshot> {
    // html5ever recovers from malformed markup, so parsing itself cannot fail;
    // every structural problem surfaces in the lookups below.
    let document = Html::parse_document(raw_markup);

    let container = document
        .select(&BUSINESS_UNIT_SELECTOR)
        .next()
        .ok_or_else(|| {
            tracing::debug!("Business unit element was not found");
            ReviewError::parsing("container not found")
        })?;

    let children: Vec<ElementRef> = container.children().filter_map(ElementRef::wrap).collect();
    if children.len() <= RATING_CHILD_INDEX {
        tracing::debug!(
            "Business unit has not enough child elements: {}",
            children.len()
        );
        return Err(ReviewError::parsing("insufficient structure"));
    }

    let reviews_count = parse_reviews_count(&visible_text(&children[REVIEWS_CHILD_INDEX]))?;
    tracing::debug!("Reviews count is {}", reviews_count);

    let rating = parse_rating(&visible_text(&children[RATING_CHILD_INDEX]))?;
    tracing::debug!("Rating is {}", rating);

    Ok(ReviewSnapshot::new(reviews_count, rating))
}

/// Text content of an element with whitespace runs collapsed and ends trimmed.
fn visible_text(element: &ElementRef) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_reviews_count(text: &str) -> Result<u64> {
    if text.is_empty() {
        tracing::debug!("Reviews element has no text representation");
        return Err(ReviewError::parsing("reviews count is empty"));
    }

    let token = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .replace(',', "");

    if !REVIEWS_COUNT_PATTERN.is_match(&token) {
        tracing::debug!(
            "Reviews element has not suitable text representation: \"{}\"",
            token
        );
        return Err(ReviewError::parsing(format!(
            "reviews count \"{}\" does not match {}",
            token, REVIEWS_COUNT_PATTERN_STR
        )));
    }

    token
        .parse::<u64>()
        .map_err(|e| ReviewError::parsing(format!("reviews count \"{}\": {}", token, e)))
}

fn parse_rating(text: &str) -> Result<f64> {
    if text.is_empty() {
        tracing::debug!("Rating element has no text representation");
        return Err(ReviewError::parsing("rating is empty"));
    }

    if !RATING_PATTERN.is_match(text) {
        tracing::debug!(
            "Rating element has not suitable text representation: \"{}\"",
            text
        );
        return Err(ReviewError::parsing(format!(
            "rating \"{}\" does not match {}",
            text, RATING_PATTERN_STR
        )));
    }

    text.parse::<f64>()
        .map_err(|e| ReviewError::parsing(format!("rating \"{}\": {}", text, e)))
}
