//! Search parameter models

use crate::results::NormalizedItem;
use serde::{Deserialize, Serialize};

/// Keyword used when the caller sends none
pub const DEFAULT_QUERY: &str = "ファッション";

/// Result count used when the caller sends none
pub const DEFAULT_RESULT_COUNT: u32 = 12;

/// Lower bound on the requested result count
pub const MIN_RESULT_COUNT: u32 = 1;

/// Upper bound on the requested result count
pub const MAX_RESULT_COUNT: u32 = 30;

/// Result ordering applied before returning items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Vendor-provided order, untouched
    #[default]
    Relevance,
    /// Stable sort by ascending price
    PriceAsc,
    /// Stable sort by descending price
    PriceDesc,
}

impl SortMode {
    /// Parse a raw sort string, defaulting to relevance for anything unknown
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Relevance,
        }
    }

    /// Sort items in place
    ///
    /// Sorts are stable: items with equal price keep their relative order.
    pub fn apply(&self, items: &mut [NormalizedItem]) {
        match self {
            Self::Relevance => {}
            Self::PriceAsc => items.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => items.sort_by(|a, b| b.price.cmp(&a.price)),
        }
    }
}

/// Raw request body as sent by the front end
///
/// Every field is optional; a body that fails to parse at all degrades to
/// this struct's default. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchBody {
    pub query: Option<String>,
    #[serde(rename = "resultCount")]
    pub result_count: Option<i64>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    #[serde(rename = "sortMode")]
    pub sort_mode: Option<String>,
}

/// Validated search parameters, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search keyword
    pub query: String,
    /// Requested number of results, clamped into [1, 30]
    pub result_count: u32,
    /// Lower price bound in whole currency units
    pub min_price: Option<u64>,
    /// Upper price bound in whole currency units
    pub max_price: Option<u64>,
    /// Result ordering
    pub sort_mode: SortMode,
}

impl SearchParams {
    /// Build validated parameters from a raw request body
    ///
    /// Defaulting rules: absent query falls back to [`DEFAULT_QUERY`], the
    /// result count is clamped into [1, 30], price bounds are kept only
    /// when finite and non-negative (truncated to whole units), and unknown
    /// sort strings fall back to relevance.
    pub fn from_raw(raw: RawSearchBody) -> Self {
        let result_count = raw
            .result_count
            .unwrap_or(DEFAULT_RESULT_COUNT as i64)
            .clamp(MIN_RESULT_COUNT as i64, MAX_RESULT_COUNT as i64) as u32;

        Self {
            query: raw.query.unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            result_count,
            min_price: sanitize_price(raw.min_price),
            max_price: sanitize_price(raw.max_price),
            sort_mode: SortMode::parse_or_default(raw.sort_mode.as_deref()),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from_raw(RawSearchBody::default())
    }
}

/// Keep a price bound only when it is a finite, non-negative number
fn sanitize_price(raw: Option<f64>) -> Option<u64> {
    raw.filter(|p| p.is_finite() && *p >= 0.0).map(|p| p as u64)
}
