//! Result type definitions

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// A single normalized shopping result
///
/// Every vendor payload is translated into this shape before it reaches a
/// caller. Records missing a URL or a title are dropped during
/// normalization rather than surfaced with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Stable identifier, unique per vendor item
    pub id: String,
    /// Item display title
    pub title: String,
    /// Price in whole currency units
    pub price: u64,
    /// Preview image URL, empty when the vendor supplied none
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Item page URL, never empty
    pub url: String,
    /// Vendor that produced this item
    pub vendor: Vendor,
}

impl NormalizedItem {
    /// Create a new item
    pub fn new(id: String, title: String, price: u64, url: String, vendor: Vendor) -> Self {
        Self {
            id,
            title,
            price,
            image_url: String::new(),
            url,
            vendor,
        }
    }

    /// Add an image URL
    pub fn with_image(mut self, image_url: String) -> Self {
        self.image_url = image_url;
        self
    }
}

/// Supported shopping vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Rakuten,
}

impl Vendor {
    /// Vendor name as used in cache keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rakuten => "rakuten",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search failure taxonomy
///
/// Every failure a search request can produce. All vendor-side failures are
/// caught at the gateway boundary and converted to a uniform error response;
/// none propagate as panics.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Caller exceeded the per-client request quota; the vendor was not called
    #[error("too many requests")]
    RateLimited,

    /// Required vendor credential is absent from the environment
    #[error("missing {0}")]
    MissingCredential(&'static str),

    /// Vendor returned a non-success HTTP status
    #[error("{vendor} API {status}: {body}")]
    Vendor {
        vendor: Vendor,
        status: u16,
        body: String,
    },

    /// Vendor call exceeded its deadline or the connection was aborted
    #[error("vendor request timed out")]
    Timeout,

    /// Vendor replied with a success status but an unreadable body
    #[error("failed to parse vendor response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport-level failure talking to the vendor
    #[error("vendor request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl SearchError {
    /// HTTP status the error surfaces with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
