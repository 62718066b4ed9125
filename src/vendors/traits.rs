//! Vendor adapter traits and types

use crate::results::{NormalizedItem, SearchError};
use crate::search::SearchParams;
use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP request to be made against a vendor API
///
/// Vendor search APIs are query-parameter GET endpoints, so this carries
/// only a URL and its parameters.
#[derive(Debug, Clone)]
pub struct VendorRequest {
    /// URL to request
    pub url: String,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl VendorRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: HashMap::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// HTTP response from a vendor request
#[derive(Debug)]
pub struct VendorResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl VendorResponse {
    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Check if the response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait every vendor adapter implements
///
/// An adapter turns `SearchParams` into one vendor call and the vendor's
/// payload into normalized items. Gateway tests substitute this seam with a
/// counting stub.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    /// Vendor name, used in cache keys and logs
    fn name(&self) -> &str;

    /// Execute a search against the vendor
    async fn search(&self, params: &SearchParams) -> Result<Vec<NormalizedItem>, SearchError>;
}
