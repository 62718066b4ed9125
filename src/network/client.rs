//! HTTP client for making requests to the vendor API

use crate::config::OutgoingSettings;
use crate::vendors::{VendorRequest, VendorResponse};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper with service-wide configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            default_timeout: settings.timeout(),
        })
    }

    /// Execute a vendor request
    pub async fn execute(&self, request: VendorRequest) -> Result<VendorResponse, reqwest::Error> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a vendor request with a custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: VendorRequest,
        timeout: Duration,
    ) -> Result<VendorResponse, reqwest::Error> {
        let mut req_builder = self.client.get(&request.url).timeout(timeout);

        req_builder = req_builder
            .header("User-Agent", user_agent())
            .header("Accept", "application/json");

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse a response into a VendorResponse
    async fn parse_response(response: Response) -> Result<VendorResponse, reqwest::Error> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(VendorResponse { status, text })
    }
}

/// User agent sent on every outbound request
fn user_agent() -> String {
    format!("shopsearch-rs/{}", crate::VERSION)
}
