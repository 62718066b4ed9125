//! Rakuten Ichiba search adapter

use super::traits::{VendorAdapter, VendorRequest, VendorResponse};
use crate::config::VendorSettings;
use crate::network::HttpClient;
use crate::results::{NormalizedItem, SearchError, Vendor};
use crate::search::SearchParams;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

const RAKUTEN_ENDPOINT: &str =
    "https://app.rakuten.co.jp/services/api/IchibaItem/Search/20220601";

/// Vendor error bodies are truncated to this many bytes before surfacing
const ERROR_BODY_LIMIT: usize = 200;

/// Rakuten Ichiba Item Search adapter
///
/// Requests only records that carry an image (`imageFlag=1`). The
/// application credential is checked per request; a missing credential is a
/// configuration error, not a startup failure.
pub struct Rakuten {
    endpoint: String,
    app_id: Option<String>,
    client: HttpClient,
}

impl Rakuten {
    /// Create a new adapter from vendor settings
    pub fn new(settings: &VendorSettings, client: HttpClient) -> Self {
        Self {
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| RAKUTEN_ENDPOINT.to_string()),
            app_id: settings.app_id.clone(),
            client,
        }
    }

    fn build_request(&self, params: &SearchParams) -> Result<VendorRequest, SearchError> {
        let app_id = self
            .app_id
            .as_deref()
            .ok_or(SearchError::MissingCredential("RAKUTEN_APP_ID"))?;

        let mut request = VendorRequest::get(self.endpoint.as_str())
            .param("applicationId", app_id)
            .param("format", "json")
            .param("keyword", params.query.as_str())
            .param("hits", params.result_count.to_string())
            .param("imageFlag", "1");

        if let Some(min) = params.min_price {
            request = request.param("minPrice", min.to_string());
        }
        if let Some(max) = params.max_price {
            request = request.param("maxPrice", max.to_string());
        }

        Ok(request)
    }

    fn parse_reply(&self, response: VendorResponse) -> Result<Vec<NormalizedItem>, SearchError> {
        if !response.is_success() {
            return Err(SearchError::Vendor {
                vendor: Vendor::Rakuten,
                status: response.status,
                body: truncate_body(&response.text, ERROR_BODY_LIMIT),
            });
        }

        let reply: SearchReply = response.json()?;

        Ok(reply
            .items
            .into_iter()
            .filter_map(|wrapper| normalize(wrapper.item))
            .collect())
    }
}

#[async_trait]
impl VendorAdapter for Rakuten {
    fn name(&self) -> &str {
        "rakuten"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<NormalizedItem>, SearchError> {
        let request = self.build_request(params)?;

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Network(e)
            }
        })?;

        self.parse_reply(response)
    }
}

/// Raw reply shape: `{ "Items": [{ "Item": {...} }, ...] }`
#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(rename = "Items", default)]
    items: Vec<ItemWrapper>,
}

#[derive(Debug, Deserialize)]
struct ItemWrapper {
    #[serde(rename = "Item", default)]
    item: RawItem,
}

#[derive(Debug, Default, Deserialize)]
struct RawItem {
    #[serde(rename = "itemCode")]
    item_code: Option<String>,
    #[serde(rename = "itemName")]
    item_name: Option<String>,
    #[serde(rename = "itemPrice")]
    item_price: Option<i64>,
    #[serde(rename = "itemUrl")]
    item_url: Option<String>,
    #[serde(rename = "mediumImageUrls", default)]
    medium_image_urls: Vec<ImageRef>,
    #[serde(rename = "smallImageUrls", default)]
    small_image_urls: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// Translate one raw record into a normalized item
///
/// Records lacking a URL or a title are dropped. The id falls back to the
/// item URL when the vendor item code is absent. The image prefers the
/// first medium URL with its resize parameter stripped, then the first
/// small URL, then empty.
fn normalize(raw: RawItem) -> Option<NormalizedItem> {
    let url = raw.item_url.filter(|u| !u.is_empty())?;
    let title = raw.item_name.filter(|t| !t.is_empty())?;

    let id = match raw.item_code.as_deref() {
        Some(code) if !code.is_empty() => format!("rakuten-{}", code),
        _ => format!("rakuten-{}", url),
    };

    let price = raw.item_price.unwrap_or(0).max(0) as u64;

    let image = raw
        .medium_image_urls
        .first()
        .map(|img| strip_resize_param(&img.image_url))
        .or_else(|| raw.small_image_urls.first().map(|img| img.image_url.clone()))
        .unwrap_or_default();

    Some(
        NormalizedItem::new(id, title, price, url, Vendor::Rakuten).with_image(image),
    )
}

/// Remove the `_ex` resize parameter from an image URL
///
/// Rakuten thumbnail URLs embed the requested size as `?_ex=128x128`;
/// stripping it yields the full-size image. Unparseable URLs are returned
/// unchanged.
fn strip_resize_param(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let kept: Vec<(String, String)> = parsed
                .query_pairs()
                .filter(|(key, _)| key != "_ex")
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();

            parsed.set_query(None);
            if !kept.is_empty() {
                let query_string = kept
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("&");
                parsed.set_query(Some(&query_string));
            }

            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Truncate a body to `max` bytes on a char boundary
fn truncate_body(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
