use crate::constants::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, ITEMS_PER_PAGE};
use crate::error::{FetchError, FetchResult};
use crate::types::{Endpoint, PageResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Keys that may hold the item list, after the endpoint's own plural key
pub const LIST_KEYS: &[&str] = &["data", "results"];

/// Keys that may hold the total item count, highest priority first
pub const TOTAL_KEYS: &[&str] = &[
    "total",
    "totalItems",
    "totalCharacters",
    "totalClans",
    "totalVillages",
];

/// Anything that can serve a page of entities
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, endpoint: Endpoint, page: u32, search: &str)
        -> FetchResult<PageResult>;
}

/// HTTP client for the Dattebayo REST API
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    page_size: u32,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
            page_size: ITEMS_PER_PAGE,
        })
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `{base}/{type}s?page=..&limit=..[&name=..]`
    pub fn page_url(&self, endpoint: Endpoint, page: u32, search: &str) -> String {
        let mut url = format!(
            "{}/{}?page={}&limit={}",
            self.base_url,
            endpoint.plural(),
            page,
            self.page_size
        );
        if !search.is_empty() {
            url.push_str("&name=");
            url.push_str(&urlencoding::encode(search));
        }
        url
    }

    async fn get_json(&self, url: &str) -> FetchResult<Value> {
        let res = self.http.get(url).send().await?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        res.json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(
        &self,
        endpoint: Endpoint,
        page: u32,
        search: &str,
    ) -> FetchResult<PageResult> {
        let url = self.page_url(endpoint, page, search);
        log::debug!("[api] GET {url}");

        // Dropping the future on expiry cancels the in-flight request
        let body = match tokio::time::timeout(self.timeout, self.get_json(&url)).await {
            Ok(res) => res?,
            Err(_) => {
                log::warn!("[api] {url} timed out after {}ms", self.timeout.as_millis());
                return Err(FetchError::Timeout {
                    secs: self.timeout.as_secs_f64(),
                });
            }
        };

        let result = normalize_page(endpoint, &body, page, self.page_size);
        log::info!(
            "[api] {} page {} -> {} items (total {})",
            endpoint,
            result.current_page,
            result.list.len(),
            result.total
        );
        Ok(result)
    }
}

/// Positive integer, accepting numeric strings the way loose JSON producers emit them
fn positive_int(v: &Value) -> Option<u64> {
    let n = match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 1.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (n > 0).then_some(n)
}

/// Decode any of the envelopes the API has used into a [`PageResult`].
///
/// List: first array under `{type}s`, then [`LIST_KEYS`], else empty.
/// Total: first positive integer under [`TOTAL_KEYS`], else the list length.
/// Page and page size come from the body when present, else the request.
pub fn normalize_page(endpoint: Endpoint, body: &Value, page: u32, limit: u32) -> PageResult {
    let list = std::iter::once(endpoint.plural())
        .chain(LIST_KEYS.iter().copied())
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default();

    let total = TOTAL_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(positive_int))
        .unwrap_or(list.len() as u64);

    let current_page = body
        .get("currentPage")
        .and_then(positive_int)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(page);
    let page_size = body
        .get("pageSize")
        .and_then(positive_int)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(limit);

    PageResult { list, current_page, page_size, total }
}
