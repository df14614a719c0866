use std::time::Duration;

/// Counters endpoint, serves both the brand and the model taxonomy
pub const CATALOG_PATH: &str = "/classifieds/v1/ad_counters";
/// Search endpoint returning the ads themselves
pub const LISTINGS_PATH: &str = "/search_bff/v1/content";
/// Base filter selecting the car category
pub const CAR_CATEGORY: &str = "cg=1020";

pub const DEFAULT_SITE_URL: &str = "https://www.blocket.se/";
pub const DEFAULT_API_URL: &str = "https://api.blocket.se";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the marketplace lives and how long each request may take
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Public page carrying the embedded bearer token
    pub site_url: String,
    /// Root of the JSON API
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Full request URL for `path` with the opaque search-parameter string
    /// passed through verbatim and `include=all` appended
    pub fn endpoint(&self, path: &str, params: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        if params.is_empty() {
            format!("{}{}?include=all", base, path)
        } else {
            format!("{}{}?{}&include=all", base, path, params)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
