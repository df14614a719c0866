use crate::error::{Result, ScoutError};
use crate::models::{AdSequence, Catalog, Token};
use crate::scrapers::token::extract_bearer_token;
use crate::scrapers::traits::MarketplaceApi;
use crate::scrapers::types::{ClientConfig, CATALOG_PATH, LISTINGS_PATH};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const EXCERPT_LEN: usize = 200;

/// Blocket API client
pub struct BlocketClient {
    client: Client,
    config: ClientConfig,
}

impl BlocketClient {
    /// Create a client for the given endpoints and timeout
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ScoutError::Network {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(Self { client, config })
    }

    /// GET `url` and return the body text; non-2xx responses are errors
    async fn get_text(&self, url: &str, token: Option<&Token>) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.bearer());
        }

        let network = |source| ScoutError::Network {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if !status.is_success() {
            warn!("{} returned status: {}", url, status);
            return Err(ScoutError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                excerpt: body.chars().take(EXCERPT_LEN).collect(),
            });
        }

        debug!("Downloaded {} bytes", body.len());
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &Token) -> Result<T> {
        let body = self.get_text(url, Some(token)).await?;
        serde_json::from_str(&body).map_err(|source| ScoutError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MarketplaceApi for BlocketClient {
    async fn acquire_token(&self) -> Result<Token> {
        info!("Requesting bearer token from {}", self.config.site_url);
        let html = self.get_text(&self.config.site_url, None).await?;
        extract_bearer_token(&html)
    }

    async fn fetch_catalog(&self, token: &Token, params: &str) -> Result<Catalog> {
        let url = self.config.endpoint(CATALOG_PATH, params);
        let catalog: Catalog = self.get_json(&url, token).await?;
        info!(
            "Catalog for '{}' has {} entries",
            params,
            catalog.category_counters.len()
        );
        Ok(catalog)
    }

    async fn fetch_listings(&self, token: &Token, params: &str) -> Result<AdSequence> {
        let url = self.config.endpoint(LISTINGS_PATH, params);
        let ads: AdSequence = self.get_json(&url, token).await?;
        info!("Search returned {} ads", ads.data.len());
        Ok(ads)
    }

    fn source_name(&self) -> &'static str {
        "Blocket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BlocketClient {
        BlocketClient::with_config(ClientConfig {
            site_url: format!("{}/", server.uri()),
            api_url: server.uri(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[test]
    fn default_client_targets_production() {
        let client = BlocketClient::with_config(ClientConfig::default()).unwrap();
        assert_eq!(client.config.api_url, crate::scrapers::types::DEFAULT_API_URL);
        assert_eq!(client.config.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn acquires_token_from_front_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><script>{"bearerToken":"abc123"}</script></html>"#,
            ))
            .mount(&server)
            .await;

        let token = client_for(&server).acquire_token().await.unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[tokio::test]
    async fn front_page_error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("bearerToken\":\"stale\""))
            .mount(&server)
            .await;

        let err = client_for(&server).acquire_token().await.unwrap_err();
        assert!(matches!(err, ScoutError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn page_without_marker_is_extraction_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).acquire_token().await.unwrap_err();
        assert!(matches!(err, ScoutError::Extraction(_)));
    }

    #[tokio::test]
    async fn catalog_request_carries_token_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CATALOG_PATH))
            .and(query_param("cg", "1020"))
            .and(query_param("brand", "abc"))
            .and(query_param("include", "all"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "category_counters": [
                    {"search_parameters": "cg=1020&brand=abc&model=xyz", "label": "V70", "api_query": "", "ad_counter": 4},
                    {"search_parameters": "cg=1020&brand=abc&model=qrs", "label": "XC90", "api_query": "", "ad_counter": 9}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = client_for(&server)
            .fetch_catalog(&Token::new("tok"), "cg=1020&brand=abc")
            .await
            .unwrap();
        let labels: Vec<&str> = catalog.labels().collect();
        assert_eq!(labels, vec!["V70", "XC90"]);
    }

    #[tokio::test]
    async fn listings_query_string_is_passed_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTINGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"ad_id": "1", "subject": "Volvo V70 2.4", "price": {"value": 59000}}]
            })))
            .mount(&server)
            .await;

        let ads = client_for(&server)
            .fetch_listings(&Token::new("tok"), "cg=1020&brand=abc&model=xyz")
            .await
            .unwrap();
        assert_eq!(ads.data.len(), 1);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.query(),
            Some("cg=1020&brand=abc&model=xyz&include=all")
        );
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CATALOG_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_catalog(&Token::new("tok"), "cg=1020")
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Decode { .. }));
    }

    #[tokio::test]
    async fn unauthorized_api_call_is_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTINGS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_listings(&Token::new("expired"), "cg=1020")
            .await
            .unwrap_err();
        match err {
            ScoutError::HttpStatus { status, excerpt, .. } => {
                assert_eq!(status, 401);
                assert_eq!(excerpt, "invalid token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_times_out_as_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CATALOG_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"category_counters": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_catalog(&Token::new("tok"), "cg=1020")
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Network { .. }));
    }
}
