use crate::error::Result;
use crate::models::{AdSequence, Catalog, Token};
use async_trait::async_trait;

/// Authenticated access to a marketplace's catalog and search API
/// Lets the pipeline run against the live site or an in-memory fake
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Obtain a bearer token for the subsequent calls
    async fn acquire_token(&self) -> Result<Token>;

    /// Fetch a brand or model taxonomy for the given search parameters
    async fn fetch_catalog(&self, token: &Token, params: &str) -> Result<Catalog>;

    /// Fetch the ads matching a model-level search-parameter string
    async fn fetch_listings(&self, token: &Token, params: &str) -> Result<AdSequence>;

    /// Get the name of the marketplace
    fn source_name(&self) -> &'static str;
}
