use crate::error::{Result, ScoutError};
use crate::models::{AdSequence, Catalog, CategoryCounter, Token};
use crate::scrapers::types::CAR_CATEGORY;
use crate::scrapers::MarketplaceApi;
use crate::selector::select_by_label;
use tracing::info;

/// Ads for one resolved brand/model pair
#[derive(Debug)]
pub struct Listings {
    pub brand: CategoryCounter,
    pub model: CategoryCounter,
    pub ads: AdSequence,
}

fn select(catalog: &Catalog, kind: &'static str, label: &str) -> Result<CategoryCounter> {
    select_by_label(catalog, label)
        .cloned()
        .ok_or_else(|| ScoutError::NotFound {
            kind,
            label: label.to_string(),
        })
}

async fn brand_catalog<A: MarketplaceApi + ?Sized>(api: &A, token: &Token) -> Result<Catalog> {
    api.fetch_catalog(token, CAR_CATEGORY).await
}

async fn model_catalog<A: MarketplaceApi + ?Sized>(
    api: &A,
    token: &Token,
    brand: &str,
) -> Result<(CategoryCounter, Catalog)> {
    let brands = brand_catalog(api, token).await?;
    let brand = select(&brands, "Brand", brand)?;
    info!("Selected brand {} ({})", brand.label, brand.search_parameters);

    let models = api.fetch_catalog(token, &brand.search_parameters).await?;
    Ok((brand, models))
}

/// Every brand the marketplace lists for cars
pub async fn list_brands<A: MarketplaceApi + ?Sized>(api: &A) -> Result<Catalog> {
    let token = api.acquire_token().await?;
    brand_catalog(api, &token).await
}

/// Every model listed under `brand`
pub async fn list_models<A: MarketplaceApi + ?Sized>(api: &A, brand: &str) -> Result<Catalog> {
    let token = api.acquire_token().await?;
    let (_, models) = model_catalog(api, &token, brand).await?;
    Ok(models)
}

/// Token, brand catalog, model catalog, then the ads for the selected model.
///
/// An unknown brand or model aborts with [`ScoutError::NotFound`] before
/// the search endpoint is ever called.
pub async fn resolve_listings<A: MarketplaceApi + ?Sized>(
    api: &A,
    brand: &str,
    model: &str,
) -> Result<Listings> {
    info!("Resolving {} {} on {}", brand, model, api.source_name());

    let token = api.acquire_token().await?;
    let (brand, models) = model_catalog(api, &token, brand).await?;
    let model = select(&models, "Model", model)?;
    info!("Selected model {} ({})", model.label, model.search_parameters);

    let ads = api.fetch_listings(&token, &model.search_parameters).await?;
    Ok(Listings { brand, model, ads })
}
