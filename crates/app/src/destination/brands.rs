//! Destination brand resolution.

use thiserror::Error;
use tracing::info;

use crate::destination::{Brand, DestinationApi, DestinationError};

/// Result of resolving the brand to migrate into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandChoice {
    /// A single brand was identified.
    Selected(String),

    /// Several brands exist; the caller has to pick one.
    Ambiguous(Vec<Brand>),
}

#[derive(Debug, Error)]
pub enum BrandError {
    #[error("no brands are available for this API key")]
    NoBrands,

    #[error("brand {0:?} does not exist")]
    UnknownBrand(String),

    #[error("failed to list brands: {0}")]
    Destination(#[from] DestinationError),
}

/// Pick the brand to migrate into.
///
/// A `preferred` brand is checked against the listing. Without one, a single listed brand is
/// selected automatically.
pub async fn resolve_brand(
    destination: &dyn DestinationApi,
    preferred: Option<String>,
) -> Result<BrandChoice, BrandError> {
    let brands = destination.list_brands().await?;

    if let Some(preferred) = preferred {
        if brands.iter().any(|brand| brand.brand_id == preferred) {
            return Ok(BrandChoice::Selected(preferred));
        }

        return Err(BrandError::UnknownBrand(preferred));
    }

    match brands.as_slice() {
        [] => Err(BrandError::NoBrands),
        [brand] => {
            info!(brand_id = %brand.brand_id, "using the only available brand");

            Ok(BrandChoice::Selected(brand.brand_id.clone()))
        }
        _ => Ok(BrandChoice::Ambiguous(brands)),
    }
}
