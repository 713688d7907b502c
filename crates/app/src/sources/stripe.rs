//! Stripe coupons source.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use porter::discounts::{CanonicalDiscount, DiscountDuration, DiscountStatus, Provider};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::warn;
use zeroize::Zeroizing;

use crate::sources::{
    DiscountPage, DiscountSource, SourceFetchError,
    transport::{HttpTransport, Transport},
};

/// Production API address.
pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

const PAGE_LIMIT: u32 = 100;

/// Imports coupons from `/v1/coupons`.
///
/// Stripe coupons carry no separate redemption code, so the coupon id doubles as the code.
pub struct StripeSource {
    transport: Box<dyn Transport>,
    base_url: String,
}

impl fmt::Debug for StripeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StripeSource {
    /// Create a source reading through `transport`.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a source authenticated with a secret key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(api_key: Zeroizing<String>) -> Result<Self, SourceFetchError> {
        Ok(Self::new(Box::new(HttpTransport::new(
            api_key,
            "application/json",
        )?)))
    }

    /// Override the API address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl DiscountSource for StripeSource {
    fn provider(&self) -> Provider {
        Provider::Stripe
    }

    #[tracing::instrument(name = "sources.stripe.fetch_page", skip(self), err)]
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<DiscountPage, SourceFetchError> {
        let url = format!("{}/v1/coupons", self.base_url);

        let mut query = vec![("limit".to_string(), PAGE_LIMIT.to_string())];

        if let Some(cursor) = cursor {
            query.push(("starting_after".to_string(), cursor));
        }

        let list: CouponList = self.transport.get(&url, &query).await?.json()?;

        if let Some(error) = list.error {
            return Err(SourceFetchError::Upstream(error.message));
        }

        let next = if list.has_more {
            let last = list.data.last().ok_or(SourceFetchError::MissingCursor)?;

            Some(last.id.clone())
        } else {
            None
        };

        let discounts = list
            .data
            .into_iter()
            .map(to_canonical)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiscountPage { discounts, next })
    }
}

#[derive(Debug, Deserialize)]
struct CouponList {
    #[serde(default)]
    data: Vec<Coupon>,

    #[serde(default)]
    has_more: bool,

    error: Option<StripeError>,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Coupon {
    id: String,
    name: Option<String>,
    percent_off: Option<Decimal>,
    amount_off: Option<u64>,
    currency: Option<String>,
    duration: String,
    duration_in_months: Option<u32>,
    max_redemptions: Option<u64>,
    redeem_by: Option<i64>,

    #[serde(default)]
    times_redeemed: u64,

    created: i64,
    valid: bool,

    #[serde(default)]
    livemode: bool,
}

fn to_canonical(coupon: Coupon) -> Result<CanonicalDiscount, SourceFetchError> {
    let duration = match coupon.duration.as_str() {
        "once" => DiscountDuration::Once,
        "repeating" => DiscountDuration::Repeating,
        "forever" => DiscountDuration::Forever,
        other => {
            warn!(id = %coupon.id, duration = other, "unknown coupon duration, treating as once");

            DiscountDuration::Once
        }
    };

    let duration_in_months = if duration == DiscountDuration::Repeating {
        coupon.duration_in_months
    } else {
        None
    };

    let (amount, is_percent) = match (coupon.percent_off, coupon.amount_off) {
        (Some(percent), _) => (percent, true),
        (None, Some(amount)) => (Decimal::from(amount), false),
        (None, None) => return Err(SourceFetchError::MissingAmount(coupon.id)),
    };

    let created_at = Timestamp::from_second(coupon.created).map_err(SourceFetchError::Timestamp)?;

    let expires_at = coupon
        .redeem_by
        .map(Timestamp::from_second)
        .transpose()
        .map_err(SourceFetchError::Timestamp)?;

    let mut provider_data = Map::new();

    provider_data.insert("times_redeemed".to_string(), json!(coupon.times_redeemed));
    provider_data.insert("livemode".to_string(), json!(coupon.livemode));

    if let Some(currency) = coupon.currency {
        provider_data.insert("currency".to_string(), Value::from(currency.to_uppercase()));
    }

    let name = coupon
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| coupon.id.clone());

    Ok(CanonicalDiscount {
        code: coupon.id.clone(),
        id: coupon.id,
        provider: Provider::Stripe,
        name,
        amount,
        is_percent,
        duration,
        duration_in_months,
        status: if coupon.valid {
            DiscountStatus::Published
        } else {
            DiscountStatus::Archived
        },
        usage_limit: coupon.max_redemptions,
        expires_at,
        created_at,
        updated_at: created_at,
        provider_data,
    })
}
