//! Lemon Squeezy discounts source.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use porter::discounts::{CanonicalDiscount, DiscountDuration, DiscountStatus, Provider};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::sources::{
    DiscountPage, DiscountSource, SourceFetchError,
    transport::{HttpTransport, Transport},
};

/// Production API address.
pub const DEFAULT_BASE_URL: &str = "https://api.lemonsqueezy.com";

/// JSON:API media type required by Lemon Squeezy.
pub const ACCEPT: &str = "application/vnd.api+json";

const PAGE_SIZE: u32 = 100;

/// Imports discounts from `/v1/discounts`.
///
/// Fixed-amount discounts are tagged with their store's currency. Currencies are looked up
/// once per store and cached for the lifetime of this source, which is one import run.
pub struct LemonSqueezySource {
    transport: Box<dyn Transport>,
    base_url: String,
    currencies: FxHashMap<u64, String>,
}

impl fmt::Debug for LemonSqueezySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LemonSqueezySource")
            .field("base_url", &self.base_url)
            .field("cached_currencies", &self.currencies.len())
            .finish_non_exhaustive()
    }
}

impl LemonSqueezySource {
    /// Create a source reading through `transport`.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            currencies: FxHashMap::default(),
        }
    }

    /// Create a source authenticated with an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(api_key: Zeroizing<String>) -> Result<Self, SourceFetchError> {
        Ok(Self::new(Box::new(HttpTransport::new(api_key, ACCEPT)?)))
    }

    /// Override the API address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn store_currency(&mut self, store_id: u64) -> Result<String, SourceFetchError> {
        if let Some(currency) = self.currencies.get(&store_id) {
            return Ok(currency.clone());
        }

        let url = format!("{}/v1/stores/{store_id}", self.base_url);

        let store: Document<StoreResource> = self.transport.get(&url, &[]).await?.json()?;

        let currency = store.into_data()?.attributes.currency;

        debug!(store_id, %currency, "resolved store currency");

        self.currencies.insert(store_id, currency.clone());

        Ok(currency)
    }
}

#[async_trait]
impl DiscountSource for LemonSqueezySource {
    fn provider(&self) -> Provider {
        Provider::LemonSqueezy
    }

    #[tracing::instrument(name = "sources.lemonsqueezy.fetch_page", skip(self), err)]
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<DiscountPage, SourceFetchError> {
        let page_number = match cursor {
            Some(cursor) => cursor
                .parse::<u64>()
                .map_err(|_parse_error| SourceFetchError::InvalidCursor(cursor))?,
            None => 1,
        };

        let url = format!("{}/v1/discounts", self.base_url);

        let query = [
            ("page[number]".to_string(), page_number.to_string()),
            ("page[size]".to_string(), PAGE_SIZE.to_string()),
        ];

        let document: Collection<DiscountResource> =
            self.transport.get(&url, &query).await?.json()?;

        ensure_no_errors(&document.errors)?;

        if document.meta.is_none() && !document.data.is_empty() {
            warn!(
                page = page_number,
                "discount page has no pagination meta, treating as last page"
            );
        }

        let next = document
            .meta
            .map(|meta| meta.page)
            .filter(|page| page.current_page < page.last_page)
            .map(|page| (page.current_page + 1).to_string());

        let mut discounts = Vec::with_capacity(document.data.len());

        for resource in document.data {
            let currency = if resource.attributes.amount_type == AMOUNT_TYPE_FIXED {
                Some(self.store_currency(resource.attributes.store_id).await?)
            } else {
                None
            };

            discounts.push(to_canonical(resource, currency.as_deref()));
        }

        Ok(DiscountPage { discounts, next })
    }
}

const AMOUNT_TYPE_PERCENT: &str = "percent";
const AMOUNT_TYPE_FIXED: &str = "fixed";

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,

    meta: Option<Meta>,

    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Document<T> {
    data: Option<T>,

    #[serde(default)]
    errors: Vec<ApiError>,
}

impl<T> Document<T> {
    fn into_data(self) -> Result<T, SourceFetchError> {
        ensure_no_errors(&self.errors)?;

        self.data
            .ok_or_else(|| SourceFetchError::Upstream("response has no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    title: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    page: PageMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    current_page: u64,
    last_page: u64,
}

#[derive(Debug, Deserialize)]
struct StoreResource {
    attributes: StoreAttributes,
}

#[derive(Debug, Deserialize)]
struct StoreAttributes {
    currency: String,
}

#[derive(Debug, Deserialize)]
struct DiscountResource {
    id: String,
    attributes: DiscountAttributes,
}

#[derive(Debug, Deserialize)]
struct DiscountAttributes {
    store_id: u64,

    #[serde(default)]
    name: String,

    code: String,
    amount: Decimal,
    amount_type: String,

    #[serde(default)]
    is_limited_to_products: bool,

    #[serde(default)]
    is_limited_redemptions: bool,

    #[serde(default)]
    max_redemptions: u64,

    expires_at: Option<Timestamp>,
    duration: String,
    duration_in_months: Option<u32>,
    status: String,

    #[serde(default)]
    test_mode: bool,

    created_at: Timestamp,
    updated_at: Timestamp,
}

fn ensure_no_errors(errors: &[ApiError]) -> Result<(), SourceFetchError> {
    let Some(error) = errors.first() else {
        return Ok(());
    };

    let message = error
        .detail
        .as_deref()
        .or(error.title.as_deref())
        .unwrap_or("unknown error");

    Err(SourceFetchError::Upstream(message.to_string()))
}

fn map_duration(id: &str, duration: &str) -> DiscountDuration {
    match duration {
        "once" => DiscountDuration::Once,
        "repeating" => DiscountDuration::Repeating,
        "forever" => DiscountDuration::Forever,
        other => {
            warn!(id, duration = other, "unknown discount duration, treating as once");

            DiscountDuration::Once
        }
    }
}

fn map_amount_type(id: &str, amount_type: &str) -> bool {
    match amount_type {
        AMOUNT_TYPE_PERCENT => true,
        AMOUNT_TYPE_FIXED => false,
        other => {
            warn!(id, amount_type = other, "unknown amount type, treating as fixed");

            false
        }
    }
}

fn map_status(status: &str) -> DiscountStatus {
    match status {
        "published" => DiscountStatus::Published,
        "draft" => DiscountStatus::Draft,
        _ => DiscountStatus::Archived,
    }
}

fn to_canonical(resource: DiscountResource, currency: Option<&str>) -> CanonicalDiscount {
    let DiscountResource { id, attributes } = resource;

    let duration = map_duration(&id, &attributes.duration);
    let is_percent = map_amount_type(&id, &attributes.amount_type);

    let duration_in_months = if duration == DiscountDuration::Repeating {
        attributes.duration_in_months
    } else {
        None
    };

    let name = if attributes.name.trim().is_empty() {
        attributes.code.clone()
    } else {
        attributes.name
    };

    let mut provider_data = Map::new();

    provider_data.insert("store_id".to_string(), json!(attributes.store_id));
    provider_data.insert("amount_type".to_string(), json!(attributes.amount_type));
    provider_data.insert(
        "is_limited_to_products".to_string(),
        json!(attributes.is_limited_to_products),
    );
    provider_data.insert("test_mode".to_string(), json!(attributes.test_mode));

    if let Some(currency) = currency {
        provider_data.insert("currency".to_string(), Value::from(currency));
    }

    CanonicalDiscount {
        id,
        provider: Provider::LemonSqueezy,
        name,
        code: attributes.code,
        amount: attributes.amount,
        is_percent,
        duration,
        duration_in_months,
        status: map_status(&attributes.status),
        usage_limit: attributes
            .is_limited_redemptions
            .then_some(attributes.max_redemptions),
        expires_at: attributes.expires_at,
        created_at: attributes.created_at,
        updated_at: attributes.updated_at,
        provider_data,
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use serde_json::json;
    use testresult::TestResult;

    use crate::sources::{TransportResponse, import, transport::MockTransport};

    use super::*;

    fn ok(body: &Value) -> Result<TransportResponse, SourceFetchError> {
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn discount_json(id: &str, attributes: Value) -> Value {
        let mut base = json!({
            "store_id": 7,
            "name": "Spring",
            "code": "SPRING20",
            "amount": 20,
            "amount_type": "percent",
            "is_limited_to_products": false,
            "is_limited_redemptions": false,
            "max_redemptions": 0,
            "starts_at": null,
            "expires_at": null,
            "duration": "once",
            "duration_in_months": 1,
            "status": "published",
            "status_formatted": "Published",
            "test_mode": false,
            "created_at": "2024-01-01T00:00:00.000000Z",
            "updated_at": "2024-01-02T00:00:00.000000Z",
        });

        if let (Some(base), Some(overrides)) = (base.as_object_mut(), attributes.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }

        json!({ "type": "discounts", "id": id, "attributes": base })
    }

    fn page(data: Vec<Value>, current: u64, last: u64) -> Value {
        json!({
            "meta": { "page": { "currentPage": current, "lastPage": last, "perPage": 100 } },
            "data": data,
        })
    }

    #[tokio::test]
    async fn maps_percentage_discount() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .withf(|url, query| {
                url == "https://api.lemonsqueezy.com/v1/discounts"
                    && query.contains(&("page[number]".to_string(), "1".to_string()))
                    && query.contains(&("page[size]".to_string(), "100".to_string()))
            })
            .once()
            .returning(|_, _| ok(&page(vec![discount_json("1", json!({}))], 1, 1)));

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let page = source.fetch_page(None).await?;

        assert_eq!(page.next, None);

        let discount = page.discounts.first().ok_or("missing discount")?;

        assert_eq!(discount.id, "1");
        assert_eq!(discount.provider, Provider::LemonSqueezy);
        assert_eq!(discount.name, "Spring");
        assert_eq!(discount.code, "SPRING20");
        assert_eq!(discount.amount, Decimal::from(20));
        assert!(discount.is_percent);
        assert_eq!(discount.duration, DiscountDuration::Once);
        assert_eq!(discount.duration_in_months, None);
        assert_eq!(discount.status, DiscountStatus::Published);
        assert_eq!(discount.usage_limit, None);
        assert_eq!(discount.provider_data.get("store_id"), Some(&json!(7)));
        assert_eq!(discount.currency(), None);

        Ok(())
    }

    #[tokio::test]
    async fn maps_repeating_limited_draft_discount() -> TestResult {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            ok(&page(
                vec![discount_json(
                    "2",
                    json!({
                        "name": "",
                        "code": "LOYAL",
                        "duration": "repeating",
                        "duration_in_months": 3,
                        "status": "draft",
                        "is_limited_redemptions": true,
                        "max_redemptions": 50,
                        "expires_at": "2025-06-30T23:59:59.000000Z",
                    }),
                )],
                1,
                1,
            ))
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let page = source.fetch_page(None).await?;
        let discount = page.discounts.first().ok_or("missing discount")?;

        assert_eq!(discount.name, "LOYAL");
        assert_eq!(discount.duration, DiscountDuration::Repeating);
        assert_eq!(discount.duration_in_months, Some(3));
        assert_eq!(discount.status, DiscountStatus::Draft);
        assert_eq!(discount.usage_limit, Some(50));
        assert_eq!(
            discount.expires_at,
            Some("2025-06-30T23:59:59Z".parse::<Timestamp>()?)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_duration_falls_back_to_once() -> TestResult {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            ok(&page(
                vec![discount_json("3", json!({ "duration": "weekly" }))],
                1,
                1,
            ))
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let page = source.fetch_page(None).await?;
        let discount = page.discounts.first().ok_or("missing discount")?;

        assert_eq!(discount.duration, DiscountDuration::Once);
        assert_eq!(discount.duration_in_months, None);

        Ok(())
    }

    #[tokio::test]
    async fn fixed_discounts_resolve_store_currency_once() -> TestResult {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();

        transport
            .expect_get()
            .withf(|url, _| url.ends_with("/v1/discounts"))
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| {
                ok(&page(
                    vec![
                        discount_json("4", json!({ "code": "FIVE", "amount": 500, "amount_type": "fixed" })),
                        discount_json("5", json!({ "code": "TEN", "amount": 1000, "amount_type": "fixed" })),
                    ],
                    1,
                    1,
                ))
            });

        transport
            .expect_get()
            .withf(|url, _| url.ends_with("/v1/stores/7"))
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| {
                ok(&json!({
                    "data": { "type": "stores", "id": "7", "attributes": { "currency": "USD" } }
                }))
            });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let page = source.fetch_page(None).await?;

        assert_eq!(page.discounts.len(), 2);
        assert!(
            page.discounts
                .iter()
                .all(|d| !d.is_percent && d.currency() == Some("USD")),
            "unexpected discounts: {:?}",
            page.discounts
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_amount_type_is_fixed() -> TestResult {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            ok(&page(
                vec![discount_json("6", json!({ "amount_type": "flat" }))],
                1,
                1,
            ))
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let page = source.fetch_page(None).await?;
        let discount = page.discounts.first().ok_or("missing discount")?;

        assert!(!discount.is_percent);
        assert_eq!(discount.currency(), None);
        assert_eq!(discount.provider_data.get("amount_type"), Some(&json!("flat")));

        Ok(())
    }

    #[tokio::test]
    async fn missing_meta_ends_pagination() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .once()
            .returning(|_, _| ok(&json!({ "data": [discount_json("1", json!({}))] })));

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let discounts = import(&mut source).await?;

        assert_eq!(discounts.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn import_follows_last_page() -> TestResult {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();

        transport
            .expect_get()
            .withf(|_, query| query.contains(&("page[number]".to_string(), "1".to_string())))
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| ok(&page(vec![discount_json("1", json!({}))], 1, 2)));

        transport
            .expect_get()
            .withf(|_, query| query.contains(&("page[number]".to_string(), "2".to_string())))
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| {
                ok(&page(
                    vec![discount_json("2", json!({ "code": "SUMMER" }))],
                    2,
                    2,
                ))
            });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let discounts = import(&mut source).await?;
        let ids: Vec<_> = discounts.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(ids, ["1", "2"]);

        Ok(())
    }

    #[tokio::test]
    async fn error_status_fails_the_page() {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            Ok(TransportResponse {
                status: 401,
                body: r#"{"errors":[{"status":"401","title":"Unauthenticated"}]}"#.to_string(),
            })
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let result = source.fetch_page(None).await;

        assert!(
            matches!(result, Err(SourceFetchError::Status { status: 401, .. })),
            "expected status error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn errors_in_body_fail_the_page() {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            ok(&json!({ "errors": [{ "title": "Bad Request", "detail": "page size too large" }] }))
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let result = source.fetch_page(None).await;

        assert!(
            matches!(&result, Err(SourceFetchError::Upstream(message)) if message == "page size too large"),
            "expected upstream error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_required_field_is_malformed() {
        let mut transport = MockTransport::new();

        transport.expect_get().once().returning(|_, _| {
            ok(&json!({ "data": [{ "id": "1", "attributes": { "name": "No code" } }] }))
        });

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let result = source.fetch_page(None).await;

        assert!(
            matches!(result, Err(SourceFetchError::Malformed(_))),
            "expected malformed error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn rejects_non_numeric_cursor() {
        let transport = MockTransport::new();

        let mut source = LemonSqueezySource::new(Box::new(transport));

        let result = source.fetch_page(Some("abc".to_string())).await;

        assert!(
            matches!(result, Err(SourceFetchError::InvalidCursor(_))),
            "expected cursor error, got {result:?}"
        );
    }
}
