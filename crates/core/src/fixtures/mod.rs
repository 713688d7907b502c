//! Canonical discount fixtures shared by unit and integration tests.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde_json::Map;

use crate::discounts::{CanonicalDiscount, DiscountDuration, DiscountStatus, Provider};

/// Published 20% one-off Lemon Squeezy discount `SPRING20` with id `d1`.
#[must_use]
pub fn spring() -> CanonicalDiscount {
    CanonicalDiscount {
        id: "d1".to_string(),
        provider: Provider::LemonSqueezy,
        name: "Spring".to_string(),
        code: "SPRING20".to_string(),
        amount: Decimal::from(20),
        is_percent: true,
        duration: DiscountDuration::Once,
        duration_in_months: None,
        status: DiscountStatus::Published,
        usage_limit: None,
        expires_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        provider_data: Map::new(),
    }
}

/// Published 10% one-off discount named after its code.
#[must_use]
pub fn discount(id: &str, code: &str) -> CanonicalDiscount {
    CanonicalDiscount {
        id: id.to_string(),
        name: code.to_string(),
        code: code.to_string(),
        amount: Decimal::from(10),
        ..spring()
    }
}
