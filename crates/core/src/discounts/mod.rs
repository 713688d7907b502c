//! Canonical discounts
//!
//! A [`CanonicalDiscount`] is the provider-agnostic shape every source importer maps
//! into, and the only shape the filter and transformer accept.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod filter;
pub mod validation;

/// Source platform a discount was imported from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Provider {
    /// Stripe
    Stripe,

    /// Lemon Squeezy
    LemonSqueezy,

    /// Paddle
    Paddle,

    /// Gumroad
    Gumroad,

    /// Razorpay
    Razorpay,

    /// 2Checkout
    #[serde(rename = "2checkout")]
    TwoCheckout,

    /// `FastSpring`
    FastSpring,

    /// Polar
    Polar,
}

impl Provider {
    /// Stable lowercase tag for the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::LemonSqueezy => "lemonsqueezy",
            Self::Paddle => "paddle",
            Self::Gumroad => "gumroad",
            Self::Razorpay => "razorpay",
            Self::TwoCheckout => "2checkout",
            Self::FastSpring => "fastspring",
            Self::Polar => "polar",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many billing cycles a discount applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountDuration {
    /// First payment only.
    Once,

    /// A fixed number of months, see [`CanonicalDiscount::duration_in_months`].
    Repeating,

    /// Every payment.
    Forever,
}

impl DiscountDuration {
    /// Wire name of the duration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Repeating => "repeating",
            Self::Forever => "forever",
        }
    }
}

impl fmt::Display for DiscountDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication state of a discount at the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    /// Live and redeemable; the only status eligible for migration by default.
    Published,

    /// Not yet live.
    Draft,

    /// No longer redeemable.
    Archived,
}

impl DiscountStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for DiscountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a discount's `amount`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage points off.
    Percentage,

    /// Minor currency units off.
    Fixed,
}

impl DiscountKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-agnostic discount record.
///
/// Built once per source record by an importer and never mutated afterwards. Records are
/// allowed to be invalid here; [`validation::check`] decides whether one may be migrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDiscount {
    /// Source identifier, unique within the provider.
    pub id: String,

    /// Origin system.
    pub provider: Provider,

    /// Display name.
    pub name: String,

    /// Redemption code.
    pub code: String,

    /// Percentage points when `is_percent`, minor currency units otherwise.
    pub amount: Decimal,

    /// Discriminates the unit of `amount`.
    pub is_percent: bool,

    /// Billing cycles the discount applies to.
    pub duration: DiscountDuration,

    /// Months for [`DiscountDuration::Repeating`]; `None` for every other duration.
    pub duration_in_months: Option<u32>,

    /// Publication state at the source.
    pub status: DiscountStatus,

    /// Maximum redemptions; `None` means unlimited.
    pub usage_limit: Option<u64>,

    /// Expiry, if any.
    pub expires_at: Option<Timestamp>,

    /// Creation time at the source.
    pub created_at: Timestamp,

    /// Last update time at the source.
    pub updated_at: Timestamp,

    /// Source-specific fields kept for traceability only.
    #[serde(default)]
    pub provider_data: Map<String, Value>,
}

impl CanonicalDiscount {
    /// Unit of `amount`.
    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        if self.is_percent {
            DiscountKind::Percentage
        } else {
            DiscountKind::Fixed
        }
    }

    /// Currency recorded by the importer for fixed-amount discounts.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.provider_data.get("currency").and_then(Value::as_str)
    }
}

/// Convert a percentage into basis points (`15` becomes `1500`).
///
/// Halves round away from zero. Returns `None` when the result is negative or does not
/// fit in a `u32`.
#[must_use]
pub fn basis_points(percent: Decimal) -> Option<u32> {
    percent
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn basis_points_scales_whole_percentages() {
        assert_eq!(basis_points(Decimal::from(15)), Some(1500));
    }

    #[test]
    fn basis_points_keeps_fractional_percentages() -> TestResult {
        assert_eq!(basis_points(Decimal::from_str("12.5")?), Some(1250));
        assert_eq!(basis_points(Decimal::from_str("0.01")?), Some(1));

        Ok(())
    }

    #[test]
    fn basis_points_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(basis_points(Decimal::from_str("12.345")?), Some(1235));
        assert_eq!(basis_points(Decimal::from_str("12.344")?), Some(1234));

        Ok(())
    }

    #[test]
    fn basis_points_rejects_negative() {
        assert_eq!(basis_points(Decimal::from(-1)), None);
    }

    #[test]
    fn basis_points_rejects_overflow() {
        assert_eq!(basis_points(Decimal::MAX), None);
        assert_eq!(basis_points(Decimal::from(u64::from(u32::MAX))), None);
    }

    #[test]
    fn provider_serializes_as_lowercase_tag() -> TestResult {
        assert_eq!(
            serde_json::to_string(&Provider::LemonSqueezy)?,
            "\"lemonsqueezy\""
        );
        assert_eq!(
            serde_json::to_string(&Provider::TwoCheckout)?,
            "\"2checkout\""
        );

        Ok(())
    }
}
