//! Destination request shapes

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::discounts::{DiscountDuration, DiscountKind};

/// Discount types the destination create endpoint accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off, encoded in basis points.
    Percentage,
}

impl DiscountType {
    /// Every type the destination currently documents.
    pub const ALL: [Self; 1] = [Self::Percentage];

    /// Wire type for a canonical discount kind, if the destination has one.
    #[must_use]
    pub const fn from_kind(kind: DiscountKind) -> Option<Self> {
        match kind {
            DiscountKind::Percentage => Some(Self::Percentage),
            DiscountKind::Fixed => None,
        }
    }

    /// Canonical kind represented by this wire type.
    #[must_use]
    pub const fn kind(self) -> DiscountKind {
        match self {
            Self::Percentage => DiscountKind::Percentage,
        }
    }
}

/// Target of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationContext {
    brand_id: String,
    supported_types: Vec<DiscountType>,
}

impl DestinationContext {
    /// Context scoped to the given destination brand, accepting every documented type.
    pub fn new(brand_id: impl Into<String>) -> Self {
        Self {
            brand_id: brand_id.into(),
            supported_types: DiscountType::ALL.to_vec(),
        }
    }

    /// Restrict the wire types this destination accepts.
    #[must_use]
    pub fn with_supported_types(mut self, types: impl IntoIterator<Item = DiscountType>) -> Self {
        self.supported_types = types.into_iter().collect();
        self
    }

    /// Brand identifier attached to every request.
    #[must_use]
    pub fn brand_id(&self) -> &str {
        &self.brand_id
    }

    /// Discount kinds the destination can represent.
    pub fn supported_kinds(&self) -> impl Iterator<Item = DiscountKind> + '_ {
        self.supported_types.iter().copied().map(DiscountType::kind)
    }

    /// Whether discounts of `kind` can be created at the destination.
    #[must_use]
    pub fn supports(&self, kind: DiscountKind) -> bool {
        self.supported_kinds().any(|supported| supported == kind)
    }
}

/// Body of the destination's create discount call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDiscountRequest {
    /// Display name.
    pub name: String,

    /// Redemption code.
    pub code: String,

    /// Discount type.
    #[serde(rename = "type")]
    pub discount_type: DiscountType,

    /// Basis points for [`DiscountType::Percentage`].
    pub amount: u32,

    /// Maximum redemptions; `null` is unlimited.
    pub usage_limit: Option<u64>,

    /// Expiry, if any.
    pub expires_at: Option<Timestamp>,

    /// Destination brand the discount belongs to.
    pub brand_id: String,

    /// Billing cycles the discount applies to.
    pub duration: DiscountDuration,

    /// Months for repeating discounts.
    pub duration_in_months: Option<u32>,
}
