//! Discount validation

use rust_decimal::Decimal;
use thiserror::Error;

use crate::discounts::{CanonicalDiscount, DiscountDuration};

/// Reasons a canonical discount cannot be migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The source identifier is blank.
    #[error("id is empty")]
    EmptyId,

    /// The display name is blank.
    #[error("name is empty")]
    EmptyName,

    /// The redemption code is blank.
    #[error("code is empty")]
    EmptyCode,

    /// The amount is below zero.
    #[error("amount is negative")]
    NegativeAmount,

    /// A repeating discount without a positive month count.
    #[error("repeating duration requires a positive duration_in_months")]
    MissingDurationMonths,

    /// A month count on a discount that does not repeat.
    #[error("duration_in_months is only allowed for repeating discounts")]
    UnexpectedDurationMonths,

    /// The amount cannot be encoded in the destination's integer representation.
    #[error("amount is out of range")]
    AmountOutOfRange,
}

/// Check every record invariant, reporting the first one broken.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first failing invariant.
pub fn check(discount: &CanonicalDiscount) -> Result<(), ValidationError> {
    if discount.id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }

    if discount.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if discount.code.trim().is_empty() {
        return Err(ValidationError::EmptyCode);
    }

    if discount.amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount);
    }

    match (discount.duration, discount.duration_in_months) {
        (DiscountDuration::Repeating, Some(months)) if months > 0 => Ok(()),
        (DiscountDuration::Repeating, _) => Err(ValidationError::MissingDurationMonths),
        (DiscountDuration::Once | DiscountDuration::Forever, None) => Ok(()),
        (DiscountDuration::Once | DiscountDuration::Forever, Some(_)) => {
            Err(ValidationError::UnexpectedDurationMonths)
        }
    }
}

/// Whether the record satisfies every invariant.
#[must_use]
pub fn validate(discount: &CanonicalDiscount) -> bool {
    check(discount).is_ok()
}
