//! Discount transformation
//!
//! Turns validated [`CanonicalDiscount`]s into [`DestinationDiscountRequest`]s. Single
//! records fail loudly; batches drop invalid records and report how many were dropped.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    destination::{DestinationContext, DestinationDiscountRequest, DiscountType},
    discounts::{
        CanonicalDiscount, DiscountKind, basis_points,
        validation::{ValidationError, check},
    },
};

/// A record broke one of the canonical invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("discount {id:?} is invalid: {reason}")]
pub struct InvalidDiscountError {
    /// Source identifier of the record.
    pub id: String,

    /// Invariant that failed.
    #[source]
    pub reason: ValidationError,
}

/// A valid record the destination cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("discount {id:?} is a {kind} discount, which the destination does not support")]
pub struct UnsupportedDiscountError {
    /// Source identifier of the record.
    pub id: String,

    /// Kind of the rejected discount.
    pub kind: DiscountKind,
}

/// Errors from transforming a single discount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The record failed validation.
    #[error(transparent)]
    Invalid(#[from] InvalidDiscountError),

    /// The record is valid but unsupported by the destination.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedDiscountError),
}

/// A record dropped from a batch after passing validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Source identifier.
    pub id: String,

    /// Code of the rejected discount.
    pub code: String,

    /// Why it was rejected.
    pub error: TransformError,
}

/// Outcome of [`transform_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformBatch {
    /// Requests ready for the destination, in input order.
    pub requests: Vec<DestinationDiscountRequest>,

    /// Number of records that failed validation.
    pub excluded: usize,

    /// Valid records that still could not be transformed.
    pub rejected: Vec<Rejection>,
}

/// Transform one discount into the destination's create request.
///
/// # Errors
///
/// - [`TransformError::Invalid`] when the record fails validation.
/// - [`TransformError::Unsupported`] when the destination cannot represent the
///   discount kind.
pub fn transform(
    discount: &CanonicalDiscount,
    context: &DestinationContext,
) -> Result<DestinationDiscountRequest, TransformError> {
    check(discount).map_err(|reason| invalid(discount, reason))?;

    let kind = discount.kind();

    let discount_type = DiscountType::from_kind(kind)
        .filter(|_| context.supports(kind))
        .ok_or_else(|| UnsupportedDiscountError {
            id: discount.id.clone(),
            kind,
        })?;

    let amount = basis_points(discount.amount)
        .ok_or_else(|| invalid(discount, ValidationError::AmountOutOfRange))?;

    Ok(DestinationDiscountRequest {
        name: discount.name.clone(),
        code: discount.code.clone(),
        discount_type,
        amount,
        usage_limit: discount.usage_limit,
        expires_at: discount.expires_at,
        brand_id: context.brand_id().to_string(),
        duration: discount.duration,
        duration_in_months: discount.duration_in_months,
    })
}

/// Validate and transform a batch, keeping only the successful requests.
///
/// See [`transform_batch`] for the exclusion counts.
#[must_use]
pub fn transform_multiple(
    discounts: &[CanonicalDiscount],
    context: &DestinationContext,
) -> Vec<DestinationDiscountRequest> {
    transform_batch(discounts, context).requests
}

/// Validate and transform a batch.
///
/// Records failing validation are counted and logged once in bulk. Records that pass
/// validation are transformed independently; a failure is logged and recorded in
/// [`TransformBatch::rejected`] without aborting the batch.
#[must_use]
pub fn transform_batch(
    discounts: &[CanonicalDiscount],
    context: &DestinationContext,
) -> TransformBatch {
    let (valid, invalid): (Vec<_>, Vec<_>) = discounts.iter().partition(|d| check(d).is_ok());

    let excluded = invalid.len();

    if excluded > 0 {
        warn!(
            excluded,
            total = discounts.len(),
            "excluded invalid discounts from batch"
        );
    }

    let mut batch = TransformBatch {
        requests: Vec::with_capacity(valid.len()),
        excluded,
        rejected: Vec::new(),
    };

    for discount in valid {
        match transform(discount, context) {
            Ok(request) => batch.requests.push(request),
            Err(error) => {
                warn!(id = %discount.id, code = %discount.code, %error, "skipping discount");

                batch.rejected.push(Rejection {
                    id: discount.id.clone(),
                    code: discount.code.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        transformed = batch.requests.len(),
        rejected = batch.rejected.len(),
        "transformed discount batch"
    );

    batch
}

fn invalid(discount: &CanonicalDiscount, reason: ValidationError) -> InvalidDiscountError {
    InvalidDiscountError {
        id: discount.id.clone(),
        reason,
    }
}
