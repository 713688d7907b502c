//! Discount migration
//!
//! A migration runs in two steps so the caller can preview and confirm in between:
//! [`plan`] imports, selects and transforms; [`execute`] creates each request at the
//! destination, one at a time.

use porter::{
    destination::{DestinationContext, DestinationDiscountRequest},
    discounts::{CanonicalDiscount, DiscountKind, DiscountStatus, filter::filter},
    transform::{Rejection, transform_batch},
};
use tracing::{info, warn};

use crate::{
    destination::{CreatedDiscount, DestinationApi, DestinationError},
    sources::{DiscountSource, SourceFetchError, import},
};

pub mod preview;

/// Which imported discounts to migrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub status: Option<DiscountStatus>,
    pub kind: Option<DiscountKind>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            status: Some(DiscountStatus::Published),
            kind: Some(DiscountKind::Percentage),
        }
    }
}

/// Requests ready to send, with the bookkeeping for the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationPlan {
    /// Discounts read from the source.
    pub imported: usize,

    /// Discounts left after the selection.
    pub selected: Vec<CanonicalDiscount>,

    /// Requests to create, in source order.
    pub requests: Vec<DestinationDiscountRequest>,

    /// Selected discounts dropped for failing validation.
    pub excluded: usize,

    /// Valid discounts the destination cannot represent.
    pub rejected: Vec<Rejection>,
}

impl MigrationPlan {
    /// Whether there is nothing to create.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// A create call that failed.
#[derive(Debug)]
pub struct FailedDiscount {
    pub code: String,
    pub error: DestinationError,
}

/// Outcome of [`execute`].
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub created: Vec<CreatedDiscount>,
    pub failed: Vec<FailedDiscount>,
}

impl MigrationReport {
    /// Whether every create call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Import from `source`, select and transform.
///
/// # Errors
///
/// Returns an error if the import fails; nothing is planned from a partial import.
pub async fn plan(
    source: &mut dyn DiscountSource,
    selection: Selection,
    context: &DestinationContext,
) -> Result<MigrationPlan, SourceFetchError> {
    let discounts = import(source).await?;

    let selected = filter(&discounts, selection.status, selection.kind);

    let batch = transform_batch(&selected, context);

    info!(
        imported = discounts.len(),
        selected = selected.len(),
        ready = batch.requests.len(),
        excluded = batch.excluded,
        rejected = batch.rejected.len(),
        "planned discount migration"
    );

    Ok(MigrationPlan {
        imported: discounts.len(),
        selected,
        requests: batch.requests,
        excluded: batch.excluded,
        rejected: batch.rejected,
    })
}

/// Create every planned request, sequentially, continuing past failures.
pub async fn execute(destination: &dyn DestinationApi, plan: &MigrationPlan) -> MigrationReport {
    let mut report = MigrationReport::default();

    for request in &plan.requests {
        match destination.create_discount(request).await {
            Ok(created) => {
                info!(
                    code = %request.code,
                    discount_id = %created.discount_id,
                    "created discount"
                );

                report.created.push(created);
            }
            Err(error) => {
                warn!(code = %request.code, %error, "failed to create discount");

                report.failed.push(FailedDiscount {
                    code: request.code.clone(),
                    error,
                });
            }
        }
    }

    info!(
        created = report.created.len(),
        failed = report.failed.len(),
        "discount migration finished"
    );

    report
}
