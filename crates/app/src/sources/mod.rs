//! Source providers
//!
//! Each provider implements [`DiscountSource`]: fetch one page of discounts and map
//! them into [`CanonicalDiscount`]s. [`import`] drives the pagination for all of them.

use async_trait::async_trait;
use mockall::automock;
use porter::discounts::{CanonicalDiscount, Provider};
use tracing::{debug, info};

mod errors;
pub mod lemonsqueezy;
pub mod stripe;
pub mod transport;

pub use errors::SourceFetchError;
pub use lemonsqueezy::LemonSqueezySource;
pub use stripe::StripeSource;
pub use transport::{HttpTransport, Transport, TransportResponse};

/// One page of mapped discounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountPage {
    /// Discounts on this page, in source order.
    pub discounts: Vec<CanonicalDiscount>,

    /// Cursor for the next page; `None` on the last page.
    pub next: Option<String>,
}

/// A provider discounts can be imported from.
#[automock]
#[async_trait]
pub trait DiscountSource: Send + Sync {
    /// Provider tag recorded on imported discounts.
    fn provider(&self) -> Provider;

    /// Fetch the page at `cursor`, or the first page when `cursor` is `None`.
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<DiscountPage, SourceFetchError>;
}

/// Import every discount from `source`, merging all pages in order.
///
/// # Errors
///
/// Returns the first page error; discounts from earlier pages are discarded.
#[tracing::instrument(name = "sources.import", skip(source), fields(provider = %source.provider()), err)]
pub async fn import(
    source: &mut dyn DiscountSource,
) -> Result<Vec<CanonicalDiscount>, SourceFetchError> {
    let mut discounts = Vec::new();
    let mut cursor = None;
    let mut pages = 0_usize;

    loop {
        let page = source.fetch_page(cursor.take()).await?;

        pages += 1;

        debug!(page = pages, count = page.discounts.len(), "fetched discount page");

        discounts.extend(page.discounts);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(pages, count = discounts.len(), "imported discounts");

    Ok(discounts)
}
