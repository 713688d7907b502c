//! Migration preview tables.

use porter::{
    destination::{DestinationDiscountRequest, DiscountType},
    discounts::CanonicalDiscount,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::migration::MigrationPlan;

/// Render the requests a migration is about to create.
#[must_use]
pub fn render_requests(requests: &[DestinationDiscountRequest]) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        "Name",
        "Code",
        "Amount",
        "Duration",
        "Usage Limit",
        "Expires",
    ]);

    for request in requests {
        builder.push_record([
            request.name.clone(),
            request.code.clone(),
            request_amount(request),
            duration_label(request.duration.as_str(), request.duration_in_months),
            limit_label(request.usage_limit),
            request
                .expires_at
                .map_or_else(|| "never".to_string(), |at| at.to_string()),
        ]);
    }

    finish(builder)
}

/// Render canonical discounts as imported from a source.
#[must_use]
pub fn render_discounts(discounts: &[CanonicalDiscount]) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        "ID", "Name", "Code", "Amount", "Duration", "Status", "Usage Limit", "Expires",
    ]);

    for discount in discounts {
        builder.push_record([
            discount.id.clone(),
            discount.name.clone(),
            discount.code.clone(),
            discount_amount(discount),
            duration_label(discount.duration.as_str(), discount.duration_in_months),
            discount.status.to_string(),
            limit_label(discount.usage_limit),
            discount
                .expires_at
                .map_or_else(|| "never".to_string(), |at| at.to_string()),
        ]);
    }

    finish(builder)
}

/// One-line summary of a plan's counts.
#[must_use]
pub fn summary(plan: &MigrationPlan) -> String {
    format!(
        "imported: {}, selected: {}, ready: {}, invalid: {}, unsupported: {}",
        plan.imported,
        plan.selected.len(),
        plan.requests.len(),
        plan.excluded,
        plan.rejected.len()
    )
}

/// Amount of a canonical discount in its own unit.
///
/// Fixed amounts are formatted as money when the source recorded a known ISO currency.
#[must_use]
pub fn discount_amount(discount: &CanonicalDiscount) -> String {
    if discount.is_percent {
        return format!("{}%", discount.amount.normalize());
    }

    let money = discount
        .currency()
        .and_then(iso::find)
        .zip(discount.amount.to_i64())
        .map(|(currency, minor)| Money::from_minor(minor, currency).to_string());

    money.unwrap_or_else(|| format!("{} (minor units)", discount.amount))
}

fn request_amount(request: &DestinationDiscountRequest) -> String {
    match request.discount_type {
        DiscountType::Percentage => {
            format!("{}%", (Decimal::from(request.amount) / Decimal::ONE_HUNDRED).normalize())
        }
    }
}

fn duration_label(duration: &str, months: Option<u32>) -> String {
    match months {
        Some(months) => format!("{duration} ({months} months)"),
        None => duration.to_string(),
    }
}

fn limit_label(limit: Option<u64>) -> String {
    limit.map_or_else(|| "unlimited".to_string(), |limit| limit.to_string())
}

fn finish(builder: Builder) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    table.to_string()
}
