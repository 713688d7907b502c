//! Discount selection

use crate::discounts::{CanonicalDiscount, DiscountKind, DiscountStatus};

/// Keep the discounts matching `status` and `kind`, preserving input order.
///
/// A `None` constraint does not filter on that axis.
#[must_use]
pub fn filter(
    discounts: &[CanonicalDiscount],
    status: Option<DiscountStatus>,
    kind: Option<DiscountKind>,
) -> Vec<CanonicalDiscount> {
    discounts
        .iter()
        .filter(|discount| status.is_none_or(|status| discount.status == status))
        .filter(|discount| kind.is_none_or(|kind| discount.kind() == kind))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::fixtures::spring;

    use super::*;

    fn sample() -> Vec<CanonicalDiscount> {
        vec![
            CanonicalDiscount {
                id: "d1".to_string(),
                ..spring()
            },
            CanonicalDiscount {
                id: "d2".to_string(),
                status: DiscountStatus::Draft,
                ..spring()
            },
            CanonicalDiscount {
                id: "d3".to_string(),
                is_percent: false,
                amount: Decimal::from(500),
                ..spring()
            },
            CanonicalDiscount {
                id: "d4".to_string(),
                status: DiscountStatus::Archived,
                is_percent: false,
                ..spring()
            },
            CanonicalDiscount {
                id: "d5".to_string(),
                ..spring()
            },
        ]
    }

    fn ids(discounts: &[CanonicalDiscount]) -> Vec<&str> {
        discounts.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn no_constraints_keeps_everything() {
        let discounts = sample();

        assert_eq!(filter(&discounts, None, None), discounts);
    }

    #[test]
    fn status_constraint_keeps_matching_in_order() {
        let discounts = sample();
        let published = filter(&discounts, Some(DiscountStatus::Published), None);

        assert_eq!(ids(&published), ["d1", "d3", "d5"]);
    }

    #[test]
    fn kind_constraint_splits_percentage_and_fixed() {
        let discounts = sample();

        let percentage = filter(&discounts, None, Some(DiscountKind::Percentage));
        let fixed = filter(&discounts, None, Some(DiscountKind::Fixed));

        assert_eq!(ids(&percentage), ["d1", "d2", "d5"]);
        assert_eq!(ids(&fixed), ["d3", "d4"]);
    }

    #[test]
    fn constraints_compose() {
        let discounts = sample();
        let selected = filter(
            &discounts,
            Some(DiscountStatus::Published),
            Some(DiscountKind::Percentage),
        );

        assert_eq!(ids(&selected), ["d1", "d5"]);
    }

    #[test]
    fn filtering_twice_is_a_no_op() {
        let discounts = sample();

        let once = filter(&discounts, Some(DiscountStatus::Published), None);
        let twice = filter(&once, Some(DiscountStatus::Published), None);

        assert_eq!(once, twice);
    }
}
