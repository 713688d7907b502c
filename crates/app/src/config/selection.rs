//! Discount Selection Config

use clap::{Args, ValueEnum};
use porter::discounts::{DiscountKind, DiscountStatus};

use crate::migration::Selection;

/// Status constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Published,
    Draft,
    Archived,
    Any,
}

/// Kind constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Percentage,
    Fixed,
    Any,
}

/// Which imported discounts to keep.
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Only keep discounts with this status
    #[arg(long, value_enum, default_value_t = StatusArg::Published)]
    pub status: StatusArg,

    /// Only keep percentage or fixed-amount discounts
    #[arg(long, value_enum, default_value_t = KindArg::Percentage)]
    pub kind: KindArg,
}

impl SelectionArgs {
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            status: match self.status {
                StatusArg::Published => Some(DiscountStatus::Published),
                StatusArg::Draft => Some(DiscountStatus::Draft),
                StatusArg::Archived => Some(DiscountStatus::Archived),
                StatusArg::Any => None,
            },
            kind: match self.kind {
                KindArg::Percentage => Some(DiscountKind::Percentage),
                KindArg::Fixed => Some(DiscountKind::Fixed),
                KindArg::Any => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        selection: SelectionArgs,
    }

    #[test]
    fn defaults_select_published_percentage() -> TestResult {
        let harness = Harness::try_parse_from(["porter"])?;

        assert_eq!(harness.selection.selection(), Selection::default());

        Ok(())
    }

    #[test]
    fn any_lifts_the_constraint() -> TestResult {
        let harness = Harness::try_parse_from(["porter", "--status", "any", "--kind", "fixed"])?;

        assert_eq!(
            harness.selection.selection(),
            Selection {
                status: None,
                kind: Some(DiscountKind::Fixed),
            }
        );

        Ok(())
    }
}
