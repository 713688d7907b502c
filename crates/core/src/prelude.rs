//! Common imports for code driving a discount migration.

pub use crate::{
    destination::{DestinationContext, DestinationDiscountRequest, DiscountType},
    discounts::{
        CanonicalDiscount, DiscountDuration, DiscountKind, DiscountStatus, Provider,
        filter::filter,
        validation::{ValidationError, check, validate},
    },
    transform::{
        InvalidDiscountError, Rejection, TransformBatch, TransformError,
        UnsupportedDiscountError, transform, transform_batch, transform_multiple,
    },
};
