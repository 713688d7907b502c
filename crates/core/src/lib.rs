//! Porter
//!
//! Canonical discount model, validation, selection and transformation for migrating
//! discounts from third-party commerce platforms into the destination API.

pub mod destination;
pub mod discounts;
pub mod fixtures;
pub mod prelude;
pub mod transform;
