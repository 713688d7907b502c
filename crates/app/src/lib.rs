//! Discount import, destination client and migration orchestration.

pub mod config;
pub mod destination;
pub mod migration;
pub mod observability;
pub mod prompt;
pub mod sources;
