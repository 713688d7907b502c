//! Command-line and environment configuration.

pub mod destination;
pub mod logging;
pub mod selection;
pub mod source;

pub use destination::DestinationArgs;
pub use logging::{LogFormat, LoggingConfig};
pub use selection::SelectionArgs;
pub use source::{SourceArgs, SourceProvider};
