//! Destination Config

use clap::Args;
use zeroize::Zeroizing;

use crate::destination::{DestinationConfig, HttpDestination};

/// Destination API settings.
#[derive(Debug, Args)]
pub struct DestinationArgs {
    /// Destination API address
    #[arg(long, env = "DESTINATION_API_URL")]
    pub destination_url: String,

    /// Destination API key
    #[arg(long, env = "DESTINATION_API_KEY", hide_env_values = true)]
    pub destination_api_key: String,
}

impl DestinationArgs {
    /// Build the destination client.
    #[must_use]
    pub fn connect(self) -> HttpDestination {
        HttpDestination::new(DestinationConfig {
            base_url: self.destination_url,
            api_key: Zeroizing::new(self.destination_api_key),
        })
    }
}
