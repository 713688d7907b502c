//! Source Config

use clap::{Args, ValueEnum};
use zeroize::Zeroizing;

use crate::sources::{DiscountSource, LemonSqueezySource, SourceFetchError, StripeSource};

/// Providers discounts can be imported from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceProvider {
    /// Lemon Squeezy
    #[value(name = "lemonsqueezy")]
    LemonSqueezy,

    /// Stripe
    Stripe,
}

/// Source provider settings.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Provider to import from
    #[arg(long, value_enum)]
    pub provider: SourceProvider,

    /// Provider API key
    #[arg(long, env = "SOURCE_API_KEY", hide_env_values = true)]
    pub source_api_key: String,

    /// Override the provider API address
    #[arg(long, env = "SOURCE_API_URL")]
    pub source_url: Option<String>,
}

impl SourceArgs {
    /// Build the importer for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(self) -> Result<Box<dyn DiscountSource>, SourceFetchError> {
        let api_key = Zeroizing::new(self.source_api_key);

        Ok(match (self.provider, self.source_url) {
            (SourceProvider::LemonSqueezy, None) => Box::new(LemonSqueezySource::connect(api_key)?),
            (SourceProvider::LemonSqueezy, Some(url)) => {
                Box::new(LemonSqueezySource::connect(api_key)?.with_base_url(url))
            }
            (SourceProvider::Stripe, None) => Box::new(StripeSource::connect(api_key)?),
            (SourceProvider::Stripe, Some(url)) => {
                Box::new(StripeSource::connect(api_key)?.with_base_url(url))
            }
        })
    }
}
